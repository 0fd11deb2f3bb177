use anyhow::Result;
use image::{imageops, RgbImage};
use ndarray::Array4;

/// Preprocessor for converting RGB photos to pose model input tensors
pub struct Preprocessor {
    target_width: u32,
    target_height: u32,
}

impl Preprocessor {
    pub fn new(target_width: u32, target_height: u32) -> Self {
        Self {
            target_width,
            target_height,
        }
    }

    /// Preprocess an RGB image into an NHWC tensor of raw 0-255 values
    ///
    /// The photo is stretched, not letterboxed, so coordinates normalized
    /// against the model input are also normalized against the original.
    ///
    /// Returns: Array4<i32> with shape [1, height, width, 3]
    pub fn preprocess(&self, image: &RgbImage) -> Result<Array4<i32>> {
        let _span = tracing::debug_span!("preprocess").entered();

        anyhow::ensure!(
            image.width() > 0 && image.height() > 0,
            "cannot preprocess an empty image"
        );

        let resized = if image.dimensions() != (self.target_width, self.target_height) {
            imageops::resize(
                image,
                self.target_width,
                self.target_height,
                imageops::FilterType::Triangle,
            )
        } else {
            image.clone()
        };

        let (width, height) = resized.dimensions();
        let mut tensor = Array4::<i32>::zeros((1, height as usize, width as usize, 3));

        for (x, y, pixel) in resized.enumerate_pixels() {
            for c in 0..3 {
                tensor[[0, y as usize, x as usize, c]] = pixel[c] as i32;
            }
        }

        Ok(tensor)
    }
}
