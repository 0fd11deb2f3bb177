use crate::config::CompositingMode;
use crate::error::TryOnError;
use image::{Rgb, RgbImage, RgbaImage};

/// Per-pixel garment coverage in [0, 1], row-major.
///
/// Hard cutout yields only 0.0 or 1.0; alpha blending keeps the normalized
/// alpha of pixels above the threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct AlphaMask {
    width: u32,
    height: u32,
    coverage: Vec<f32>,
}

impl AlphaMask {
    pub fn from_rgba(image: &RgbaImage, mode: CompositingMode, threshold: f32) -> Self {
        let coverage = image
            .pixels()
            .map(|p| {
                let alpha = p[3] as f32 / 255.0;
                match mode {
                    _ if alpha <= threshold => 0.0,
                    CompositingMode::HardCutout => 1.0,
                    CompositingMode::AlphaBlend => alpha,
                }
            })
            .collect();

        Self {
            width: image.width(),
            height: image.height(),
            coverage,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.coverage[y as usize * self.width as usize + x as usize]
    }

    /// Number of pixels with any garment coverage
    pub fn covered(&self) -> usize {
        self.coverage.iter().filter(|&&a| a > 0.0).count()
    }
}

/// Lay the warped garment over the base photograph.
///
/// Pixels the mask does not cover are copied from `base` unchanged.
pub fn composite(
    base: &RgbImage,
    warped: &RgbaImage,
    mode: CompositingMode,
    threshold: f32,
) -> Result<RgbImage, TryOnError> {
    let _span = tracing::debug_span!("composite").entered();

    if base.dimensions() != warped.dimensions() {
        return Err(TryOnError::DimensionMismatch {
            expected: base.dimensions(),
            actual: warped.dimensions(),
        });
    }

    let mask = AlphaMask::from_rgba(warped, mode, threshold);
    let mut out = base.clone();
    for (x, y, pixel) in out.enumerate_pixels_mut() {
        let a = mask.get(x, y);
        if a <= 0.0 {
            continue;
        }
        let garment = warped.get_pixel(x, y);
        if a >= 1.0 {
            *pixel = Rgb([garment[0], garment[1], garment[2]]);
            continue;
        }
        for c in 0..3 {
            let blended = garment[c] as f32 * a + pixel[c] as f32 * (1.0 - a);
            pixel[c] = blended.round().clamp(0.0, 255.0) as u8;
        }
    }

    tracing::debug!("Composited {} garment pixels ({:?})", mask.covered(), mode);
    Ok(out)
}
