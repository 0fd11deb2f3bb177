mod file;

pub use file::FileSink;

use crate::error::TryOnError;
use image::RgbImage;

/// Trait for output destinations
pub trait OutputSink {
    /// Write a finished try-on image to the output
    fn write_image(&mut self, image: &RgbImage) -> Result<(), TryOnError>;
}
