use super::OutputSink;
use crate::error::TryOnError;
use image::{ImageFormat, RgbImage};
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Writes images to a file, format chosen from the extension
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn failed(&self, reason: impl ToString) -> TryOnError {
        TryOnError::WriteFailed {
            path: self.path.clone(),
            reason: reason.to_string(),
        }
    }
}

impl OutputSink for FileSink {
    fn write_image(&mut self, image: &RgbImage) -> Result<(), TryOnError> {
        let _span = tracing::debug_span!("encode").entered();

        let format = ImageFormat::from_path(&self.path).map_err(|err| self.failed(err))?;

        // Encode fully before touching the filesystem so a failed encode
        // leaves no partial file behind.
        let mut encoded = Cursor::new(Vec::new());
        image
            .write_to(&mut encoded, format)
            .map_err(|err| self.failed(err))?;

        std::fs::write(&self.path, encoded.into_inner()).map_err(|err| self.failed(err))?;

        tracing::info!("Saved result to {}", self.path.display());
        Ok(())
    }
}
