use crate::error::TryOnError;
use image::{DynamicImage, RgbImage, RgbaImage};
use std::path::Path;

fn decode(path: &Path) -> Result<DynamicImage, TryOnError> {
    let _span = tracing::debug_span!("decode").entered();

    let image = image::open(path).map_err(|err| TryOnError::ImageLoadFailed {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;

    if image.width() == 0 || image.height() == 0 {
        return Err(TryOnError::ImageLoadFailed {
            path: path.to_path_buf(),
            reason: "image is empty".into(),
        });
    }

    tracing::debug!(
        "Decoded {} ({}x{}, {:?})",
        path.display(),
        image.width(),
        image.height(),
        image.color()
    );
    Ok(image)
}

/// Load the user's photo as 3-channel RGB; any alpha is discarded
pub fn load_base<P: AsRef<Path>>(path: P) -> Result<RgbImage, TryOnError> {
    Ok(decode(path.as_ref())?.to_rgb8())
}

/// Load a garment image, which must carry an alpha channel
pub fn load_garment<P: AsRef<Path>>(path: P) -> Result<RgbaImage, TryOnError> {
    let path = path.as_ref();
    let image = decode(path)?;
    if !image.color().has_alpha() {
        return Err(TryOnError::ImageLoadFailed {
            path: path.to_path_buf(),
            reason: format!("garment has no alpha channel ({:?})", image.color()),
        });
    }
    Ok(image.to_rgba8())
}
