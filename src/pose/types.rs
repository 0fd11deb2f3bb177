use crate::geometry::LandmarkSet;
use anyhow::Result;
use image::RgbImage;

/// Trait for pose estimators
/// Allows swapping between different backends (MoveNet, fixed landmarks)
///
/// An estimator is created once and reused across requests. Callers that
/// share one between threads must serialize access themselves.
pub trait PoseEstimator {
    /// Detect body joints in a photo
    ///
    /// # Arguments
    /// * `image` - Input RGB photo
    ///
    /// # Returns
    /// * `Ok(Some(landmarks))` with coordinates normalized to the image size
    /// * `Ok(None)` when no person was found
    /// * `Err` when the estimator itself failed
    fn estimate(&mut self, image: &RgbImage) -> Result<Option<LandmarkSet>>;

    /// Release backend resources
    ///
    /// Default implementation: no-op for estimators that hold nothing
    fn shutdown(&mut self) {}
}

impl<E: PoseEstimator + ?Sized> PoseEstimator for Box<E> {
    fn estimate(&mut self, image: &RgbImage) -> Result<Option<LandmarkSet>> {
        (**self).estimate(image)
    }

    fn shutdown(&mut self) {
        (**self).shutdown()
    }
}
