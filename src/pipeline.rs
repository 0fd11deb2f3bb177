//! Try-on orchestration.
//!
//! [`TryOnPipeline`] is the pure in-memory core: landmarks in, composited
//! photo out. [`TryOnEngine`] wraps it with the decode, pose and encode
//! collaborators to serve the path-based entry point.

use crate::config::TryOnConfig;
use crate::error::TryOnError;
use crate::geometry::{torso_quad, Homography, LandmarkSet, Quadrilateral};
use crate::input;
use crate::output::{FileSink, OutputSink};
use crate::pose::PoseEstimator;
use crate::render::{composite, warp_garment};
use image::{RgbImage, RgbaImage};
use std::path::Path;
use std::time::Instant;

/// Overlays a garment onto a photo at the torso described by landmarks.
///
/// Holds only configuration, so one pipeline may serve any number of
/// concurrent calls.
#[derive(Debug, Clone, Default)]
pub struct TryOnPipeline {
    config: TryOnConfig,
}

impl TryOnPipeline {
    /// Fails with `InvalidConfig` if `config` does not validate
    pub fn new(config: TryOnConfig) -> Result<Self, TryOnError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TryOnConfig {
        &self.config
    }

    /// Composite `garment` onto `base`.
    ///
    /// The first failing stage aborts the call and its error is returned
    /// unchanged.
    pub fn apply(
        &self,
        base: &RgbImage,
        garment: &RgbaImage,
        landmarks: &LandmarkSet,
    ) -> Result<RgbImage, TryOnError> {
        let _span = tracing::debug_span!("tryon_apply").entered();

        if base.width() == 0 || base.height() == 0 {
            return Err(TryOnError::ImageLoadFailed {
                path: "<base>".into(),
                reason: "image is empty".into(),
            });
        }
        if garment.width() == 0 || garment.height() == 0 {
            return Err(TryOnError::ImageLoadFailed {
                path: "<garment>".into(),
                reason: "image is empty".into(),
            });
        }
        if landmarks.dimensions() != base.dimensions() {
            return Err(TryOnError::DimensionMismatch {
                expected: base.dimensions(),
                actual: landmarks.dimensions(),
            });
        }

        let dst = torso_quad(landmarks)?;
        let src = Quadrilateral::from_size(garment.width(), garment.height());
        let h = Homography::estimate(&src, &dst)?;
        let warped = warp_garment(garment, &h, base.dimensions(), self.config.interpolation)?;
        composite(
            base,
            &warped,
            self.config.compositing,
            self.config.alpha_threshold,
        )
    }
}

/// Path-based try-on service around a long-lived pose estimator.
///
/// The estimator is created by the caller, reused for every request, and
/// released by [`TryOnEngine::shutdown`].
pub struct TryOnEngine<E: PoseEstimator> {
    estimator: E,
    pipeline: TryOnPipeline,
}

impl<E: PoseEstimator> TryOnEngine<E> {
    pub fn new(estimator: E, config: TryOnConfig) -> Result<Self, TryOnError> {
        let pipeline = TryOnPipeline::new(config)?;
        tracing::info!("TryOnEngine initialized ({:?})", config);
        Ok(Self {
            estimator,
            pipeline,
        })
    }

    pub fn pipeline(&self) -> &TryOnPipeline {
        &self.pipeline
    }

    /// Detect landmarks in an already decoded photo
    pub fn landmarks(&mut self, base: &RgbImage) -> Result<LandmarkSet, TryOnError> {
        let _span = tracing::debug_span!("pose").entered();

        match self.estimator.estimate(base) {
            Ok(Some(landmarks)) => {
                tracing::debug!("Detected {} landmarks", landmarks.len());
                Ok(landmarks)
            }
            Ok(None) => Err(TryOnError::NoPoseDetected(
                "no person found in the photo".into(),
            )),
            Err(err) => Err(TryOnError::EstimatorFailed(format!("{err:#}"))),
        }
    }

    /// Render `garment_path` onto `base_path` and save it to `output_path`.
    ///
    /// Nothing is written unless every stage succeeds.
    pub fn apply<P, Q, R>(
        &mut self,
        base_path: P,
        garment_path: Q,
        output_path: R,
    ) -> Result<(), TryOnError>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
        R: AsRef<Path>,
    {
        let start = Instant::now();

        let base = input::load_base(base_path)?;
        let garment = input::load_garment(garment_path)?;
        let landmarks = self.landmarks(&base)?;
        let result = self.pipeline.apply(&base, &garment, &landmarks)?;
        FileSink::new(output_path).write_image(&result)?;

        tracing::info!(
            "Try-on finished in {:.1}ms",
            start.elapsed().as_secs_f64() * 1000.0
        );
        Ok(())
    }

    /// Release the estimator
    pub fn shutdown(mut self) {
        self.estimator.shutdown();
        tracing::info!("TryOnEngine shut down");
    }
}
