use super::preprocess::Preprocessor;
use super::types::PoseEstimator;
use crate::geometry::{Joint, LandmarkSet, Point2D};
use anyhow::{Context, Result};
use image::RgbImage;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Tensor;
use std::path::Path;

/// Values per keypoint in the model output: y, x, score
const KEYPOINT_STRIDE: usize = 3;

/// MoveNet single-pose keypoint model
///
/// Emits the 17 COCO keypoints as (y, x, score) normalized to the input
/// frame. The session is loaded once and reused for every photo.
pub struct MoveNet {
    session: Option<Session>,
    preprocessor: Preprocessor,
    min_confidence: f32,
}

impl MoveNet {
    /// Create a new MoveNet model from an ONNX file
    ///
    /// # Arguments
    /// * `model_path` - Path to the ONNX model file
    /// * `input_size` - Square input resolution (192 for Lightning, 256 for Thunder)
    /// * `min_confidence` - Keypoints scoring below this are discarded
    pub fn new<P: AsRef<Path>>(model_path: P, input_size: u32, min_confidence: f32) -> Result<Self> {
        let path = model_path.as_ref();

        tracing::info!("Loading MoveNet model from {}", path.display());

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(4)?
            .commit_from_file(path)
            .with_context(|| format!("Failed to load model from {}", path.display()))?;

        tracing::info!("MoveNet model loaded ({0}x{0} input)", input_size);

        Ok(Self {
            session: Some(session),
            preprocessor: Preprocessor::new(input_size, input_size),
            min_confidence,
        })
    }
}

/// Turn raw MoveNet output into landmarks for a `width` x `height` photo.
///
/// Returns `None` if no keypoint reaches `min_confidence`.
pub(crate) fn decode_keypoints(
    output: &[f32],
    width: u32,
    height: u32,
    min_confidence: f32,
) -> Result<Option<LandmarkSet>> {
    anyhow::ensure!(
        output.len() >= Joint::COCO.len() * KEYPOINT_STRIDE,
        "expected {} keypoint values, got {}",
        Joint::COCO.len() * KEYPOINT_STRIDE,
        output.len()
    );

    let mut landmarks = LandmarkSet::normalized(width, height);
    for (joint, kp) in Joint::COCO.iter().zip(output.chunks_exact(KEYPOINT_STRIDE)) {
        let (y, x, score) = (kp[0], kp[1], kp[2]);
        if !(score >= min_confidence) || !x.is_finite() || !y.is_finite() {
            tracing::debug!("Dropping {:?} (score {:.2})", joint, score);
            continue;
        }
        landmarks.insert(*joint, Point2D::new(x as f64, y as f64), score);
    }

    if landmarks.is_empty() {
        return Ok(None);
    }
    Ok(Some(landmarks))
}

impl PoseEstimator for MoveNet {
    fn estimate(&mut self, image: &RgbImage) -> Result<Option<LandmarkSet>> {
        let _span = tracing::debug_span!("movenet_estimate").entered();

        let session = self
            .session
            .as_mut()
            .context("MoveNet session has been shut down")?;

        let input = self.preprocessor.preprocess(image)?;
        let (n, h, w, c) = input.dim();
        let input = Tensor::from_array(([n, h, w, c], input.into_raw_vec()))?;

        let _infer_span = tracing::debug_span!("inference").entered();
        let outputs = session
            .run(ort::inputs![input])
            .context("Failed to run inference")?;
        drop(_infer_span);

        // Keypoints: shape [1, 1, 17, 3]
        let (_, keypoints) = outputs[0].try_extract_tensor::<f32>()?;

        let (width, height) = image.dimensions();
        decode_keypoints(keypoints, width, height, self.min_confidence)
    }

    fn shutdown(&mut self) {
        if self.session.take().is_some() {
            tracing::info!("MoveNet session released");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_output(score: f32) -> Vec<f32> {
        let mut out = Vec::new();
        for i in 0..17 {
            out.extend_from_slice(&[0.1 + i as f32 * 0.01, 0.2, score]);
        }
        out
    }

    #[test]
    fn decodes_yx_order() -> Result<()> {
        let set = decode_keypoints(&raw_output(0.9), 400, 600, 0.3)?.expect("pose");
        assert_eq!(set.len(), 17);
        let shoulder = set.pixel(Joint::LeftShoulder).expect("shoulder");
        assert!((shoulder.x - 80.0).abs() < 1e-3);
        assert!((shoulder.y - 0.15 * 600.0).abs() < 1e-3);
        Ok(())
    }

    #[test]
    fn low_scores_mean_no_pose() -> Result<()> {
        assert!(decode_keypoints(&raw_output(0.1), 400, 600, 0.3)?.is_none());
        Ok(())
    }

    #[test]
    fn drops_individual_low_scores() -> Result<()> {
        let mut raw = raw_output(0.9);
        raw[12 * 3 + 2] = 0.05;
        let set = decode_keypoints(&raw, 400, 600, 0.3)?.expect("pose");
        assert!(set.get(Joint::RightHip).is_none());
        assert!(set.get(Joint::LeftHip).is_some());
        Ok(())
    }

    #[test]
    fn drops_non_finite_keypoints() -> Result<()> {
        let mut raw = raw_output(0.9);
        raw[5 * 3] = f32::NAN;
        raw[6 * 3 + 2] = f32::NAN;
        let set = decode_keypoints(&raw, 400, 600, 0.3)?.expect("pose");
        assert!(set.get(Joint::LeftShoulder).is_none());
        assert!(set.get(Joint::RightShoulder).is_none());
        assert_eq!(set.len(), 15);
        Ok(())
    }

    #[test]
    fn rejects_short_output() {
        assert!(decode_keypoints(&[0.0; 10], 400, 600, 0.3).is_err());
    }
}
