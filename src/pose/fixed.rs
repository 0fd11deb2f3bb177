use super::types::PoseEstimator;
use crate::geometry::{LandmarkSet, Point2D, TORSO_JOINTS};
use anyhow::Result;
use image::RgbImage;

/// Estimator that reports the same normalized torso for every photo
///
/// Useful when landmarks were computed elsewhere and passed on the command
/// line, and in tests.
pub struct StaticPose {
    torso: [Point2D; 4],
}

impl StaticPose {
    /// `torso` in destination order: left shoulder, right shoulder, right hip, left hip
    pub fn new(torso: [Point2D; 4]) -> Self {
        Self { torso }
    }

    /// Parse `lsx,lsy,rsx,rsy,rhx,rhy,lhx,lhy` as normalized coordinates
    pub fn parse(torso: &str) -> Result<Self> {
        let values = torso
            .split(',')
            .map(|v| v.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()?;
        anyhow::ensure!(
            values.len() == 8,
            "expected 8 comma-separated values, got {}",
            values.len()
        );
        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            anyhow::bail!("torso coordinates must be finite, got {bad}");
        }
        let point = |i: usize| Point2D::new(values[2 * i], values[2 * i + 1]);
        Ok(Self::new([point(0), point(1), point(2), point(3)]))
    }
}

impl PoseEstimator for StaticPose {
    fn estimate(&mut self, image: &RgbImage) -> Result<Option<LandmarkSet>> {
        let (width, height) = image.dimensions();
        let mut landmarks = LandmarkSet::normalized(width, height);
        for (joint, point) in TORSO_JOINTS.iter().zip(self.torso.iter()) {
            landmarks.insert(*joint, *point, 1.0);
        }
        Ok(Some(landmarks))
    }
}
