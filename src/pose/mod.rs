mod fixed;
mod movenet;
mod preprocess;
pub mod types;

pub use fixed::StaticPose;
pub use movenet::MoveNet;
pub use preprocess::Preprocessor;
pub use types::PoseEstimator;

use anyhow::Result;

/// Create a default pose estimator (MoveNet single-pose)
pub fn create_default_estimator(
    model_path: &str,
    input_size: u32,
    min_confidence: f32,
) -> Result<Box<dyn PoseEstimator>> {
    let model = MoveNet::new(model_path, input_size, min_confidence)?;
    Ok(Box::new(model))
}
