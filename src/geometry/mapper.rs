use super::{Joint, LandmarkSet, Quadrilateral};
use crate::error::TryOnError;

/// Joints spanning the torso, in destination-corner order
pub const TORSO_JOINTS: [Joint; 4] = [
    Joint::LeftShoulder,
    Joint::RightShoulder,
    Joint::RightHip,
    Joint::LeftHip,
];

/// Destination quad for a garment: shoulders on top, hips at the bottom.
///
/// Corner order matches the garment's source corners (top-left, top-right,
/// bottom-right, bottom-left), so the garment's top-left lands on the left
/// shoulder.
pub fn torso_quad(landmarks: &LandmarkSet) -> Result<Quadrilateral, TryOnError> {
    let missing: Vec<Joint> = TORSO_JOINTS
        .iter()
        .copied()
        .filter(|&joint| landmarks.pixel(joint).is_none())
        .collect();
    if !missing.is_empty() {
        return Err(TryOnError::MissingLandmarks(missing));
    }

    let corners = TORSO_JOINTS.map(|joint| landmarks.pixel(joint).unwrap_or_default());
    let quad = Quadrilateral::new(corners);

    quad.check_non_degenerate()
        .map_err(TryOnError::DegenerateGeometry)?;

    tracing::debug!("Torso quad: {:?}", quad.corners);
    Ok(quad)
}
