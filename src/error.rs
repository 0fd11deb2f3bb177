use crate::geometry::Joint;
use std::path::PathBuf;

/// Coarse classification of a try-on failure, as reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidConfig,
    ImageLoadFailed,
    NoPoseDetected,
    EstimatorFailed,
    MissingLandmarks,
    DegenerateGeometry,
    SingularTransform,
    DimensionMismatch,
    WriteFailed,
}

/// Errors produced by the try-on core and its collaborators.
///
/// Every failure is fatal to the request it belongs to. Nothing here is
/// retried: geometry failures mean the photo is unsuitable, not that the
/// operation might succeed on a second attempt.
#[derive(Debug, thiserror::Error)]
pub enum TryOnError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to load image {}: {reason}", path.display())]
    ImageLoadFailed { path: PathBuf, reason: String },

    #[error("no pose detected: {0}")]
    NoPoseDetected(String),

    #[error("pose estimator failed: {0}")]
    EstimatorFailed(String),

    #[error("missing required landmarks: {0:?}")]
    MissingLandmarks(Vec<Joint>),

    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("singular transform: {0}")]
    SingularTransform(String),

    #[error("dimension mismatch: expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("failed to write {}: {reason}", path.display())]
    WriteFailed { path: PathBuf, reason: String },
}

impl TryOnError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidConfig(_) => ErrorKind::InvalidConfig,
            Self::ImageLoadFailed { .. } => ErrorKind::ImageLoadFailed,
            Self::NoPoseDetected(_) => ErrorKind::NoPoseDetected,
            Self::EstimatorFailed(_) => ErrorKind::EstimatorFailed,
            Self::MissingLandmarks(_) => ErrorKind::MissingLandmarks,
            Self::DegenerateGeometry(_) => ErrorKind::DegenerateGeometry,
            Self::SingularTransform(_) => ErrorKind::SingularTransform,
            Self::DimensionMismatch { .. } => ErrorKind::DimensionMismatch,
            Self::WriteFailed { .. } => ErrorKind::WriteFailed,
        }
    }
}
