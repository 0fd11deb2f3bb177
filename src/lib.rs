//! Garment try-on compositing.
//!
//! Projects a garment image onto the torso of a person in a photo, using
//! shoulder and hip landmarks from a pose estimator to place it.

pub mod config;
pub mod error;
pub mod geometry;
pub mod input;
pub mod output;
pub mod pipeline;
pub mod pose;
pub mod render;

pub use config::{CompositingMode, Interpolation, TryOnConfig};
pub use error::{ErrorKind, TryOnError};
pub use geometry::{Joint, LandmarkSet, Point2D, Quadrilateral};
pub use pipeline::{TryOnEngine, TryOnPipeline};
