use crate::error::TryOnError;
use clap::ValueEnum;

/// How the warped garment is combined with the base photograph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum CompositingMode {
    /// Garment pixel replaces the base pixel wherever its coverage exceeds the threshold
    #[default]
    HardCutout,
    /// Weighted blend `garment * a + base * (1 - a)` using normalized alpha
    AlphaBlend,
}

/// Sampling used when resampling the garment through the homography
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Interpolation {
    Nearest,
    #[default]
    Bilinear,
}

/// Tunables for a single try-on invocation.
///
/// Defaults reproduce a hard cutout on any non-zero coverage with bilinear
/// sampling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TryOnConfig {
    pub compositing: CompositingMode,
    /// Normalized coverage in [0, 1) a garment pixel must exceed to be drawn
    pub alpha_threshold: f32,
    pub interpolation: Interpolation,
}

impl Default for TryOnConfig {
    fn default() -> Self {
        Self {
            compositing: CompositingMode::HardCutout,
            alpha_threshold: 0.0,
            interpolation: Interpolation::Bilinear,
        }
    }
}

impl TryOnConfig {
    /// Rejects an alpha threshold outside [0, 1), NaN included
    pub fn validate(&self) -> Result<(), TryOnError> {
        if !(0.0..1.0).contains(&self.alpha_threshold) {
            return Err(TryOnError::InvalidConfig(format!(
                "alpha threshold must be in [0, 1), got {}",
                self.alpha_threshold
            )));
        }
        Ok(())
    }
}
