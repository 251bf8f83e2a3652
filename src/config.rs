use serde::{Deserialize, Serialize};

use crate::error::VectorizeError;

/// All vectorization parameters in one struct.
/// Serializable so presets can be saved as JSON; every field falls back
/// to its default when missing from a preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorizeConfig {
    /// Douglas–Peucker distance threshold in pixels.
    /// 0 keeps every ordered point; larger = fewer points.
    pub smoothness: f64,
    /// Corner detection for components without endpoints or branches.
    pub corner: CornerConfig,
    /// Budget for the exact path search.
    pub search: SearchConfig,
}

/// Corner detection parameters for the vertex-free loop fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CornerConfig {
    /// Turning angle (radians) above which a loop pixel counts as a corner.
    /// Lower = more corners.
    pub sensitivity: f64,
    /// Neighbor distance (in loop pixels) used to estimate the turning angle.
    pub window: usize,
    /// Minimum number of loop pixels between two accepted corners.
    pub min_separation: usize,
    /// Corners forced onto a loop even when none clears `sensitivity`.
    pub min_corners: usize,
    pub max_corners: usize,
}

/// Limits for the exact Hamiltonian path search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Node expansions allowed per edge before falling back to the heuristic.
    pub max_steps: u64,
    /// Wall-clock limit per edge, in milliseconds.
    pub max_millis: u64,
    /// Improvement passes of 2-opt after nearest-neighbor chaining.
    pub two_opt_passes: usize,
}

/// How a source image becomes a binary skeleton.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadConfig {
    /// Brightness threshold. Pixels brighter than it are foreground.
    pub threshold: ThresholdMethod,
    /// If true, dark pixels are foreground instead.
    pub invert: bool,
}

/// Threshold method for binarization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdMethod {
    /// Fixed brightness threshold (0-255).
    Fixed(u8),
    /// Otsu's method (automatic).
    Otsu,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            threshold: ThresholdMethod::Fixed(127),
            invert: false,
        }
    }
}

impl Default for VectorizeConfig {
    fn default() -> Self {
        Self {
            smoothness: 1.0,
            corner: CornerConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

impl Default for CornerConfig {
    fn default() -> Self {
        Self {
            sensitivity: 0.6,
            window: 3,
            min_separation: 4,
            min_corners: 3,
            max_corners: 16,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_steps: 200_000,
            max_millis: 50,
            two_opt_passes: 16,
        }
    }
}

impl VectorizeConfig {
    /// Load a JSON preset. Missing fields keep their defaults.
    pub fn from_json(text: &str) -> Result<Self, VectorizeError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), VectorizeError> {
        if !self.smoothness.is_finite() || self.smoothness < 0.0 {
            return Err(VectorizeError::InvalidConfig(format!(
                "smoothness must be a finite value >= 0, got {}",
                self.smoothness
            )));
        }
        if !self.corner.sensitivity.is_finite() || self.corner.sensitivity < 0.0 {
            return Err(VectorizeError::InvalidConfig(format!(
                "corner sensitivity must be a finite angle >= 0, got {}",
                self.corner.sensitivity
            )));
        }
        if self.corner.window == 0 {
            return Err(VectorizeError::InvalidConfig(
                "corner window must be at least 1".to_string(),
            ));
        }
        if self.corner.min_corners > self.corner.max_corners {
            return Err(VectorizeError::InvalidConfig(format!(
                "min_corners ({}) exceeds max_corners ({})",
                self.corner.min_corners, self.corner.max_corners
            )));
        }
        Ok(())
    }
}
