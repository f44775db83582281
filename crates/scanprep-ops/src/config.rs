//! Operator settings.
//!
//! Every section defaults to the values the workflow panel ships with, and
//! missing JSON fields fall back to those defaults.

use serde::{Deserialize, Serialize};

use crate::engine::BooleanSolver;
use crate::error::{OpError, OpResult};

/// Settings for the bounds cube and the crop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CutSettings {
    /// Edge length of the spawned bounds cube. Default: 2.0
    pub bounds_size: f32,
    /// Boolean solver used for the crop. Default: Fast
    pub solver: BooleanSolver,
}

impl Default for CutSettings {
    fn default() -> Self {
        Self {
            bounds_size: 2.0,
            solver: BooleanSolver::Fast,
        }
    }
}

/// Parameters for low-poly generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LowPolyParams {
    /// Fraction of faces kept by the collapse pass (0.0 to 1.0). Default: 0.01
    pub collapse_ratio: f32,
    /// Angle limit of the planar pass in degrees. Default: 5.0
    pub planar_angle_degrees: f32,
}

impl Default for LowPolyParams {
    fn default() -> Self {
        Self {
            collapse_ratio: 0.01,
            planar_angle_degrees: 5.0,
        }
    }
}

impl LowPolyParams {
    /// Create params with a specific collapse ratio.
    #[must_use]
    pub fn with_collapse_ratio(ratio: f32) -> Self {
        Self {
            collapse_ratio: ratio,
            ..Default::default()
        }
    }

    /// Set the planar angle limit.
    #[must_use]
    pub const fn with_planar_angle(mut self, degrees: f32) -> Self {
        self.planar_angle_degrees = degrees;
        self
    }

    pub fn planar_angle_radians(&self) -> f32 {
        self.planar_angle_degrees.to_radians()
    }

    pub fn validate(&self) -> OpResult<()> {
        if !(0.0..=1.0).contains(&self.collapse_ratio) {
            return Err(OpError::InvalidParameter {
                name: "collapse_ratio",
                reason: format!("{} is outside 0.0..=1.0", self.collapse_ratio),
            });
        }
        if !(self.planar_angle_degrees >= 0.0) {
            return Err(OpError::InvalidParameter {
                name: "planar_angle_degrees",
                reason: format!("{} is negative", self.planar_angle_degrees),
            });
        }
        Ok(())
    }
}

/// Settings for UV unwrapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UvSettings {
    /// Meshes with this many vertices or more are not unwrapped. Default: 40000
    pub max_vertices: usize,
}

impl Default for UvSettings {
    fn default() -> Self {
        Self {
            max_vertices: 40_000,
        }
    }
}

/// Largest bake texture edge accepted by [`BakeSettings::validate`]
pub const MAX_BAKE_RESOLUTION: u32 = 16_384;

/// Settings for the diffuse bake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BakeSettings {
    /// Width and height of the baked texture. Default: 2048
    pub resolution: u32,
    /// Cage extrusion distance. Default: 0.1
    pub cage_extrusion: f32,
}

impl Default for BakeSettings {
    fn default() -> Self {
        Self {
            resolution: 2048,
            cage_extrusion: 0.1,
        }
    }
}

impl BakeSettings {
    pub fn validate(&self) -> OpResult<()> {
        if self.resolution == 0 || self.resolution > MAX_BAKE_RESOLUTION {
            return Err(OpError::InvalidParameter {
                name: "resolution",
                reason: format!(
                    "{} is outside 1..={MAX_BAKE_RESOLUTION}",
                    self.resolution
                ),
            });
        }
        if !(self.cage_extrusion >= 0.0) {
            return Err(OpError::InvalidParameter {
                name: "cage_extrusion",
                reason: format!("{} is negative", self.cage_extrusion),
            });
        }
        Ok(())
    }
}

/// All operator settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub cut: CutSettings,
    pub low_poly: LowPolyParams,
    pub uv: UvSettings,
    pub bake: BakeSettings,
}

impl WorkflowConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> OpResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> OpResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> OpResult<()> {
        if !(self.cut.bounds_size > 0.0) {
            return Err(OpError::InvalidParameter {
                name: "bounds_size",
                reason: format!("{} is not positive", self.cut.bounds_size),
            });
        }
        self.low_poly.validate()?;
        self.bake.validate()
    }
}
