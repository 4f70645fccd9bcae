//! Lighting engine configuration
//!
//! Every field has a default, so an empty TOML document is a valid config.
//!
//! ```toml
//! max_light_adds_per_frame = 500
//! max_light_removes_per_frame = 300
//! max_mesh_regenerations_per_frame = 10
//! day_length_seconds = 1200.0
//! start_hour = 12.0
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{budget, time};
use crate::error::{invalid_config, LightingError, LightingResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    pub max_light_adds_per_frame: usize,
    pub max_light_removes_per_frame: usize,
    pub max_mesh_regenerations_per_frame: usize,
    pub day_length_seconds: f32,
    pub start_hour: f32,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            max_light_adds_per_frame: budget::MAX_LIGHT_ADDS_PER_FRAME,
            max_light_removes_per_frame: budget::MAX_LIGHT_REMOVES_PER_FRAME,
            max_mesh_regenerations_per_frame: budget::MAX_MESH_REGENERATIONS_PER_FRAME,
            day_length_seconds: time::DEFAULT_DAY_LENGTH_SECONDS,
            start_hour: time::DEFAULT_START_HOUR,
        }
    }
}

impl LightingConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(raw: &str) -> LightingResult<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> LightingResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| LightingError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Copy with every invalid field replaced: zero quotas become 1, a
    /// non-positive day length or out-of-range start hour takes the default
    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        let day_length = self.day_length_seconds;
        Self {
            max_light_adds_per_frame: self.max_light_adds_per_frame.max(1),
            max_light_removes_per_frame: self.max_light_removes_per_frame.max(1),
            max_mesh_regenerations_per_frame: self.max_mesh_regenerations_per_frame.max(1),
            day_length_seconds: if day_length.is_finite() && day_length > 0.0 {
                day_length
            } else {
                defaults.day_length_seconds
            },
            start_hour: if (0.0..24.0).contains(&self.start_hour) {
                self.start_hour
            } else {
                defaults.start_hour
            },
        }
    }

    /// Reject quotas that would stall the engine forever
    pub fn validate(&self) -> LightingResult<()> {
        if self.max_light_adds_per_frame == 0 {
            return Err(invalid_config("max_light_adds_per_frame", "must be at least 1"));
        }
        if self.max_light_removes_per_frame == 0 {
            return Err(invalid_config("max_light_removes_per_frame", "must be at least 1"));
        }
        if self.max_mesh_regenerations_per_frame == 0 {
            return Err(invalid_config(
                "max_mesh_regenerations_per_frame",
                "must be at least 1",
            ));
        }
        if !(self.day_length_seconds > 0.0) {
            return Err(invalid_config(
                "day_length_seconds",
                format!("must be positive, got {}", self.day_length_seconds),
            ));
        }
        if !(0.0..24.0).contains(&self.start_hour) {
            return Err(invalid_config(
                "start_hour",
                format!("must be within [0, 24), got {}", self.start_hour),
            ));
        }
        Ok(())
    }
}
