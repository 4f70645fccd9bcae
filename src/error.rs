//! Lighting error handling
//!
//! Light propagation itself never fails: unloaded voxels read as darkness and
//! quota overruns only defer work. The fallible surface is configuration.

use std::path::PathBuf;

/// Type alias for lighting results
pub type LightingResult<T> = Result<T, LightingError>;

#[derive(Debug, thiserror::Error)]
pub enum LightingError {
    #[error("Failed to read config {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid configuration: {field}: {reason}")]
    InvalidConfig { field: String, reason: String },
}

/// Create an invalid configuration error
pub fn invalid_config(field: &str, reason: impl std::fmt::Display) -> LightingError {
    LightingError::InvalidConfig {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
