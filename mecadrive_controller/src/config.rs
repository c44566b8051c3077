//! TOML configuration loader with validation.
//!
//! Loads a [`ControllerConfig`] from a single TOML file and runs all
//! validation rules. Any failure here is fatal to initialization — a
//! controller with invalid geometry never reaches Active.

use std::path::Path;

use thiserror::Error;

use mecadrive_common::config::ControllerConfig;

/// Configuration loading/validation error.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O error.
    #[error("config I/O error: {0}")]
    Io(String),

    /// TOML parse error.
    #[error("config parse error: {0}")]
    Parse(String),

    /// Parameter validation error.
    #[error("config validation: {0}")]
    Validation(String),
}

/// Load and validate the controller configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ControllerConfig, ConfigError> {
    let toml_src = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::Io(format!("failed to read {}: {e}", path.display())))?;

    let config: ControllerConfig =
        toml::from_str(&toml_src).map_err(|e| ConfigError::Parse(e.to_string()))?;

    config.validate().map_err(ConfigError::Validation)?;

    Ok(config)
}
