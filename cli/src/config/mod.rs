//! Configuration management for n8r.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{ApiConfig, N8rConfig};

use std::path::Path;

use crate::error::{N8rError, Result};

/// Load configuration from the settings file under `paths`.
///
/// If the settings file doesn't exist, returns default configuration.
pub fn load_config(paths: &AppPaths) -> Result<N8rConfig> {
    load_config_from(&paths.config_file())
}

/// Load configuration from a specific path.
///
/// If the file doesn't exist, returns default configuration.
pub fn load_config_from(path: &Path) -> Result<N8rConfig> {
    if !path.exists() {
        return Ok(N8rConfig::default().with_env_overrides());
    }

    let contents = std::fs::read_to_string(path)
        .map_err(|e| N8rError::ConfigRead(format!("{}: {e}", path.display())))?;
    let config: N8rConfig =
        toml::from_str(&contents).map_err(|e| N8rError::ConfigRead(e.to_string()))?;

    Ok(config.with_env_overrides())
}
