//! Per-user filesystem locations for n8r.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{N8rError, Result};

/// Name of the configuration directory under the user's home.
pub const CONFIG_DIR_NAME: &str = ".n8r";

/// Name of the credentials file inside the configuration directory.
pub const CREDENTIALS_FILE: &str = "credentials.json";

/// Name of the optional settings file inside the configuration directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Resolved locations of the n8r configuration directory and its files.
#[derive(Debug, Clone)]
pub struct AppPaths {
    config_dir: PathBuf,
}

impl AppPaths {
    /// Resolves `~/.n8r` for the current user without touching the filesystem.
    ///
    /// # Errors
    ///
    /// Returns [`N8rError::Environment`] if the home directory cannot be determined.
    pub fn from_home() -> Result<Self> {
        let home = dirs::home_dir().ok_or_else(|| {
            N8rError::Environment("cannot determine home directory".to_string())
        })?;
        Ok(Self::with_home(&home))
    }

    /// Roots the configuration directory under an explicit home directory.
    pub fn with_home(home: &Path) -> Self {
        Self {
            config_dir: home.join(CONFIG_DIR_NAME),
        }
    }

    /// Path of the settings file.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE)
    }

    /// Path of the credentials file.
    pub fn credentials_file(&self) -> PathBuf {
        self.config_dir.join(CREDENTIALS_FILE)
    }

    /// Ensures the configuration directory exists with owner-only permissions.
    ///
    /// # Errors
    ///
    /// Returns [`N8rError::Environment`] if the directory cannot be created.
    pub fn ensure_config_dir(&self) -> Result<&Path> {
        if !self.config_dir.exists() {
            create_private_dir(&self.config_dir).map_err(|e| {
                N8rError::Environment(format!("{}: {e}", self.config_dir.display()))
            })?;
            tracing::debug!(dir = %self.config_dir.display(), "created config directory");
        }
        Ok(&self.config_dir)
    }
}

#[cfg(unix)]
fn create_private_dir(dir: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;

    fs::DirBuilder::new().recursive(true).mode(0o700).create(dir)
}

#[cfg(not(unix))]
fn create_private_dir(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)
}
