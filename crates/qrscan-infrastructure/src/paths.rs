//! Unified path management for qrscan files.
//!
//! All locations are resolved via AppPaths from the version-migrate crate so
//! every platform gets its native config/data directories.

use std::path::PathBuf;
use version_migrate::AppPaths;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for qrscan_core::ScanError {
    fn from(err: PathError) -> Self {
        qrscan_core::ScanError::config(err.to_string())
    }
}

/// Unified path management for qrscan.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/qrscan/            # Config directory (AppPaths default)
/// ├── config.toml              # Application configuration
/// └── logs/                    # Application logs
///     └── qrscan.log.YYYY-MM-DD
///
/// ~/.local/share/qrscan/       # Data directory
/// └── store.json               # Key-value store (scanned records)
/// ```
pub struct QrscanPaths;

impl QrscanPaths {
    fn app_paths() -> AppPaths {
        AppPaths::new("qrscan")
    }

    /// Returns the qrscan configuration directory (e.g. `~/.config/qrscan/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        Self::app_paths()
            .config_dir()
            .map_err(|_| PathError::HomeDirNotFound)
    }

    /// Returns the qrscan data directory (e.g. `~/.local/share/qrscan/`).
    pub fn data_dir() -> Result<PathBuf, PathError> {
        Self::app_paths()
            .data_dir()
            .map_err(|_| PathError::HomeDirNotFound)
    }

    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// The key-value store file holding persisted records.
    pub fn store_file() -> Result<PathBuf, PathError> {
        Ok(Self::data_dir()?.join("store.json"))
    }

    pub fn log_dir() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("logs"))
    }
}
