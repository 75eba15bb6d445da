//! Configuration loading.
//!
//! Reads `config.toml` from the qrscan config directory. A missing file means
//! defaults; a file that does not parse is a configuration error.

use std::path::{Path, PathBuf};

use qrscan_core::config::QrscanConfig;
use qrscan_core::error::{Result, ScanError};

use crate::paths::QrscanPaths;

/// Loads [`QrscanConfig`] from a TOML file.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    /// Uses the default location (`<config_dir>/config.toml`).
    pub fn new() -> Result<Self> {
        Ok(Self {
            path: QrscanPaths::config_file()?,
        })
    }

    /// Uses an explicit file (for `--config` and tests).
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> Result<QrscanConfig> {
        if !tokio::fs::try_exists(&self.path).await.unwrap_or(false) {
            tracing::debug!(
                "[Config] No config file at {:?}, using defaults",
                self.path
            );
            return Ok(QrscanConfig::default());
        }

        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| ScanError::io(format!("Failed to read config file: {}", e)))?;

        let config: QrscanConfig = toml::from_str(&content).map_err(|e| {
            ScanError::config(format!("Invalid config file {:?}: {}", self.path, e))
        })?;

        tracing::debug!("[Config] Loaded config from {:?}", self.path);
        Ok(config)
    }
}
