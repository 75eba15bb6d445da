//! Application configuration model.
//!
//! Loaded from `config.toml` by the infrastructure layer. Every section and
//! field has a default, so a missing or partial file is valid.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::record::BarcodeFormat;

/// Key the record collection is stored under.
pub const DEFAULT_STORAGE_KEY: &str = "scanned_barcodes";

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct QrscanConfig {
    pub storage: StorageConfig,
    pub import: ImportConfig,
    pub decoder: DecoderConfig,
    pub logging: LoggingConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    pub key: String,
    /// Overrides the key-value store file location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            key: DEFAULT_STORAGE_KEY.to_string(),
            file: None,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ImportConfig {
    /// Symbologies accepted when decoding a picked image.
    pub formats: Vec<BarcodeFormat>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            formats: vec![BarcodeFormat::QrCode],
        }
    }
}

/// Settings for the zbar sidecar decoder used by desktop hosts.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DecoderConfig {
    pub zbarimg: String,
    pub zbarcam: String,
    pub video_device: PathBuf,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            zbarimg: "zbarimg".to_string(),
            zbarcam: "zbarcam".to_string(),
            video_device: PathBuf::from("/dev/video0"),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive when `RUST_LOG` is unset.
    pub level: String,
    /// Also write a daily rolling log file.
    pub file: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = QrscanConfig::default();
        assert_eq!(config.storage.key, "scanned_barcodes");
        assert!(config.storage.file.is_none());
        assert_eq!(config.import.formats, vec![BarcodeFormat::QrCode]);
        assert_eq!(config.decoder.zbarimg, "zbarimg");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: QrscanConfig = toml::from_str(
            r#"
[import]
formats = ["QR_CODE", "EAN_13"]

[logging]
level = "debug"
"#,
        )
        .unwrap();

        assert_eq!(
            config.import.formats,
            vec![BarcodeFormat::QrCode, BarcodeFormat::Ean13]
        );
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.file);
        assert_eq!(config.storage.key, DEFAULT_STORAGE_KEY);
    }
}
