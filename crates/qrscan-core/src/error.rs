//! Error types for QRSCAN.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::session::FlowKind;

/// A shared error type for the whole workflow.
///
/// User-facing outcomes (`PermissionDenied`, `NoBarcodeFound`, ...) live next
/// to infrastructure failures so a single `Result` flows from the capability
/// calls up to the action handler boundary.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum ScanError {
    /// Camera permission was not granted (or only a prompt state came back).
    #[error("Camera permission denied")]
    PermissionDenied,

    /// Image import decoded zero barcodes.
    #[error("No barcode found in the selected image")]
    NoBarcodeFound,

    /// The file picker returned no file.
    #[error("Image selection cancelled")]
    PickCancelled,

    /// The persisted record collection could not be parsed.
    ///
    /// The raw value has been copied to `backup_key` (when set) before this
    /// error is returned.
    #[error("Stored records under '{key}' are corrupt: {message}")]
    StorageReadCorrupt {
        key: String,
        backup_key: Option<String>,
        message: String,
    },

    /// Another flow of the same kind is still running.
    #[error("{0} already in progress")]
    Busy(FlowKind),

    /// The action task was cancelled before it completed.
    #[error("Action cancelled")]
    Cancelled,

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound { entity_type: String, id: String },

    /// A platform capability call failed.
    #[error("{capability} failed: {message}")]
    Provider { capability: String, message: String },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ScanError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a NotFound error
    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }

    /// Creates a Provider error for the named capability
    pub fn provider(capability: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            capability: capability.into(),
            message: message.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Outcomes the workflow already reported to the user itself.
    ///
    /// Anything else reaching the action boundary gets a generic failure
    /// notice.
    pub fn is_user_outcome(&self) -> bool {
        matches!(
            self,
            Self::PermissionDenied
                | Self::NoBarcodeFound
                | Self::PickCancelled
                | Self::Busy(_)
                | Self::Cancelled
        )
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for ScanError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for ScanError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for ScanError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<version_migrate::MigrationError> for ScanError {
    fn from(err: version_migrate::MigrationError) -> Self {
        use version_migrate::MigrationError;

        match err {
            MigrationError::DeserializationError(_) | MigrationError::SerializationError(_) => {
                Self::Serialization {
                    format: "migration".to_string(),
                    message: err.to_string(),
                }
            }
            _ => Self::Migration(err.to_string()),
        }
    }
}

/// Conversion from anyhow::Error (used by host adapters)
impl From<anyhow::Error> for ScanError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, ScanError>`.
pub type Result<T> = std::result::Result<T, ScanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_outcomes() {
        assert!(ScanError::PermissionDenied.is_user_outcome());
        assert!(ScanError::NoBarcodeFound.is_user_outcome());
        assert!(ScanError::Busy(FlowKind::LiveScan).is_user_outcome());
        assert!(!ScanError::provider("clipboard", "boom").is_user_outcome());
        assert!(!ScanError::io("disk full").is_user_outcome());
    }

    #[test]
    fn test_display_messages() {
        let err = ScanError::provider("image decoder", "exit status 1");
        assert_eq!(err.to_string(), "image decoder failed: exit status 1");

        let err = ScanError::not_found("record", "abc");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Entity not found: record 'abc'");

        let err = ScanError::Busy(FlowKind::ImageImport);
        assert_eq!(err.to_string(), "image import already in progress");
    }

    #[test]
    fn test_from_json_error() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ScanError = parse_err.into();
        assert!(matches!(err, ScanError::Serialization { ref format, .. } if format == "JSON"));
    }
}
