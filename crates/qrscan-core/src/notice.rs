//! User notices raised by the workflow.

use serde::{Deserialize, Serialize};

/// An informational alert the workflow asks the UI to show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notice {
    /// Camera permission missing.
    PermissionDenied,
    /// Image import found no code.
    NoCodeFound,
    /// Stored records could not be read; the raw value was kept aside.
    StorageCorrupt { backup_key: Option<String> },
    /// The URL launcher refused a URI.
    LaunchFailed { uri: String },
    /// Any other failure caught at the action boundary.
    Failure { message: String },
}

impl Notice {
    pub fn header(&self) -> &'static str {
        match self {
            Notice::PermissionDenied => "Permission denied",
            Notice::NoCodeFound => "No QR code found",
            Notice::StorageCorrupt { .. } => "Saved codes unreadable",
            Notice::LaunchFailed { .. } => "Cannot open",
            Notice::Failure { .. } => "Something went wrong",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Notice::PermissionDenied => {
                "Please grant camera permission to use the barcode scanner.".to_string()
            }
            Notice::NoCodeFound => {
                "The selected image does not contain a readable QR code. Try another one."
                    .to_string()
            }
            Notice::StorageCorrupt { backup_key } => match backup_key {
                Some(key) => format!(
                    "Previously saved codes could not be read and were moved to '{}'.",
                    key
                ),
                None => "Previously saved codes could not be read.".to_string(),
            },
            Notice::LaunchFailed { uri } => format!("No app could open {}.", uri),
            Notice::Failure { message } => message.clone(),
        }
    }

    /// Text of the single dismiss button.
    pub fn button(&self) -> &'static str {
        "OK"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_denied_text() {
        let notice = Notice::PermissionDenied;
        assert_eq!(notice.header(), "Permission denied");
        assert_eq!(
            notice.message(),
            "Please grant camera permission to use the barcode scanner."
        );
        assert_eq!(notice.button(), "OK");
    }

    #[test]
    fn test_storage_corrupt_mentions_backup_key() {
        let notice = Notice::StorageCorrupt {
            backup_key: Some("scanned_barcodes.corrupt-1".to_string()),
        };
        assert!(notice.message().contains("scanned_barcodes.corrupt-1"));
    }
}
