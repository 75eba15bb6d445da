//! Decoded record domain models.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::format::BarcodeFormat;
use super::value_type::{ValueType, display_value_for};

/// Stable synthetic identifier assigned when a record is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    /// Generates a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for RecordId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for RecordId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// A single result as handed back by a decode provider.
///
/// Providers know nothing about record identity; the workflow turns each
/// scanned barcode into a [`DecodedRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScannedBarcode {
    pub raw_value: String,
    pub display_value: String,
    pub value_type: ValueType,
    pub format: BarcodeFormat,
}

impl ScannedBarcode {
    /// Builds a scanned barcode from raw text, classifying it locally.
    pub fn from_raw(raw_value: impl Into<String>, format: BarcodeFormat) -> Self {
        let raw_value = raw_value.into();
        let value_type = ValueType::classify(&raw_value);
        let display_value = display_value_for(&raw_value, value_type);
        Self {
            raw_value,
            display_value,
            value_type,
            format,
        }
    }
}

/// A decoded barcode/QR result kept in the session collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedRecord {
    pub id: RecordId,
    /// Original encoded payload.
    pub raw_value: String,
    /// Normalized text shown to the user and handed to share/copy/open.
    pub display_value: String,
    pub value_type: ValueType,
    pub format: BarcodeFormat,
}

impl DecodedRecord {
    /// Creates a record from a provider result with a fresh id.
    pub fn from_scan(scan: ScannedBarcode) -> Self {
        Self {
            id: RecordId::new(),
            raw_value: scan.raw_value,
            display_value: scan.display_value,
            value_type: scan.value_type,
            format: scan.format,
        }
    }

    /// The `tel:` URI used by the dialer action.
    pub fn dial_uri(&self) -> String {
        format!("tel:{}", self.display_value.trim())
    }
}

/// The ordered record collection as it is persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordCollection {
    pub records: Vec<DecodedRecord>,
}

impl RecordCollection {
    pub fn new(records: Vec<DecodedRecord>) -> Self {
        Self { records }
    }
}
