//! Decoded record DTOs and migrations

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use version_migrate::{FromDomain, IntoDomain, Versioned};

use qrscan_core::record::{
    BarcodeFormat, DecodedRecord, RecordCollection, RecordId, ValueType, display_value_for,
};

/// Entity name the record collection is registered under.
pub const DECODED_RECORDS_ENTITY: &str = "decoded_records";

// ============================================================================
// Record DTOs
// ============================================================================

/// Decoded record V1.0.0 (no id).
///
/// Mirrors the barcode object the mobile scanner plugin hands back. Extra
/// plugin fields (corner points, bytes, ...) are ignored on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedRecordV1_0_0 {
    pub raw_value: String,
    /// Missing in some plugin versions; derived from `raw_value` on migration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_value: Option<String>,
    #[serde(default = "unknown_value_type")]
    pub value_type: ValueType,
    #[serde(default = "unknown_format")]
    pub format: BarcodeFormat,
}

fn unknown_value_type() -> ValueType {
    ValueType::Unknown
}

fn unknown_format() -> BarcodeFormat {
    BarcodeFormat::Unknown
}

/// Decoded record V1.1.0.
///
/// Added `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedRecordV1_1_0 {
    pub id: RecordId,
    pub raw_value: String,
    pub display_value: String,
    pub value_type: ValueType,
    pub format: BarcodeFormat,
}

impl From<DecodedRecordV1_1_0> for DecodedRecord {
    fn from(dto: DecodedRecordV1_1_0) -> Self {
        DecodedRecord {
            id: dto.id,
            raw_value: dto.raw_value,
            display_value: dto.display_value,
            value_type: dto.value_type,
            format: dto.format,
        }
    }
}

impl From<&DecodedRecord> for DecodedRecordV1_1_0 {
    fn from(record: &DecodedRecord) -> Self {
        DecodedRecordV1_1_0 {
            id: record.id,
            raw_value: record.raw_value.clone(),
            display_value: record.display_value.clone(),
            value_type: record.value_type,
            format: record.format,
        }
    }
}

// ============================================================================
// Collection DTOs
// ============================================================================

/// Record collection V1.0.0.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
#[serde(rename_all = "camelCase")]
pub struct RecordCollectionV1_0_0 {
    #[serde(default)]
    pub records: Vec<DecodedRecordV1_0_0>,
}

/// Record collection V1.1.0.
///
/// Every record carries a stable id so deletes never hit a twin record
/// with identical content.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.1.0")]
#[serde(rename_all = "camelCase")]
pub struct RecordCollectionV1_1_0 {
    #[serde(default)]
    pub records: Vec<DecodedRecordV1_1_0>,
}

/// Type alias for the latest collection version.
pub type RecordCollectionDTO = RecordCollectionV1_1_0;

// ============================================================================
// Migration implementations
// ============================================================================

/// Migration from V1.0.0 to V1.1.0.
/// Assigns a fresh id to every record and fills a missing display value.
impl version_migrate::MigratesTo<RecordCollectionV1_1_0> for RecordCollectionV1_0_0 {
    fn migrate(self) -> RecordCollectionV1_1_0 {
        RecordCollectionV1_1_0 {
            records: self
                .records
                .into_iter()
                .map(|record| {
                    let display_value = record
                        .display_value
                        .unwrap_or_else(|| display_value_for(&record.raw_value, record.value_type));
                    DecodedRecordV1_1_0 {
                        id: RecordId::new(),
                        raw_value: record.raw_value,
                        display_value,
                        value_type: record.value_type,
                        format: record.format,
                    }
                })
                .collect(),
        }
    }
}

// ============================================================================
// Domain model conversions
// ============================================================================

impl IntoDomain<RecordCollection> for RecordCollectionV1_1_0 {
    fn into_domain(self) -> RecordCollection {
        RecordCollection {
            records: self.records.into_iter().map(Into::into).collect(),
        }
    }
}

impl FromDomain<RecordCollection> for RecordCollectionV1_1_0 {
    fn from_domain(collection: RecordCollection) -> Self {
        RecordCollectionV1_1_0 {
            records: collection.records.iter().map(Into::into).collect(),
        }
    }
}

// ============================================================================
// Legacy blobs
// ============================================================================

/// Wraps an unversioned stored array into the V1.0.0 flat shape.
///
/// Early builds stored the plugin's barcode array as-is. Anything that is
/// not a bare array is returned unchanged.
pub fn wrap_legacy_array(value: Value) -> Value {
    match value {
        Value::Array(records) => json!({
            "version": "1.0.0",
            "records": records,
        }),
        other => other,
    }
}

// ============================================================================
// Migrator factory
// ============================================================================

/// Creates a Migrator for the record collection.
///
/// # Migration Path
///
/// - V1.0.0 → V1.1.0: Assign ids
/// - V1.1.0 → RecordCollection: Converts DTO to domain model
pub fn create_record_collection_migrator() -> version_migrate::Migrator {
    let mut migrator = version_migrate::Migrator::builder().build();

    let path = version_migrate::Migrator::define(DECODED_RECORDS_ENTITY)
        .from::<RecordCollectionV1_0_0>()
        .step::<RecordCollectionV1_1_0>()
        .into_with_save::<RecordCollection>();

    migrator
        .register(path)
        .expect("Failed to register decoded_records migration path");

    migrator
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrator_creation() {
        let _migrator = create_record_collection_migrator();
    }

    #[test]
    fn test_migration_v1_0_to_domain() {
        let migrator = create_record_collection_migrator();

        let value = json!({
            "version": "1.0.0",
            "records": [
                {
                    "rawValue": "https://example.com",
                    "displayValue": "https://example.com",
                    "valueType": "URL",
                    "format": "QR_CODE",
                    "cornerPoints": [[0, 0], [1, 0], [1, 1], [0, 1]]
                },
                {
                    "rawValue": "tel:+4930123456",
                    "valueType": "PHONE",
                    "format": "QR_CODE"
                }
            ]
        });

        let result: Result<RecordCollection, _> =
            migrator.load_flat_from(DECODED_RECORDS_ENTITY, value);
        assert!(result.is_ok(), "Migration failed: {:?}", result.err());

        let collection = result.unwrap();
        assert_eq!(collection.records.len(), 2);
        assert_eq!(collection.records[0].value_type, ValueType::Url);
        assert_eq!(collection.records[1].display_value, "+4930123456");
        assert_ne!(collection.records[0].id, collection.records[1].id);
    }

    #[test]
    fn test_legacy_array_wrapping() {
        let wrapped = wrap_legacy_array(json!([{ "rawValue": "x" }]));
        assert_eq!(wrapped["version"], "1.0.0");
        assert_eq!(wrapped["records"][0]["rawValue"], "x");

        let untouched = json!({ "version": "1.1.0", "records": [] });
        assert_eq!(wrap_legacy_array(untouched.clone()), untouched);
    }

    #[test]
    fn test_save_writes_latest_version() {
        let migrator = create_record_collection_migrator();
        let record = DecodedRecord::from_scan(qrscan_core::ScannedBarcode::from_raw(
            "hello",
            BarcodeFormat::QrCode,
        ));
        let collection = RecordCollection::new(vec![record.clone()]);

        let json_str = migrator
            .save_domain_flat(DECODED_RECORDS_ENTITY, collection)
            .unwrap();

        assert!(json_str.contains("\"version\":\"1.1.0\""));
        assert!(json_str.contains(&format!("\"id\":\"{}\"", record.id)));
        assert!(json_str.contains("\"rawValue\":\"hello\""));
    }
}
