//! Record repository on top of a key-value store.
//!
//! The whole collection is stored under one key as a versioned flat JSON
//! document. Uses version-migrate for automatic schema migration.

use async_trait::async_trait;
use std::sync::Arc;
use version_migrate::Migrator;

use qrscan_core::error::{Result, ScanError};
use qrscan_core::platform::KeyValueStore;
use qrscan_core::record::{DecodedRecord, RecordCollection, RecordRepository};

use crate::dto::{DECODED_RECORDS_ENTITY, create_record_collection_migrator, wrap_legacy_array};

/// Stores the record collection under a single key-value entry.
pub struct KvRecordRepository {
    store: Arc<dyn KeyValueStore>,
    key: String,
    migrator: Migrator,
}

impl KvRecordRepository {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            migrator: create_record_collection_migrator(),
        }
    }

    fn parse(&self, raw: &str) -> std::result::Result<Vec<DecodedRecord>, String> {
        let value: serde_json::Value =
            serde_json::from_str(raw).map_err(|e| format!("invalid JSON: {}", e))?;

        let collection: RecordCollection = self
            .migrator
            .load_flat_from(DECODED_RECORDS_ENTITY, wrap_legacy_array(value))
            .map_err(|e| format!("unreadable collection: {}", e))?;

        Ok(collection.records)
    }

    /// Copies an unreadable value aside so it can be inspected later.
    async fn preserve_corrupt(&self, raw: &str) -> Option<String> {
        let backup_key = format!(
            "{}.corrupt-{}",
            self.key,
            chrono::Utc::now().format("%Y%m%dT%H%M%S%.3fZ")
        );

        match self.store.set(&backup_key, raw).await {
            Ok(()) => Some(backup_key),
            Err(e) => {
                tracing::error!(
                    "[Records] Failed to preserve corrupt value of '{}': {}",
                    self.key,
                    e
                );
                None
            }
        }
    }
}

#[async_trait]
impl RecordRepository for KvRecordRepository {
    async fn load(&self) -> Result<Vec<DecodedRecord>> {
        let stored = match self.store.get(&self.key).await {
            Ok(stored) => stored,
            // The whole store was unreadable and has already been moved aside.
            Err(ScanError::StorageReadCorrupt {
                backup_key,
                message,
                ..
            }) => {
                return Err(ScanError::StorageReadCorrupt {
                    key: self.key.clone(),
                    backup_key,
                    message,
                });
            }
            Err(e) => return Err(e),
        };

        let raw = match stored {
            Some(raw) if !raw.trim().is_empty() => raw,
            _ => {
                tracing::debug!("[Records] Nothing stored under '{}'", self.key);
                return Ok(Vec::new());
            }
        };

        match self.parse(&raw) {
            Ok(records) => {
                tracing::debug!(
                    "[Records] Loaded {} record(s) from '{}'",
                    records.len(),
                    self.key
                );
                Ok(records)
            }
            Err(message) => {
                let backup_key = self.preserve_corrupt(&raw).await;
                tracing::warn!(
                    "[Records] Stored value under '{}' is corrupt ({}), preserved as {:?}",
                    self.key,
                    message,
                    backup_key
                );
                Err(ScanError::StorageReadCorrupt {
                    key: self.key.clone(),
                    backup_key,
                    message,
                })
            }
        }
    }

    async fn save(&self, records: &[DecodedRecord]) -> Result<()> {
        let serialized = self
            .migrator
            .save_domain_flat(DECODED_RECORDS_ENTITY, RecordCollection::new(records.to_vec()))
            .map_err(|e| ScanError::Serialization {
                format: "JSON".to_string(),
                message: format!("Failed to serialize records: {}", e),
            })?;

        self.store.set(&self.key, &serialized).await?;

        tracing::debug!(
            "[Records] Saved {} record(s) under '{}'",
            records.len(),
            self.key
        );
        Ok(())
    }
}
