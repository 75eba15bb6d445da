//! Record repository trait.

use async_trait::async_trait;

use super::model::DecodedRecord;
use crate::error::Result;

/// Persistence for the ordered record collection.
///
/// Every save is a full overwrite of the stored collection.
#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// Loads the stored collection.
    ///
    /// Returns an empty collection when nothing is stored yet and
    /// `ScanError::StorageReadCorrupt` when the stored value cannot be read.
    async fn load(&self) -> Result<Vec<DecodedRecord>>;

    /// Replaces the stored collection.
    async fn save(&self, records: &[DecodedRecord]) -> Result<()>;
}
