//! Scan session state.
//!
//! The session is the explicit state object the workflow controller owns.
//! Rendering layers receive clones of it; they never mutate it directly.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::record::{DecodedRecord, RecordId};

/// Re-entrancy class of a user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowKind {
    LiveScan,
    ImageImport,
}

impl fmt::Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowKind::LiveScan => f.write_str("live scan"),
            FlowKind::ImageImport => f.write_str("image import"),
        }
    }
}

/// Process-wide scan state: device support and the ordered records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanSession {
    /// Whether the device exposes the scanning capability.
    /// Set once during initialization.
    pub is_supported: bool,
    /// Records in scan/import order.
    pub records: Vec<DecodedRecord>,
}

impl ScanSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &RecordId) -> Option<&DecodedRecord> {
        self.records.iter().find(|r| &r.id == id)
    }

    /// Appends records at the end, keeping their order.
    pub fn append(&mut self, records: impl IntoIterator<Item = DecodedRecord>) {
        self.records.extend(records);
    }

    /// Removes the record with the given id.
    ///
    /// Returns the removed record together with its former position, or
    /// `None` when no record matches.
    pub fn remove(&mut self, id: &RecordId) -> Option<(usize, DecodedRecord)> {
        let index = self.records.iter().position(|r| &r.id == id)?;
        Some((index, self.records.remove(index)))
    }

    /// Puts a removed record back at its former position.
    pub fn restore(&mut self, index: usize, record: DecodedRecord) {
        let index = index.min(self.records.len());
        self.records.insert(index, record);
    }

    /// Drops the last `count` records.
    pub fn truncate_tail(&mut self, count: usize) {
        let keep = self.records.len().saturating_sub(count);
        self.records.truncate(keep);
    }
}
