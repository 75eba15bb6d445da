//! Domain layer for QRSCAN.
//!
//! Holds the decoded-record model, the action menu model, the capability
//! traits the workflow talks to, and the shared error type. Nothing in this
//! crate performs I/O.

pub mod action;
pub mod config;
pub mod error;
pub mod notice;
pub mod platform;
pub mod record;
pub mod session;

// Re-export common error type
pub use error::{Result, ScanError};

pub use action::{ActionKind, ActionMenu, ActionRole, MenuAction};
pub use notice::Notice;
pub use record::{BarcodeFormat, DecodedRecord, RecordId, ScannedBarcode, ValueType};
pub use session::{FlowKind, ScanSession};
