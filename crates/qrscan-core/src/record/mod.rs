//! Decoded barcode records.
//!
//! A record is created once from a decode provider result and never mutated
//! afterwards. Identity for deletion is the synthetic [`RecordId`].

mod format;
mod model;
mod repository;
mod value_type;

pub use format::BarcodeFormat;
pub use model::{DecodedRecord, RecordCollection, RecordId, ScannedBarcode};
pub use repository::RecordRepository;
pub use value_type::{ValueType, display_value_for};
