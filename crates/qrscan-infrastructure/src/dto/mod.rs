//! Data Transfer Objects (DTOs) for persistence.
//!
//! These DTOs represent the versioned schema of the stored record
//! collection. They are private to the infrastructure layer and handle the
//! evolution of the storage format over time.
//!
//! ## Schema Versioning (Semantic Versioning)
//!
//! - **MAJOR (X.0.0)**: Breaking changes (field removal, type changes)
//! - **MINOR (1.X.0)**: Backward-compatible additions
//! - **PATCH (1.0.X)**: Backward-compatible fixes (not typically used for schema)
//!
//! ### Decoded Records Version History
//! - **1.0.0**: Bare records as delivered by the scanner plugin (no id)
//! - **1.1.0**: Added a synthetic `id` per record

mod decoded_record;

pub use decoded_record::{
    DECODED_RECORDS_ENTITY, DecodedRecordV1_0_0, DecodedRecordV1_1_0, RecordCollectionDTO,
    RecordCollectionV1_0_0, RecordCollectionV1_1_0, create_record_collection_migrator,
    wrap_legacy_array,
};
