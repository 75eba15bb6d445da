//! Infrastructure layer for QRSCAN.
//!
//! Persistence (versioned DTOs, key-value stores, the record repository),
//! configuration loading, application paths, and the desktop platform
//! adapters that stand in for mobile plugins.

pub mod config_service;
pub mod decoder;
pub mod dto;
pub mod paths;
pub mod record_repository;
pub mod storage;
pub mod system;

pub use crate::config_service::ConfigService;
pub use crate::decoder::ZbarDecoder;
pub use crate::record_repository::KvRecordRepository;
pub use crate::storage::{FileKeyValueStore, MemoryKeyValueStore};
pub use crate::system::{CommandClipboard, SystemOpener, VideoDevicePermission};
