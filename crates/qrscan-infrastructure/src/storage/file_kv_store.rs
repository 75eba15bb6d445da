//! File-backed key-value store.
//!
//! All entries live in a single JSON object file. Writes go to a temporary
//! file in the same directory and are renamed over the original, so a crash
//! never leaves a half-written store behind. A file that no longer parses is
//! renamed to `<name>.corrupt-<timestamp>` and the store starts over empty.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use qrscan_core::error::{Result, ScanError};
use qrscan_core::platform::KeyValueStore;

use crate::paths::QrscanPaths;

/// Key-value store persisted as `{ "key": "value", ... }`.
#[derive(Debug)]
pub struct FileKeyValueStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileKeyValueStore {
    /// Uses the default store file (`<data_dir>/store.json`).
    pub fn new() -> Result<Self> {
        Ok(Self::with_path(QrscanPaths::store_file()?))
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_entries(&self) -> Result<BTreeMap<String, String>> {
        if !fs::try_exists(&self.path).await.unwrap_or(false) {
            return Ok(BTreeMap::new());
        }

        let content = fs::read_to_string(&self.path)
            .await
            .map_err(|e| ScanError::io(format!("Failed to read store {:?}: {}", self.path, e)))?;

        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        match serde_json::from_str::<BTreeMap<String, String>>(&content) {
            Ok(entries) => Ok(entries),
            Err(e) => Err(self.move_aside(e.to_string()).await),
        }
    }

    /// Renames an unparsable store file out of the way.
    ///
    /// Returns `StorageReadCorrupt` keyed by the store path; `backup_key` is
    /// the path the content now lives at, or `None` if the rename failed.
    async fn move_aside(&self, message: String) -> ScanError {
        let backup_path = self.backup_path();

        let backup_key = match fs::rename(&self.path, &backup_path).await {
            Ok(()) => {
                tracing::warn!(
                    "[Store] {:?} is not a valid store ({}), moved to {:?}",
                    self.path,
                    message,
                    backup_path
                );
                Some(backup_path.to_string_lossy().to_string())
            }
            Err(e) => {
                tracing::error!(
                    "[Store] Failed to move corrupt store {:?} aside: {}",
                    self.path,
                    e
                );
                None
            }
        };

        ScanError::StorageReadCorrupt {
            key: self.path.to_string_lossy().to_string(),
            backup_key,
            message,
        }
    }

    async fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ScanError::io(format!("Failed to create directory: {}", e)))?;
        }

        let serialized = serde_json::to_string_pretty(entries)?;
        let tmp_path = self.temp_path();

        let mut tmp_file = fs::File::create(&tmp_path).await?;
        tmp_file.write_all(serialized.as_bytes()).await?;
        tmp_file.sync_all().await?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path).await.map_err(|e| {
            ScanError::io(format!("Failed to replace store {:?}: {}", self.path, e))
        })?;

        Ok(())
    }

    fn backup_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(format!(
            ".corrupt-{}",
            chrono::Utc::now().format("%Y%m%dT%H%M%S%.3fZ")
        ));
        PathBuf::from(name)
    }

    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "store.json".to_string());
        self.path.with_file_name(format!(".{}.tmp", file_name))
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock().await;
        Ok(self.read_entries().await?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_entries().await?;
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_entries().await?;
        if entries.remove(key).is_some() {
            self.write_entries(&entries).await?;
        }
        Ok(())
    }
}
