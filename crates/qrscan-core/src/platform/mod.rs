//! Platform capability traits.
//!
//! Every device-facing concern (camera, decoding, picking files, clipboard,
//! sharing, launching apps, key-value persistence, alerts) sits behind one of
//! these traits. The workflow only ever talks to them.

mod permission;

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::action::ActionMenu;
use crate::error::Result;
use crate::notice::Notice;
use crate::record::{BarcodeFormat, ScannedBarcode};

pub use permission::PermissionState;

/// Reports whether the device can scan at all.
#[async_trait]
pub trait SupportProbe: Send + Sync {
    async fn is_supported(&self) -> Result<bool>;
}

/// Camera permission prompt.
#[async_trait]
pub trait PermissionProvider: Send + Sync {
    async fn request_camera_permission(&self) -> Result<PermissionState>;
}

/// Decodes codes from the live camera feed.
#[async_trait]
pub trait LiveDecoder: Send + Sync {
    /// Returns zero or more results; zero is a normal outcome.
    async fn scan(&self) -> Result<Vec<ScannedBarcode>>;
}

/// Decodes codes from a still image on disk.
#[async_trait]
pub trait ImageDecoder: Send + Sync {
    /// Only codes whose symbology is in `formats` are returned.
    async fn decode_image(
        &self,
        path: &Path,
        formats: &[BarcodeFormat],
    ) -> Result<Vec<ScannedBarcode>>;
}

/// A file handed back by the picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedFile {
    /// Local path; some pickers (web) only return a blob without one.
    pub path: Option<PathBuf>,
    pub name: String,
    pub mime_type: Option<String>,
    pub size: Option<u64>,
}

impl PickedFile {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Self {
            path: Some(path),
            name,
            mime_type: None,
            size: None,
        }
    }
}

/// Image picker.
#[async_trait]
pub trait FilePicker: Send + Sync {
    /// Returns the picked files in order; an empty list means the user
    /// dismissed the picker.
    async fn pick_images(&self, multiple: bool) -> Result<Vec<PickedFile>>;
}

/// Platform share sheet (fire-and-forget).
#[async_trait]
pub trait ShareProvider: Send + Sync {
    async fn share_text(&self, text: &str) -> Result<()>;
}

/// System clipboard.
#[async_trait]
pub trait ClipboardProvider: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<()>;
}

/// In-app or system browser.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn open_url(&self, url: &str) -> Result<()>;
}

/// Generic URI launcher (`tel:`, `mailto:`, ...).
#[async_trait]
pub trait UrlLauncher: Send + Sync {
    /// Returns `false` when no application accepted the URI.
    async fn open_uri(&self, uri: &str) -> Result<bool>;
}

/// String key-value persistence.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> Result<()>;

    async fn remove(&self, key: &str) -> Result<()>;
}

/// Shows informational alerts.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notice: Notice) -> Result<()>;
}

/// Presents a record's action sheet.
///
/// Presenting does not wait for the user's choice; the host calls back into
/// the workflow with the chosen [`crate::MenuAction`].
#[async_trait]
pub trait ActionSheetPresenter: Send + Sync {
    async fn present(&self, menu: &ActionMenu) -> Result<()>;
}

/// The capability set the workflow controller consumes.
#[derive(Clone)]
pub struct PlatformServices {
    pub support: Arc<dyn SupportProbe>,
    pub permissions: Arc<dyn PermissionProvider>,
    pub live_decoder: Arc<dyn LiveDecoder>,
    pub image_decoder: Arc<dyn ImageDecoder>,
    pub file_picker: Arc<dyn FilePicker>,
    pub share: Arc<dyn ShareProvider>,
    pub clipboard: Arc<dyn ClipboardProvider>,
    pub browser: Arc<dyn BrowserLauncher>,
    pub url_launcher: Arc<dyn UrlLauncher>,
    pub notifier: Arc<dyn Notifier>,
    pub action_sheet: Arc<dyn ActionSheetPresenter>,
}

impl std::fmt::Debug for PlatformServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformServices").finish_non_exhaustive()
    }
}
