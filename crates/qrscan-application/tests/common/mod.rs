//! Mock platform capabilities shared by the workflow tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use qrscan_application::ScanWorkflowController;
use qrscan_core::action::ActionMenu;
use qrscan_core::error::{Result, ScanError};
use qrscan_core::notice::Notice;
use qrscan_core::platform::{
    ActionSheetPresenter, BrowserLauncher, ClipboardProvider, FilePicker, ImageDecoder,
    LiveDecoder, Notifier, PermissionProvider, PermissionState, PickedFile, PlatformServices,
    ShareProvider, SupportProbe, UrlLauncher,
};
use qrscan_core::record::{BarcodeFormat, DecodedRecord, RecordRepository, ScannedBarcode};

pub fn qr(raw: &str) -> ScannedBarcode {
    ScannedBarcode::from_raw(raw, BarcodeFormat::QrCode)
}

/// One mock standing in for every capability.
///
/// Decoder results are queued per call; an empty queue decodes nothing.
pub struct MockPlatform {
    pub supported: bool,
    pub permission: Mutex<PermissionState>,
    pub live_results: Mutex<VecDeque<Result<Vec<ScannedBarcode>>>>,
    pub image_results: Mutex<VecDeque<Result<Vec<ScannedBarcode>>>>,
    pub picked: Mutex<Vec<PickedFile>>,
    pub launch_accepts: AtomicBool,

    /// When set, live scans wait for `release` after signalling `entered`.
    pub gate_live: AtomicBool,
    pub entered: Notify,
    pub release: Notify,

    pub live_calls: AtomicUsize,
    pub permission_calls: AtomicUsize,
    pub pick_requests: Mutex<Vec<bool>>,
    pub decoded: Mutex<Vec<(PathBuf, Vec<BarcodeFormat>)>>,
    pub shared: Mutex<Vec<String>>,
    pub copied: Mutex<Vec<String>>,
    pub browsed: Mutex<Vec<String>>,
    pub launched: Mutex<Vec<String>>,
    pub notices: Mutex<Vec<Notice>>,
    pub presented: Mutex<Vec<ActionMenu>>,
}

impl MockPlatform {
    pub fn new(permission: PermissionState) -> Arc<Self> {
        Arc::new(Self {
            supported: true,
            permission: Mutex::new(permission),
            live_results: Mutex::new(VecDeque::new()),
            image_results: Mutex::new(VecDeque::new()),
            picked: Mutex::new(vec![PickedFile::from_path("/photos/code.png")]),
            launch_accepts: AtomicBool::new(true),
            gate_live: AtomicBool::new(false),
            entered: Notify::new(),
            release: Notify::new(),
            live_calls: AtomicUsize::new(0),
            permission_calls: AtomicUsize::new(0),
            pick_requests: Mutex::new(Vec::new()),
            decoded: Mutex::new(Vec::new()),
            shared: Mutex::new(Vec::new()),
            copied: Mutex::new(Vec::new()),
            browsed: Mutex::new(Vec::new()),
            launched: Mutex::new(Vec::new()),
            notices: Mutex::new(Vec::new()),
            presented: Mutex::new(Vec::new()),
        })
    }

    pub fn granted() -> Arc<Self> {
        Self::new(PermissionState::Granted)
    }

    pub fn services(self: &Arc<Self>) -> PlatformServices {
        PlatformServices {
            support: self.clone(),
            permissions: self.clone(),
            live_decoder: self.clone(),
            image_decoder: self.clone(),
            file_picker: self.clone(),
            share: self.clone(),
            clipboard: self.clone(),
            browser: self.clone(),
            url_launcher: self.clone(),
            notifier: self.clone(),
            action_sheet: self.clone(),
        }
    }

    pub fn queue_live(&self, result: Result<Vec<ScannedBarcode>>) {
        self.live_results.lock().unwrap().push_back(result);
    }

    pub fn queue_image(&self, result: Result<Vec<ScannedBarcode>>) {
        self.image_results.lock().unwrap().push_back(result);
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }
}

#[async_trait]
impl SupportProbe for MockPlatform {
    async fn is_supported(&self) -> Result<bool> {
        Ok(self.supported)
    }
}

#[async_trait]
impl PermissionProvider for MockPlatform {
    async fn request_camera_permission(&self) -> Result<PermissionState> {
        self.permission_calls.fetch_add(1, Ordering::SeqCst);
        Ok(*self.permission.lock().unwrap())
    }
}

#[async_trait]
impl LiveDecoder for MockPlatform {
    async fn scan(&self) -> Result<Vec<ScannedBarcode>> {
        self.live_calls.fetch_add(1, Ordering::SeqCst);
        if self.gate_live.load(Ordering::SeqCst) {
            self.entered.notify_one();
            self.release.notified().await;
        }
        self.live_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

#[async_trait]
impl ImageDecoder for MockPlatform {
    async fn decode_image(
        &self,
        path: &Path,
        formats: &[BarcodeFormat],
    ) -> Result<Vec<ScannedBarcode>> {
        self.decoded
            .lock()
            .unwrap()
            .push((path.to_path_buf(), formats.to_vec()));
        self.image_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

#[async_trait]
impl FilePicker for MockPlatform {
    async fn pick_images(&self, multiple: bool) -> Result<Vec<PickedFile>> {
        self.pick_requests.lock().unwrap().push(multiple);
        Ok(self.picked.lock().unwrap().clone())
    }
}

#[async_trait]
impl ShareProvider for MockPlatform {
    async fn share_text(&self, text: &str) -> Result<()> {
        self.shared.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

#[async_trait]
impl ClipboardProvider for MockPlatform {
    async fn write_text(&self, text: &str) -> Result<()> {
        self.copied.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

#[async_trait]
impl BrowserLauncher for MockPlatform {
    async fn open_url(&self, url: &str) -> Result<()> {
        self.browsed.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

#[async_trait]
impl UrlLauncher for MockPlatform {
    async fn open_uri(&self, uri: &str) -> Result<bool> {
        self.launched.lock().unwrap().push(uri.to_string());
        Ok(self.launch_accepts.load(Ordering::SeqCst))
    }
}

#[async_trait]
impl Notifier for MockPlatform {
    async fn notify(&self, notice: Notice) -> Result<()> {
        self.notices.lock().unwrap().push(notice);
        Ok(())
    }
}

#[async_trait]
impl ActionSheetPresenter for MockPlatform {
    async fn present(&self, menu: &ActionMenu) -> Result<()> {
        self.presented.lock().unwrap().push(menu.clone());
        Ok(())
    }
}

/// In-memory repository that records every save.
#[derive(Default)]
pub struct MockRepository {
    pub stored: Mutex<Vec<DecodedRecord>>,
    pub corrupt: AtomicBool,
    pub fail_saves: AtomicBool,
    pub saves: Mutex<Vec<Vec<DecodedRecord>>>,
}

impl MockRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_records(records: Vec<DecodedRecord>) -> Arc<Self> {
        let repo = Self::default();
        *repo.stored.lock().unwrap() = records;
        Arc::new(repo)
    }

    pub fn save_count(&self) -> usize {
        self.saves.lock().unwrap().len()
    }

    pub fn last_saved(&self) -> Option<Vec<DecodedRecord>> {
        self.saves.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl RecordRepository for MockRepository {
    async fn load(&self) -> Result<Vec<DecodedRecord>> {
        if self.corrupt.load(Ordering::SeqCst) {
            return Err(ScanError::StorageReadCorrupt {
                key: "scanned_barcodes".to_string(),
                backup_key: Some("scanned_barcodes.corrupt-test".to_string()),
                message: "invalid JSON".to_string(),
            });
        }
        Ok(self.stored.lock().unwrap().clone())
    }

    async fn save(&self, records: &[DecodedRecord]) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(ScanError::io("disk full"));
        }
        *self.stored.lock().unwrap() = records.to_vec();
        self.saves.lock().unwrap().push(records.to_vec());
        Ok(())
    }
}

pub fn controller(
    platform: &Arc<MockPlatform>,
    repository: &Arc<MockRepository>,
) -> Arc<ScanWorkflowController> {
    Arc::new(ScanWorkflowController::new(
        platform.services(),
        repository.clone(),
        vec![BarcodeFormat::QrCode],
    ))
}
