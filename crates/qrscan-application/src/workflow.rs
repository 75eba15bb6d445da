//! Scan workflow controller.
//!
//! This module provides the `ScanWorkflowController` which drives every user
//! flow of the scanner: permission checks, live scans, image imports, the
//! per-record action menu and persistence of the record collection.

use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use qrscan_core::action::{ActionKind, ActionMenu, MenuAction};
use qrscan_core::error::{Result, ScanError};
use qrscan_core::notice::Notice;
use qrscan_core::platform::PlatformServices;
use qrscan_core::record::{BarcodeFormat, DecodedRecord, RecordId, RecordRepository, ScannedBarcode};
use qrscan_core::session::{FlowKind, ScanSession};

use crate::guard::FlowGuard;
use crate::task::{ActionTask, until_cancelled};

/// Result of a scan or import that added records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Records appended by this flow.
    pub added: usize,
    /// Collection size afterwards.
    pub total: usize,
}

/// What a chosen menu action did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Shared,
    Copied,
    Deleted,
    OpenedBrowser,
    /// `launched` is false when no app accepted the `tel:` URI.
    OpenedDialer { launched: bool },
    Cancelled,
    /// The record was removed between presenting the menu and choosing.
    RecordMissing,
}

/// Orchestrates scanning, importing and record actions.
///
/// # Thread Safety
///
/// The session sits behind a `tokio::sync::Mutex`. Every mutation and the
/// persistence write that follows it happen while the lock is held, so
/// concurrent flows cannot lose each other's updates. Scans and imports are
/// additionally guarded per [`FlowKind`].
pub struct ScanWorkflowController {
    platform: PlatformServices,
    repository: Arc<dyn RecordRepository>,
    /// Symbologies accepted on image import
    import_formats: Vec<BarcodeFormat>,
    session: Mutex<ScanSession>,
    guard: FlowGuard,
}

impl ScanWorkflowController {
    pub fn new(
        platform: PlatformServices,
        repository: Arc<dyn RecordRepository>,
        import_formats: Vec<BarcodeFormat>,
    ) -> Self {
        Self {
            platform,
            repository,
            import_formats,
            session: Mutex::new(ScanSession::new()),
            guard: FlowGuard::new(),
        }
    }

    /// Probes device support and loads the persisted records.
    ///
    /// Unreadable stored data does not fail startup: the session starts
    /// empty and a `StorageCorrupt` notice is shown.
    pub async fn initialize(&self) -> Result<ScanSession> {
        let is_supported = match self.platform.support.is_supported().await {
            Ok(supported) => supported,
            Err(e) => {
                tracing::warn!("[Workflow] Support probe failed, assuming unsupported: {}", e);
                false
            }
        };

        let records = match self.repository.load().await {
            Ok(records) => records,
            Err(ScanError::StorageReadCorrupt {
                key, backup_key, ..
            }) => {
                tracing::warn!(
                    "[Workflow] Starting with no records, '{}' was unreadable",
                    key
                );
                self.notify(Notice::StorageCorrupt { backup_key }).await;
                Vec::new()
            }
            Err(e) => return self.settle("initialize", Err(e)).await,
        };

        let mut session = self.session.lock().await;
        session.is_supported = is_supported;
        session.records = records;

        tracing::info!(
            "[Workflow] Initialized: supported={}, records={}",
            session.is_supported,
            session.len()
        );
        Ok(session.clone())
    }

    /// Asks for camera permission. True only for granted or limited access.
    pub async fn request_permission(&self) -> Result<bool> {
        let state = self.platform.permissions.request_camera_permission().await?;
        tracing::debug!("[Workflow] Camera permission: {:?}", state);
        Ok(state.allows_scanning())
    }

    /// Scans with the camera and appends every result, even none.
    pub async fn scan_live(&self) -> Result<ScanOutcome> {
        self.scan_live_until(&CancellationToken::new()).await
    }

    /// Picks one image, decodes it and appends the results.
    ///
    /// An image without a readable code is reported as `NoBarcodeFound`;
    /// a dismissed picker as `PickCancelled`.
    pub async fn import_from_image(&self) -> Result<ScanOutcome> {
        self.import_from_image_until(&CancellationToken::new()).await
    }

    /// Runs [`Self::scan_live`] as a cancellable background task.
    pub fn spawn_scan_live(self: &Arc<Self>) -> ActionTask<ScanOutcome> {
        let controller = Arc::clone(self);
        ActionTask::spawn(move |token| async move { controller.scan_live_until(&token).await })
    }

    /// Runs [`Self::import_from_image`] as a cancellable background task.
    pub fn spawn_import(self: &Arc<Self>) -> ActionTask<ScanOutcome> {
        let controller = Arc::clone(self);
        ActionTask::spawn(move |token| async move {
            controller.import_from_image_until(&token).await
        })
    }

    async fn scan_live_until(&self, cancel: &CancellationToken) -> Result<ScanOutcome> {
        let _permit = self.guard.try_acquire(FlowKind::LiveScan)?;

        let result = async {
            until_cancelled(cancel, self.ensure_permission()).await?;
            let scans = until_cancelled(cancel, self.platform.live_decoder.scan()).await?;
            tracing::debug!("[Workflow] Live scan returned {} result(s)", scans.len());

            self.append_and_persist(cancel, scans).await
        }
        .await;

        self.settle("live scan", result).await
    }

    async fn import_from_image_until(&self, cancel: &CancellationToken) -> Result<ScanOutcome> {
        let _permit = self.guard.try_acquire(FlowKind::ImageImport)?;

        let result = async {
            until_cancelled(cancel, self.ensure_permission()).await?;

            let picked = until_cancelled(cancel, self.platform.file_picker.pick_images(false)).await?;
            let Some(file) = picked.into_iter().next() else {
                return Err(ScanError::PickCancelled);
            };
            let path = file.path.ok_or_else(|| {
                ScanError::provider(
                    "file picker",
                    format!("Picked file '{}' has no local path", file.name),
                )
            })?;

            let scans = until_cancelled(
                cancel,
                self.platform
                    .image_decoder
                    .decode_image(&path, &self.import_formats),
            )
            .await?;

            if scans.is_empty() {
                tracing::info!("[Workflow] No code found in {:?}", path);
                self.notify(Notice::NoCodeFound).await;
                return Err(ScanError::NoBarcodeFound);
            }

            self.append_and_persist(cancel, scans).await
        }
        .await;

        self.settle("image import", result).await
    }

    /// Builds the action sheet for a record and presents it.
    pub async fn open_action_menu(&self, id: &RecordId) -> Result<ActionMenu> {
        let result = async {
            let menu = {
                let session = self.session.lock().await;
                let record = session
                    .get(id)
                    .ok_or_else(|| ScanError::not_found("record", id.to_string()))?;
                ActionMenu::for_record(record)
            };

            self.platform.action_sheet.present(&menu).await?;
            Ok(menu)
        }
        .await;

        self.settle("action menu", result).await
    }

    /// Performs a menu action the user chose.
    pub async fn perform_action(&self, action: &MenuAction) -> Result<ActionOutcome> {
        let result = self.run_action(action).await;
        self.settle(action.kind.as_str(), result).await
    }

    async fn run_action(&self, action: &MenuAction) -> Result<ActionOutcome> {
        if action.kind == ActionKind::Cancel {
            return Ok(ActionOutcome::Cancelled);
        }

        let record = self.session.lock().await.get(&action.record_id).cloned();
        let Some(record) = record else {
            tracing::debug!(
                "[Workflow] {} on missing record {}",
                action.kind,
                action.record_id
            );
            return Ok(ActionOutcome::RecordMissing);
        };

        match action.kind {
            ActionKind::Share => {
                self.platform.share.share_text(&record.display_value).await?;
                Ok(ActionOutcome::Shared)
            }
            ActionKind::Copy => {
                self.platform.clipboard.write_text(&record.display_value).await?;
                Ok(ActionOutcome::Copied)
            }
            ActionKind::Delete => {
                if self.remove_and_persist(&record.id).await? {
                    Ok(ActionOutcome::Deleted)
                } else {
                    Ok(ActionOutcome::RecordMissing)
                }
            }
            ActionKind::OpenBrowser => {
                self.platform.browser.open_url(&record.display_value).await?;
                Ok(ActionOutcome::OpenedBrowser)
            }
            ActionKind::OpenDialer => {
                let uri = record.dial_uri();
                let launched = self.platform.url_launcher.open_uri(&uri).await?;
                if !launched {
                    tracing::warn!("[Workflow] No app accepted {}", uri);
                    self.notify(Notice::LaunchFailed { uri }).await;
                }
                Ok(ActionOutcome::OpenedDialer { launched })
            }
            ActionKind::Cancel => Ok(ActionOutcome::Cancelled),
        }
    }

    /// Deletes the record with `id`. Returns false when no record matched.
    pub async fn delete_record(&self, id: &RecordId) -> Result<bool> {
        let result = self.remove_and_persist(id).await;
        self.settle("delete", result).await
    }

    /// Snapshot of the current session.
    pub async fn session(&self) -> ScanSession {
        self.session.lock().await.clone()
    }

    pub async fn records(&self) -> Vec<DecodedRecord> {
        self.session.lock().await.records.clone()
    }

    pub fn is_busy(&self, kind: FlowKind) -> bool {
        self.guard.is_active(kind)
    }

    async fn ensure_permission(&self) -> Result<()> {
        if self.request_permission().await? {
            return Ok(());
        }
        tracing::info!("[Workflow] Camera permission not granted");
        self.notify(Notice::PermissionDenied).await;
        Err(ScanError::PermissionDenied)
    }

    async fn append_and_persist(
        &self,
        cancel: &CancellationToken,
        scans: Vec<ScannedBarcode>,
    ) -> Result<ScanOutcome> {
        let records: Vec<DecodedRecord> = scans.into_iter().map(DecodedRecord::from_scan).collect();
        let added = records.len();

        let mut session = self.session.lock().await;
        // Past this point the flow finishes even if cancelled.
        if cancel.is_cancelled() {
            return Err(ScanError::Cancelled);
        }

        session.append(records);
        if let Err(e) = self.repository.save(&session.records).await {
            session.truncate_tail(added);
            return Err(e);
        }

        tracing::info!(
            "[Workflow] Added {} record(s), {} total",
            added,
            session.len()
        );
        Ok(ScanOutcome {
            added,
            total: session.len(),
        })
    }

    async fn remove_and_persist(&self, id: &RecordId) -> Result<bool> {
        let mut session = self.session.lock().await;
        let Some((index, record)) = session.remove(id) else {
            tracing::debug!("[Workflow] Delete of unknown record {} ignored", id);
            return Ok(false);
        };

        if let Err(e) = self.repository.save(&session.records).await {
            session.restore(index, record);
            return Err(e);
        }

        tracing::info!("[Workflow] Deleted record {}, {} left", id, session.len());
        Ok(true)
    }

    /// Failure boundary: unexpected errors are logged and shown as a notice.
    async fn settle<T>(&self, operation: &str, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            if e.is_user_outcome() {
                tracing::debug!("[Workflow] {} ended: {}", operation, e);
            } else {
                tracing::error!("[Workflow] {} failed: {}", operation, e);
                self.notify(Notice::Failure {
                    message: e.to_string(),
                })
                .await;
            }
        }
        result
    }

    async fn notify(&self, notice: Notice) {
        if let Err(e) = self.platform.notifier.notify(notice).await {
            tracing::warn!("[Workflow] Failed to show notice: {}", e);
        }
    }
}
