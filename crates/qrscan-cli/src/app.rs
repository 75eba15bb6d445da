//! Wiring of configuration, adapters and the workflow controller.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use qrscan_application::ScanWorkflowController;
use qrscan_core::config::QrscanConfig;
use qrscan_core::platform::PlatformServices;
use qrscan_infrastructure::paths::QrscanPaths;
use qrscan_infrastructure::{
    CommandClipboard, ConfigService, FileKeyValueStore, KvRecordRepository, SystemOpener,
    VideoDevicePermission, ZbarDecoder,
};

use crate::terminal::{PromptFilePicker, StdoutShare, TerminalActionSheet, TerminalNotifier};

pub async fn load_config(path: Option<&Path>) -> Result<QrscanConfig> {
    let service = match path {
        Some(path) => ConfigService::with_path(path),
        None => ConfigService::new()?,
    };
    let config = service
        .load()
        .await
        .with_context(|| format!("Failed to load config from {}", service.path().display()))?;
    Ok(config)
}

pub struct App {
    pub workflow: Arc<ScanWorkflowController>,
    pub store_path: PathBuf,
}

impl App {
    pub fn build(
        config: QrscanConfig,
        store_override: Option<PathBuf>,
        picked_paths: Vec<PathBuf>,
    ) -> Result<Self> {
        let store_path = match store_override.or(config.storage.file.clone()) {
            Some(path) => path,
            None => QrscanPaths::store_file().context("Failed to resolve the store location")?,
        };
        tracing::debug!("Using store {}", store_path.display());

        let decoder = Arc::new(ZbarDecoder::new(&config.decoder));
        let opener = Arc::new(SystemOpener::new());

        let platform = PlatformServices {
            support: decoder.clone(),
            permissions: Arc::new(VideoDevicePermission::new(&config.decoder.video_device)),
            live_decoder: decoder.clone(),
            image_decoder: decoder,
            file_picker: Arc::new(PromptFilePicker::new(picked_paths)),
            share: Arc::new(StdoutShare),
            clipboard: Arc::new(CommandClipboard::new()),
            browser: opener.clone(),
            url_launcher: opener,
            notifier: Arc::new(TerminalNotifier),
            action_sheet: Arc::new(TerminalActionSheet),
        };

        let repository = Arc::new(KvRecordRepository::new(
            Arc::new(FileKeyValueStore::with_path(&store_path)),
            config.storage.key.clone(),
        ));

        let workflow = Arc::new(ScanWorkflowController::new(
            platform,
            repository,
            config.import.formats.clone(),
        ));

        Ok(Self {
            workflow,
            store_path,
        })
    }
}
