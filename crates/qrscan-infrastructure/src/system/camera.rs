use async_trait::async_trait;
use std::path::PathBuf;

use qrscan_core::error::Result;
use qrscan_core::platform::{PermissionProvider, PermissionState};

/// Derives camera permission from access to a video device node.
///
/// There is no prompt on desktop: a readable device counts as granted,
/// a missing or unreadable one as denied.
#[derive(Debug, Clone)]
pub struct VideoDevicePermission {
    device: PathBuf,
}

impl VideoDevicePermission {
    pub fn new(device: impl Into<PathBuf>) -> Self {
        Self {
            device: device.into(),
        }
    }
}

#[async_trait]
impl PermissionProvider for VideoDevicePermission {
    async fn request_camera_permission(&self) -> Result<PermissionState> {
        match tokio::fs::File::open(&self.device).await {
            Ok(_) => Ok(PermissionState::Granted),
            Err(e) => {
                tracing::debug!("[Camera] {:?} not accessible: {}", self.device, e);
                Ok(PermissionState::Denied)
            }
        }
    }
}
