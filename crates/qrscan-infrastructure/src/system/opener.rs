use async_trait::async_trait;
use tokio::process::Command;

use qrscan_core::error::{Result, ScanError};
use qrscan_core::platform::{BrowserLauncher, UrlLauncher};

/// Hands URLs and URIs to the operating system's default handler.
#[derive(Debug, Clone, Default)]
pub struct SystemOpener;

impl SystemOpener {
    pub fn new() -> Self {
        Self
    }

    fn command(target: &str) -> Command {
        #[cfg(target_os = "macos")]
        {
            let mut cmd = Command::new("open");
            cmd.arg(target);
            cmd
        }

        #[cfg(target_os = "windows")]
        {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", "start", "", target]);
            cmd
        }

        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        {
            let mut cmd = Command::new("xdg-open");
            cmd.arg(target);
            cmd
        }
    }

    /// Runs the opener; `Ok(false)` when no handler accepted the target.
    async fn launch(target: &str) -> Result<bool> {
        tracing::debug!("[Opener] Opening {}", target);

        match Self::command(target).status().await {
            Ok(status) => {
                if !status.success() {
                    tracing::warn!("[Opener] Handler for {} exited with {}", target, status);
                }
                Ok(status.success())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!("[Opener] No system opener available: {}", e);
                Ok(false)
            }
            Err(e) => Err(ScanError::provider(
                "url launcher",
                format!("Failed to open {}: {}", target, e),
            )),
        }
    }
}

#[async_trait]
impl BrowserLauncher for SystemOpener {
    async fn open_url(&self, url: &str) -> Result<()> {
        if Self::launch(url).await? {
            Ok(())
        } else {
            Err(ScanError::provider(
                "browser",
                format!("No browser could open {}", url),
            ))
        }
    }
}

#[async_trait]
impl UrlLauncher for SystemOpener {
    async fn open_uri(&self, uri: &str) -> Result<bool> {
        Self::launch(uri).await
    }
}
