use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use qrscan_core::error::{Result, ScanError};
use qrscan_core::platform::ClipboardProvider;

/// Clipboard writes through the platform's copy utility.
///
/// Candidates are tried in order; the first one that exists wins.
#[derive(Debug, Clone)]
pub struct CommandClipboard {
    candidates: Vec<(String, Vec<String>)>,
}

impl Default for CommandClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandClipboard {
    pub fn new() -> Self {
        Self::with_candidates(Self::platform_candidates())
    }

    pub fn with_candidates(candidates: Vec<(String, Vec<String>)>) -> Self {
        Self { candidates }
    }

    fn platform_candidates() -> Vec<(String, Vec<String>)> {
        let list: Vec<(&str, Vec<&str>)> = if cfg!(target_os = "macos") {
            vec![("pbcopy", vec![])]
        } else if cfg!(target_os = "windows") {
            vec![("clip", vec![])]
        } else {
            vec![
                ("wl-copy", vec![]),
                ("xclip", vec!["-selection", "clipboard"]),
                ("xsel", vec!["--clipboard", "--input"]),
            ]
        };

        list.into_iter()
            .map(|(program, args)| {
                (
                    program.to_string(),
                    args.into_iter().map(String::from).collect(),
                )
            })
            .collect()
    }

    async fn pipe_to(program: &str, args: &[String], text: &str) -> std::io::Result<bool> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes()).await?;
        }

        Ok(child.wait().await?.success())
    }
}

#[async_trait]
impl ClipboardProvider for CommandClipboard {
    async fn write_text(&self, text: &str) -> Result<()> {
        for (program, args) in &self.candidates {
            match Self::pipe_to(program, args, text).await {
                Ok(true) => {
                    tracing::debug!("[Clipboard] Copied {} byte(s) via {}", text.len(), program);
                    return Ok(());
                }
                Ok(false) => {
                    tracing::debug!("[Clipboard] {} exited unsuccessfully", program);
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => {
                    return Err(ScanError::provider(
                        "clipboard",
                        format!("{} failed: {}", program, e),
                    ));
                }
            }
        }

        Err(ScanError::provider("clipboard", "No clipboard utility found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_no_candidates_is_provider_error() {
        let clipboard = CommandClipboard::with_candidates(vec![(
            "qrscan-test-no-such-copy".to_string(),
            Vec::new(),
        )]);

        let err = clipboard.write_text("hello").await.unwrap_err();
        assert!(matches!(err, ScanError::Provider { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_first_working_candidate_wins() {
        let clipboard = CommandClipboard::with_candidates(vec![
            ("qrscan-test-no-such-copy".to_string(), Vec::new()),
            ("cat".to_string(), Vec::new()),
        ]);

        clipboard.write_text("hello").await.unwrap();
    }
}
