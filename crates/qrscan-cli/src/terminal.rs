//! Terminal implementations of the interactive capabilities.

use async_trait::async_trait;
use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::path::PathBuf;

use qrscan_core::action::{ActionMenu, ActionRole};
use qrscan_core::error::{Result, ScanError};
use qrscan_core::notice::Notice;
use qrscan_core::platform::{
    ActionSheetPresenter, FilePicker, Notifier, PickedFile, ShareProvider,
};

/// Prints notices to stderr.
pub struct TerminalNotifier;

#[async_trait]
impl Notifier for TerminalNotifier {
    async fn notify(&self, notice: Notice) -> Result<()> {
        let header = match notice {
            Notice::PermissionDenied | Notice::Failure { .. } => notice.header().red().bold(),
            _ => notice.header().yellow().bold(),
        };
        eprintln!("{}", header);
        eprintln!("{}", notice.message());
        Ok(())
    }
}

/// Prints the action sheet as a numbered list.
pub struct TerminalActionSheet;

#[async_trait]
impl ActionSheetPresenter for TerminalActionSheet {
    async fn present(&self, menu: &ActionMenu) -> Result<()> {
        println!("{}", menu.header.bright_magenta().bold());
        for (index, action) in menu.actions.iter().enumerate() {
            let label = match action.role {
                ActionRole::Destructive => action.label.red(),
                ActionRole::Cancel => action.label.bright_black(),
                ActionRole::Default => action.label.normal(),
            };
            println!("  {}. {}", index + 1, label);
        }
        Ok(())
    }
}

/// "Shares" by writing the text to stdout.
pub struct StdoutShare;

#[async_trait]
impl ShareProvider for StdoutShare {
    async fn share_text(&self, text: &str) -> Result<()> {
        println!("{}", text);
        Ok(())
    }
}

/// Hands back the paths given on the command line, or asks for one.
pub struct PromptFilePicker {
    paths: Vec<PathBuf>,
}

impl PromptFilePicker {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }
}

#[async_trait]
impl FilePicker for PromptFilePicker {
    async fn pick_images(&self, multiple: bool) -> Result<Vec<PickedFile>> {
        let mut paths = if self.paths.is_empty() {
            match prompt_line("Image path: ").await? {
                Some(line) => vec![PathBuf::from(line)],
                None => Vec::new(),
            }
        } else {
            self.paths.clone()
        };

        if !multiple {
            paths.truncate(1);
        }

        let mut picked = Vec::with_capacity(paths.len());
        for path in paths {
            let mut file = PickedFile::from_path(&path);
            file.size = tokio::fs::metadata(&path).await.ok().map(|m| m.len());
            picked.push(file);
        }
        Ok(picked)
    }
}

/// Reads one line from the terminal.
///
/// Returns `None` for an empty line, Ctrl-C or Ctrl-D.
pub async fn prompt_line(prompt: &str) -> Result<Option<String>> {
    let prompt = prompt.to_string();
    let line = tokio::task::spawn_blocking(move || -> Result<Option<String>> {
        let mut editor = DefaultEditor::new()
            .map_err(|e| ScanError::provider("terminal", e.to_string()))?;
        match editor.readline(&prompt) {
            Ok(line) => Ok(Some(line)),
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
            Err(e) => Err(ScanError::provider("terminal", e.to_string())),
        }
    })
    .await
    .map_err(|e| ScanError::internal(format!("Prompt task failed: {}", e)))??;

    Ok(line
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty()))
}
