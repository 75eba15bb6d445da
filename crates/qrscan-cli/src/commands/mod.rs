//! Subcommand handlers.

use anyhow::{Result, anyhow, bail};
use colored::Colorize;

use qrscan_application::{ActionOutcome, ScanOutcome};
use qrscan_core::action::{ActionKind, ActionMenu};
use qrscan_core::error::ScanError;
use qrscan_core::record::{DecodedRecord, RecordId};

use crate::app::App;
use crate::terminal::prompt_line;

pub async fn status(app: &App) -> Result<()> {
    let session = app.workflow.session().await;

    let supported = if session.is_supported {
        "yes".green()
    } else {
        "no".red()
    };
    println!("Scanner supported: {}", supported);
    println!("Stored records:    {}", session.len());
    println!("Store:             {}", app.store_path.display());
    Ok(())
}

pub async fn scan(app: &App) -> Result<()> {
    let result = app.workflow.scan_live().await;
    report_scan(result)
}

pub async fn import(app: &App) -> Result<()> {
    let result = app.workflow.import_from_image().await;
    report_scan(result)
}

fn report_scan(result: qrscan_core::Result<ScanOutcome>) -> Result<()> {
    match result {
        Ok(outcome) => {
            println!(
                "{}",
                format!(
                    "Added {} record(s), {} stored",
                    outcome.added, outcome.total
                )
                .green()
            );
            Ok(())
        }
        Err(ScanError::PickCancelled) => {
            println!("{}", "Nothing picked".bright_black());
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn list(app: &App, json: bool) -> Result<()> {
    let records = app.workflow.records().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("{}", "No records".bright_black());
        return Ok(());
    }

    for record in &records {
        println!(
            "{}  {:<14} {:<12} {}",
            record.id.to_string().bright_black(),
            record.value_type.to_string().cyan(),
            record.format.to_string(),
            record.display_value
        );
    }
    Ok(())
}

pub async fn menu(app: &App, id: &str) -> Result<()> {
    let id = resolve_id(app, id).await?;
    let menu = app.workflow.open_action_menu(&id).await?;

    let choice = prompt_line(&format!("Choose [1-{}]: ", menu.actions.len())).await?;
    let Some(choice) = choice else {
        return report_action(ActionOutcome::Cancelled);
    };

    let kind = choose(&menu, &choice)?;
    perform(app, &menu, kind).await
}

pub async fn act(app: &App, id: &str, action: &str) -> Result<()> {
    let id = resolve_id(app, id).await?;
    let kind: ActionKind = action.parse().map_err(|e: String| anyhow!(e))?;

    let record = find_record(app, &id).await?;
    perform(app, &ActionMenu::for_record(&record), kind).await
}

pub async fn delete(app: &App, id: &str) -> Result<()> {
    let id = resolve_id(app, id).await?;
    if app.workflow.delete_record(&id).await? {
        report_action(ActionOutcome::Deleted)
    } else {
        report_action(ActionOutcome::RecordMissing)
    }
}

async fn perform(app: &App, menu: &ActionMenu, kind: ActionKind) -> Result<()> {
    let Some(action) = menu.find(kind) else {
        bail!("'{}' is not available for this record", kind);
    };
    let outcome = app.workflow.perform_action(action).await?;
    report_action(outcome)
}

fn report_action(outcome: ActionOutcome) -> Result<()> {
    let message = match outcome {
        // Shared text is already on stdout.
        ActionOutcome::Shared => return Ok(()),
        ActionOutcome::Copied => "Copied to clipboard".green(),
        ActionOutcome::Deleted => "Deleted".green(),
        ActionOutcome::OpenedBrowser => "Opened in browser".green(),
        ActionOutcome::OpenedDialer { launched: true } => "Opened dialer".green(),
        ActionOutcome::OpenedDialer { launched: false } => "Dialer not available".yellow(),
        ActionOutcome::Cancelled => "Cancelled".bright_black(),
        ActionOutcome::RecordMissing => "Record no longer exists".yellow(),
    };
    println!("{}", message);
    Ok(())
}

/// Parses a menu choice: a 1-based position or an action name.
fn choose(menu: &ActionMenu, choice: &str) -> Result<ActionKind> {
    if let Ok(position) = choice.parse::<usize>() {
        return menu
            .actions
            .get(position.wrapping_sub(1))
            .map(|a| a.kind)
            .ok_or_else(|| anyhow!("No menu entry {}", position));
    }
    choice.parse().map_err(|e: String| anyhow!(e))
}

async fn find_record(app: &App, id: &RecordId) -> Result<DecodedRecord> {
    app.workflow
        .records()
        .await
        .into_iter()
        .find(|r| &r.id == id)
        .ok_or_else(|| ScanError::not_found("record", id.to_string()).into())
}

/// Accepts a full id or a prefix matching exactly one stored record.
async fn resolve_id(app: &App, input: &str) -> Result<RecordId> {
    if let Ok(id) = input.parse::<RecordId>() {
        return Ok(id);
    }

    let prefix = input.trim().to_ascii_lowercase();
    if prefix.is_empty() {
        bail!("Record id must not be empty");
    }

    let matches: Vec<RecordId> = app
        .workflow
        .records()
        .await
        .into_iter()
        .map(|r| r.id)
        .filter(|id| id.to_string().starts_with(&prefix))
        .collect();

    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(ScanError::not_found("record", input).into()),
        _ => bail!("Id prefix '{}' matches {} records", input, matches.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qrscan_core::config::QrscanConfig;
    use qrscan_core::record::{BarcodeFormat, RecordRepository, ScannedBarcode};
    use qrscan_infrastructure::{FileKeyValueStore, KvRecordRepository};
    use std::sync::Arc;
    use tempfile::TempDir;

    const FIRST: &str = "aaaa0000-0000-4000-8000-000000000001";
    const SECOND: &str = "aaaa0000-0000-4000-8000-000000000002";
    const THIRD: &str = "bbbb0000-0000-4000-8000-000000000003";

    fn stored(id: &str, raw: &str) -> DecodedRecord {
        let mut record =
            DecodedRecord::from_scan(ScannedBarcode::from_raw(raw, BarcodeFormat::QrCode));
        record.id = id.parse().unwrap();
        record
    }

    async fn seeded_app(temp_dir: &TempDir) -> App {
        let store_path = temp_dir.path().join("store.json");
        let mut config = QrscanConfig::default();
        config.decoder.video_device = temp_dir.path().join("no-camera");

        let repo = KvRecordRepository::new(
            Arc::new(FileKeyValueStore::with_path(&store_path)),
            config.storage.key.clone(),
        );
        repo.save(&[
            stored(FIRST, "first note"),
            stored(SECOND, "second note"),
            stored(THIRD, "third note"),
        ])
        .await
        .unwrap();

        let app = App::build(config, Some(store_path), Vec::new()).unwrap();
        app.workflow.initialize().await.unwrap();
        app
    }

    fn url_menu() -> ActionMenu {
        let record = DecodedRecord::from_scan(ScannedBarcode::from_raw(
            "https://example.com",
            BarcodeFormat::QrCode,
        ));
        ActionMenu::for_record(&record)
    }

    #[test]
    fn test_choose_by_position() {
        let menu = url_menu();
        assert_eq!(choose(&menu, "1").unwrap(), ActionKind::OpenBrowser);
        assert_eq!(choose(&menu, "5").unwrap(), ActionKind::Cancel);
        assert!(choose(&menu, "0").is_err());
        assert!(choose(&menu, "6").is_err());
    }

    #[test]
    fn test_choose_by_name() {
        let menu = url_menu();
        assert_eq!(choose(&menu, "copy").unwrap(), ActionKind::Copy);
        assert!(choose(&menu, "launch").is_err());
    }

    #[tokio::test]
    async fn test_resolve_id_by_unique_prefix() {
        let temp_dir = TempDir::new().unwrap();
        let app = seeded_app(&temp_dir).await;

        let id = resolve_id(&app, "BBBB").await.unwrap();
        assert_eq!(id.to_string(), THIRD);
        let id = resolve_id(&app, SECOND).await.unwrap();
        assert_eq!(id.to_string(), SECOND);
    }

    #[tokio::test]
    async fn test_resolve_id_rejects_ambiguous_and_unknown_prefixes() {
        let temp_dir = TempDir::new().unwrap();
        let app = seeded_app(&temp_dir).await;

        let err = resolve_id(&app, "aaaa").await.unwrap_err();
        assert!(err.to_string().contains("matches 2 records"), "{}", err);
        assert!(resolve_id(&app, "cccc").await.is_err());
        assert!(resolve_id(&app, "  ").await.is_err());
    }

    #[tokio::test]
    async fn test_act_rejects_action_missing_from_menu() {
        let temp_dir = TempDir::new().unwrap();
        let app = seeded_app(&temp_dir).await;

        let err = act(&app, THIRD, "open-browser").await.unwrap_err();
        assert!(err.to_string().contains("not available"), "{}", err);
        assert!(act(&app, THIRD, "launch").await.is_err());
        assert_eq!(app.workflow.records().await.len(), 3);

        act(&app, THIRD, "cancel").await.unwrap();
        act(&app, "bbbb", "delete").await.unwrap();
        let remaining: Vec<String> = app
            .workflow
            .records()
            .await
            .iter()
            .map(|r| r.id.to_string())
            .collect();
        assert_eq!(remaining, vec![FIRST.to_string(), SECOND.to_string()]);
    }
}
