use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod app;
mod commands;
mod logging;
mod terminal;

#[derive(Parser)]
#[command(name = "qrscan")]
#[command(about = "QRSCAN - scan, import, keep and act on QR/barcode results", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (defaults to the platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Key-value store file, overrides `storage.file`
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show scanner support and stored record count
    Status,

    /// Scan one code with the camera
    Scan,

    /// Decode codes from an image (prompts for a path when none is given)
    Import {
        /// Image files; only the first one is decoded
        paths: Vec<PathBuf>,
    },

    /// List stored records
    List {
        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a record's action menu and perform the chosen action
    Menu {
        /// Record id or unique id prefix
        id: String,
    },

    /// Perform one action on a record
    Act {
        /// Record id or unique id prefix
        id: String,

        /// share, copy, delete, open-browser, open-dialer or cancel
        action: String,
    },

    /// Delete a record
    Delete {
        /// Record id or unique id prefix
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = app::load_config(cli.config.as_deref()).await?;
    let _log_guard = logging::init(&config.logging, cli.verbose)?;

    let app = app::App::build(config, cli.store, cli.command.picked_paths())?;
    app.workflow.initialize().await?;

    match cli.command {
        Commands::Status => commands::status(&app).await,
        Commands::Scan => commands::scan(&app).await,
        Commands::Import { .. } => commands::import(&app).await,
        Commands::List { json } => commands::list(&app, json).await,
        Commands::Menu { id } => commands::menu(&app, &id).await,
        Commands::Act { id, action } => commands::act(&app, &id, &action).await,
        Commands::Delete { id } => commands::delete(&app, &id).await,
    }
}

impl Commands {
    /// Paths the file picker hands back; empty means prompt interactively.
    fn picked_paths(&self) -> Vec<PathBuf> {
        match self {
            Commands::Import { paths } => paths.clone(),
            _ => Vec::new(),
        }
    }
}
