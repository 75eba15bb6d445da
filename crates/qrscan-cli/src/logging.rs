//! Tracing setup.

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use qrscan_core::config::LoggingConfig;
use qrscan_infrastructure::paths::QrscanPaths;

const LOG_FILE_PREFIX: &str = "qrscan.log";

/// Installs the global subscriber.
///
/// Console output goes to stderr so stdout stays clean for `list --json`.
/// `RUST_LOG` wins over the configured level; `--verbose` wins over both.
/// The returned guard must be held until exit to flush the log file.
pub fn init(config: &LoggingConfig, verbose: bool) -> Result<Option<WorkerGuard>> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
    };

    let (file_layer, guard) = if config.file {
        match QrscanPaths::log_dir() {
            Ok(dir) => {
                let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
                let (writer, guard) = tracing_appender::non_blocking(appender);
                let layer = fmt::layer().with_writer(writer).with_ansi(false);
                (Some(layer), Some(guard))
            }
            Err(e) => {
                eprintln!("Log file disabled: {}", e);
                (None, None)
            }
        }
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()?;

    Ok(guard)
}
