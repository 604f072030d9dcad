//! File-based tracing setup. The terminal belongs to the TUI, so log output
//! goes to `logs/library-desk.log` inside the data directory.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_FILE_NAME: &str = "library-desk.log";

/// Install the global subscriber. The returned guard flushes pending lines
/// when dropped, so `main` has to hold it until shutdown.
pub fn init_logging(level: &str, log_dir: &Path) -> Result<WorkerGuard> {
    fs::create_dir_all(log_dir).context("failed to create log directory")?;

    let filter = EnvFilter::try_new(level)
        .with_context(|| format!("invalid log level directive '{level}'"))?;
    let appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|err| anyhow!("failed to install log subscriber: {err}"))?;

    Ok(guard)
}
