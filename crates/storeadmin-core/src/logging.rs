//! tracing subscriber setup.
//!
//! The CLI logs to stderr. The console owns the terminal, so it logs to
//! `$STOREADMIN_HOME/logs/console.log` through a non-blocking writer.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Env var that overrides `logging.filter`.
pub const LOG_ENV: &str = "STOREADMIN_LOG";

const CONSOLE_LOG_FILE: &str = "console.log";
const FALLBACK_FILTER: &str = "warn";

/// Picks the filter directive: env var, then config, then `warn`.
fn resolve_filter(env_value: Option<&str>, configured: &str) -> String {
    env_value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .or_else(|| Some(configured.trim()).filter(|value| !value.is_empty()))
        .unwrap_or(FALLBACK_FILTER)
        .to_string()
}

fn env_filter(config: &LoggingConfig) -> EnvFilter {
    let env_value = std::env::var(LOG_ENV).ok();
    let directive = resolve_filter(env_value.as_deref(), &config.filter);
    EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(FALLBACK_FILTER))
}

/// Logs to stderr. A no-op if a subscriber is already installed.
pub fn init_stderr(config: &LoggingConfig) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Logs to `<dir>/console.log` when `logging.file` is set.
///
/// Keep the returned guard alive until exit so buffered lines are flushed.
///
/// # Errors
/// Returns an error if the log directory cannot be created.
pub fn init_file(config: &LoggingConfig, dir: &Path) -> Result<Option<WorkerGuard>> {
    if !config.file {
        return Ok(None);
    }

    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(dir, CONSOLE_LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_ansi(false)
        .with_writer(writer)
        .try_init();

    Ok(Some(guard))
}
