//! Full-screen store-admin console.

pub mod common;
pub mod effects;
pub mod events;
pub mod features;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, stderr};
use std::sync::Arc;

use anyhow::Result;
pub use runtime::TuiRuntime;
use storeadmin_core::config::{Config, paths};
use storeadmin_core::credentials::FileCredentialStore;
use storeadmin_core::logging;

/// Runs the console until the user quits.
///
/// Logs go to a file under the home directory; the terminal belongs to the
/// console.
///
/// # Errors
/// Returns an error if stderr is not a terminal, the backend URL cannot be
/// resolved, or the terminal fails.
pub async fn run_console(config: &Config) -> Result<()> {
    if !stderr().is_terminal() {
        anyhow::bail!(
            "The console requires a terminal.\n\
             Use `storeadmin --help` for non-interactive commands."
        );
    }

    let _log_guard = logging::init_file(&config.logging, &paths::logs_dir())?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "console starting");

    let credentials = Arc::new(FileCredentialStore::default_location());
    let mut runtime = TuiRuntime::new(config, credentials)?;
    runtime.run()
}
