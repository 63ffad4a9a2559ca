//! Launches the full-screen console.

use anyhow::Result;
use storeadmin_core::config::Config;

#[cfg(feature = "tui")]
pub async fn run(config: &Config) -> Result<()> {
    storeadmin_tui::run_console(config).await
}

#[cfg(not(feature = "tui"))]
pub async fn run(_config: &Config) -> Result<()> {
    anyhow::bail!("This build has no console. Run `storeadmin --help` for commands.")
}
