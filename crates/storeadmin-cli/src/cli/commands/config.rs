//! `storeadmin config ...`

use anyhow::{Context, Result};
use storeadmin_core::config::{Config, paths};

pub fn path() {
    println!("{}", paths::config_path().display());
}

/// Writes the commented default config; refuses to overwrite.
pub fn init() -> Result<()> {
    let target = paths::config_path();
    Config::init(&target).with_context(|| format!("write config to {}", target.display()))?;
    println!("Wrote default config to {}", target.display());
    println!("Set [backend] base_url there, or export STOREADMIN_BASE_URL.");
    Ok(())
}

pub fn generate() -> Result<()> {
    print!("{}", Config::generate().context("render default config")?);
    Ok(())
}

/// Stores `backend.base_url`, keeping the rest of the file's comments.
pub fn set_base_url(url: &str) -> Result<()> {
    Config::save_base_url(url)?;
    println!("Backend set to {url}");
    Ok(())
}
