//! Configuration management for storeadmin.
//!
//! Loads configuration from ${STOREADMIN_HOME}/config.toml with sensible defaults.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use toml_edit::{DocumentMut, Item, Table, value};

use crate::api::types::DashboardPeriod;

/// Env var that overrides the resolved backend base URL.
pub const BASE_URL_ENV: &str = "STOREADMIN_BASE_URL";
/// Env var that overrides the host used for environment detection.
pub const HOST_ENV: &str = "STOREADMIN_HOST";

/// Commented template shipped in the binary; refreshed by
/// `cargo run -p xtask -- update-default-config`.
const TEMPLATE: &str = include_str!("../default_config.toml");

fn template_document() -> Result<DocumentMut> {
    TEMPLATE
        .parse()
        .context("default_config.toml is not valid TOML")
}

/// Copies every value of `overrides` onto `base`, descending into tables so
/// the template's comments and key order survive.
fn overlay(base: &mut Table, overrides: &Table) {
    for (key, item) in overrides.iter() {
        if let Item::Table(replacement) = item
            && let Some(Item::Table(inner)) = base.get_mut(key)
        {
            overlay(inner, replacement);
        } else if !item.is_none() {
            base[key] = item.clone();
        }
    }
}

/// The template with `toml_text` laid over it.
fn on_template(toml_text: &str, what: &str) -> Result<DocumentMut> {
    let overrides: DocumentMut = toml_text
        .parse()
        .with_context(|| format!("parse {what}"))?;
    let mut doc = template_document()?;
    overlay(doc.as_table_mut(), overrides.as_table());
    Ok(doc)
}

pub mod paths {
    //! Path resolution for storeadmin configuration and data directories.
    //!
    //! STOREADMIN_HOME resolution order:
    //! 1. STOREADMIN_HOME environment variable (if set)
    //! 2. ~/.config/storeadmin (default)
    //! 3. ./.storeadmin when no home directory can be determined

    use std::path::PathBuf;

    /// Returns the storeadmin home directory.
    pub fn storeadmin_home() -> PathBuf {
        if let Ok(home) = std::env::var("STOREADMIN_HOME")
            && !home.trim().is_empty()
        {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".storeadmin"),
            |h| h.join(".config").join("storeadmin"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        storeadmin_home().join("config.toml")
    }

    /// Returns the path to the persisted credential file.
    pub fn credentials_path() -> PathBuf {
        storeadmin_home().join("credentials.json")
    }

    /// Returns the directory console logs are written to.
    pub fn logs_dir() -> PathBuf {
        storeadmin_home().join("logs")
    }
}

/// Which backend the host detection picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendTarget {
    Local,
    Production,
}

impl BackendTarget {
    /// Classifies a host name. Loopback names and `.local`/`.localhost`
    /// suffixes are local development hosts.
    pub fn from_host(host: &str) -> Self {
        let host = host.trim().trim_start_matches('[').trim_end_matches(']');
        let host = host.to_ascii_lowercase();
        let is_local = matches!(host.as_str(), "localhost" | "127.0.0.1" | "::1" | "0.0.0.0")
            || host.ends_with(".localhost")
            || host.ends_with(".local");
        if is_local { Self::Local } else { Self::Production }
    }
}

/// Backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Explicit base URL; skips host detection when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Host used for local/production detection.
    pub host: String,
    pub local_url: String,
    pub production_url: String,
    /// Request timeout in seconds (0 disables).
    pub timeout_secs: u64,
}

impl BackendConfig {
    pub const DEFAULT_HOST: &str = "localhost";
    pub const DEFAULT_LOCAL_URL: &str = "http://localhost:8000/api/v1";
    pub const DEFAULT_PRODUCTION_URL: &str = "https://admin.sultanstore.app/api/v1";
    const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Returns the explicit base URL, treating empty strings as unset.
    pub fn effective_base_url(&self) -> Option<&str> {
        self.base_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    /// Resolves the backend base URL once, at startup.
    ///
    /// Resolution order:
    /// 1. `STOREADMIN_BASE_URL` env var (if set and non-empty)
    /// 2. `backend.base_url`
    /// 3. host detection (`STOREADMIN_HOST` env var, then `backend.host`)
    ///
    /// # Errors
    /// Returns an error if the chosen URL is malformed.
    pub fn resolve_base_url(&self) -> Result<String> {
        let env_url = std::env::var(BASE_URL_ENV).ok();
        let env_host = std::env::var(HOST_ENV).ok();
        self.resolve_base_url_with(env_url.as_deref(), env_host.as_deref())
    }

    /// Same as [`resolve_base_url`](Self::resolve_base_url) with the env
    /// values passed in.
    ///
    /// # Errors
    /// Returns an error if the chosen URL is malformed.
    pub fn resolve_base_url_with(
        &self,
        env_url: Option<&str>,
        env_host: Option<&str>,
    ) -> Result<String> {
        let explicit = env_url
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .or_else(|| self.effective_base_url());

        let url = if let Some(url) = explicit {
            url.to_string()
        } else {
            let host = env_host
                .map(str::trim)
                .filter(|host| !host.is_empty())
                .unwrap_or(&self.host);
            match BackendTarget::from_host(host) {
                BackendTarget::Local => self.local_url.clone(),
                BackendTarget::Production => self.production_url.clone(),
            }
        };

        url::Url::parse(&url).with_context(|| format!("Invalid backend base URL: {url}"))?;
        Ok(url.trim_end_matches('/').to_string())
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            host: Self::DEFAULT_HOST.to_string(),
            local_url: Self::DEFAULT_LOCAL_URL.to_string(),
            production_url: Self::DEFAULT_PRODUCTION_URL.to_string(),
            timeout_secs: Self::DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Search-as-you-type settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Quiet period after the last keystroke, in milliseconds.
    pub debounce_ms: u64,
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { debounce_ms: 300 }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// tracing filter directive (e.g. "warn", "storeadmin_core=debug").
    pub filter: String,
    /// Write console logs to a file under the home directory.
    pub file: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
            file: true,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Dashboard period shown first.
    pub dashboard_period: DashboardPeriod,

    /// Backend connection settings.
    pub backend: BackendConfig,

    /// Debounced search settings.
    pub search: SearchConfig,

    /// Logging settings.
    pub logging: LoggingConfig,
}

impl Config {
    /// Reads `config.toml` under `STOREADMIN_HOME`.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Reads `path`, falling back to defaults when there is no file.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        let Some(text) = read_if_present(path)? else {
            return Ok(Config::default());
        };
        toml::from_str(&text).with_context(|| format!("parse {}", path.display()))
    }

    /// Stores `backend.base_url` in the default config file.
    ///
    /// # Errors
    /// Returns an error if the URL is malformed or the file cannot be written.
    pub fn save_base_url(url: &str) -> Result<()> {
        Self::save_base_url_to(&paths::config_path(), url)
    }

    /// Stores `backend.base_url` in `path`.
    ///
    /// The file is rebuilt on the current template with the user's values on
    /// top, so new settings show up with their comments.
    ///
    /// # Errors
    /// Returns an error if the URL is malformed or the file cannot be written.
    pub fn save_base_url_to(path: &Path, url: &str) -> Result<()> {
        url::Url::parse(url).with_context(|| format!("Invalid backend base URL: {url}"))?;

        let mut doc = match read_if_present(path)? {
            Some(text) => on_template(&text, &path.display().to_string())?,
            None => template_document()?,
        };
        doc["backend"]["base_url"] = value(url);
        write_atomic(path, &doc.to_string())
    }

    /// Writes the commented template to `path`.
    ///
    /// # Errors
    /// Returns an error if the file already exists or cannot be written.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }
        write_atomic(path, TEMPLATE)
    }

    /// Renders `Config::default()` onto the template.
    ///
    /// `xtask` compares this with `default_config.toml` to catch drift between
    /// the `Default` impls and the shipped comments.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn generate() -> Result<String> {
        let defaults =
            toml::to_string(&Config::default()).context("serialize default config")?;
        Ok(on_template(&defaults, "default config")?.to_string())
    }
}

fn read_if_present(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err).with_context(|| format!("read {}", path.display())),
    }
}

/// Temp file + rename, so a crash never leaves a half-written config.
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let staging = path.with_extension("toml.tmp");
    fs::write(&staging, content).with_context(|| format!("write {}", staging.display()))?;
    fs::rename(&staging, path)
        .with_context(|| format!("move {} into place", staging.display()))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("nonexistent.toml");

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.backend.host, "localhost");
        assert_eq!(config.search.debounce_ms, 300);
        assert_eq!(config.dashboard_period, DashboardPeriod::Today);
    }

    #[test]
    fn test_load_partial_config_merges_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(
            &config_path,
            "dashboard_period = \"last_7_days\"\n[backend]\nhost = \"admin.example.com\"\n",
        )
        .unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.dashboard_period, DashboardPeriod::Last7Days);
        assert_eq!(config.backend.host, "admin.example.com");
        assert_eq!(config.backend.local_url, BackendConfig::DEFAULT_LOCAL_URL);
        assert_eq!(config.backend.timeout_secs, 30);
    }

    #[test]
    fn test_init_creates_config_with_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("subdir").join("config.toml");

        Config::init(&config_path).unwrap();

        let contents = fs::read_to_string(&config_path).unwrap();
        assert!(contents.contains("debounce_ms = 300"));
        assert!(contents.contains("# base_url ="));
    }

    #[test]
    fn test_init_fails_if_exists() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "").unwrap();

        assert!(Config::init(&config_path).is_err());
    }

    #[test]
    fn test_template_parses_to_defaults() {
        let config: Config = toml::from_str(TEMPLATE).unwrap();
        let defaults = Config::default();
        assert_eq!(config.backend.host, defaults.backend.host);
        assert_eq!(config.backend.local_url, defaults.backend.local_url);
        assert_eq!(config.backend.production_url, defaults.backend.production_url);
        assert_eq!(config.search.debounce_ms, defaults.search.debounce_ms);
        assert_eq!(config.logging.filter, defaults.logging.filter);
    }

    #[test]
    fn test_local_hosts_map_to_local_backend() {
        for host in ["localhost", "127.0.0.1", "::1", "[::1]", "shop.local", "Dev.Localhost"] {
            assert_eq!(BackendTarget::from_host(host), BackendTarget::Local, "{host}");
        }
        assert_eq!(
            BackendTarget::from_host("admin.sultanstore.app"),
            BackendTarget::Production
        );
    }

    #[test]
    fn test_resolve_base_url_from_host() {
        let mut backend = BackendConfig::default();
        assert_eq!(
            backend.resolve_base_url_with(None, None).unwrap(),
            BackendConfig::DEFAULT_LOCAL_URL
        );

        backend.host = "store.example.com".to_string();
        assert_eq!(
            backend.resolve_base_url_with(None, None).unwrap(),
            BackendConfig::DEFAULT_PRODUCTION_URL
        );

        assert_eq!(
            backend.resolve_base_url_with(None, Some("localhost")).unwrap(),
            BackendConfig::DEFAULT_LOCAL_URL
        );
    }

    #[test]
    fn test_resolve_base_url_precedence() {
        let backend = BackendConfig {
            base_url: Some("https://config.example.com/api/v1/".to_string()),
            ..Default::default()
        };
        assert_eq!(
            backend.resolve_base_url_with(None, None).unwrap(),
            "https://config.example.com/api/v1"
        );
        assert_eq!(
            backend
                .resolve_base_url_with(Some("http://127.0.0.1:9000/api/v1"), None)
                .unwrap(),
            "http://127.0.0.1:9000/api/v1"
        );
        assert_eq!(
            backend.resolve_base_url_with(Some("  "), None).unwrap(),
            "https://config.example.com/api/v1"
        );
    }

    #[test]
    fn test_resolve_base_url_rejects_garbage() {
        let backend = BackendConfig {
            base_url: Some("not a url".to_string()),
            ..Default::default()
        };
        assert!(backend.resolve_base_url_with(None, None).is_err());
    }

    #[test]
    fn test_timeout_zero_disables() {
        let backend = BackendConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(backend.timeout(), None);
        assert_eq!(
            BackendConfig::default().timeout(),
            Some(Duration::from_secs(30))
        );
    }

    #[test]
    fn test_save_base_url_creates_file_with_template() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        Config::save_base_url_to(&config_path, "https://admin.example.com/api/v1").unwrap();

        let contents = fs::read_to_string(&config_path).unwrap();
        assert!(contents.contains("debounce_ms"));
        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(
            config.backend.effective_base_url(),
            Some("https://admin.example.com/api/v1")
        );
    }

    #[test]
    fn test_save_base_url_preserves_other_fields() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "[search]\ndebounce_ms = 150\n").unwrap();

        Config::save_base_url_to(&config_path, "http://localhost:9000/api/v1").unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.search.debounce_ms, 150);
        assert_eq!(
            config.backend.effective_base_url(),
            Some("http://localhost:9000/api/v1")
        );
    }

    #[test]
    fn test_generate_contains_defaults() {
        let generated = Config::generate().unwrap();
        let config: Config = toml::from_str(&generated).unwrap();
        assert_eq!(config.search.debounce_ms, 300);
        assert!(generated.contains("# storeadmin configuration"));
    }
}
