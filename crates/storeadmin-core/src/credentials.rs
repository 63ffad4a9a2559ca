//! Persisted credential storage.
//!
//! The bearer token lives in `<base>/credentials.json` under a single key,
//! written with restricted permissions (0600). Tokens are never logged.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};

use crate::config::paths;

/// Key the bearer token is stored under.
pub const TOKEN_KEY: &str = "store_admin_token";

/// Opaque key-value store holding the session credential.
///
/// Removing an absent credential is not an error.
pub trait CredentialStore: Send + Sync {
    /// Returns the persisted credential, if any.
    ///
    /// # Errors
    /// Returns an error if the backing storage cannot be read.
    fn get(&self) -> Result<Option<String>>;

    /// Persists the credential, replacing any previous one.
    ///
    /// # Errors
    /// Returns an error if the backing storage cannot be written.
    fn set(&self, token: &str) -> Result<()>;

    /// Removes the persisted credential.
    ///
    /// # Errors
    /// Returns an error if the backing storage cannot be written.
    fn remove(&self) -> Result<()>;

    /// Removes the credential only if it still equals `expected`.
    ///
    /// Returns whether it was removed. A credential replaced by a newer
    /// session is left alone.
    ///
    /// # Errors
    /// Returns an error if the backing storage cannot be read or written.
    fn remove_if(&self, expected: &str) -> Result<bool>;
}

/// File-backed credential store.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location under `STOREADMIN_HOME`.
    pub fn default_location() -> Self {
        Self::new(paths::credentials_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read credentials from {}", self.path.display()))?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse credentials from {}", self.path.display()))
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents =
            serde_json::to_string_pretty(entries).context("Failed to serialize credentials")?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&self.path)
                .with_context(|| format!("Failed to open {} for writing", self.path.display()))?;
            file.write_all(contents.as_bytes())
                .with_context(|| format!("Failed to write to {}", self.path.display()))?;
        }

        #[cfg(not(unix))]
        {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&self.path)
                .with_context(|| format!("Failed to open {} for writing", self.path.display()))?;
            file.write_all(contents.as_bytes())
                .with_context(|| format!("Failed to write to {}", self.path.display()))?;
        }

        Ok(())
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self) -> Result<Option<String>> {
        Ok(self
            .load()?
            .remove(TOKEN_KEY)
            .filter(|token| !token.trim().is_empty()))
    }

    fn set(&self, token: &str) -> Result<()> {
        let mut entries = self.load().unwrap_or_default();
        entries.insert(TOKEN_KEY.to_string(), token.to_string());
        self.save(&entries)
    }

    fn remove(&self) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        // A corrupt file is rewritten empty; teardown must always succeed.
        let Ok(mut entries) = self.load() else {
            return self.save(&BTreeMap::new());
        };
        if entries.remove(TOKEN_KEY).is_none() {
            return Ok(());
        }
        self.save(&entries)
    }
    fn remove_if(&self, expected: &str) -> Result<bool> {
        let mut entries = self.load()?;
        if entries.get(TOKEN_KEY).map(String::as_str) != Some(expected) {
            return Ok(false);
        }
        entries.remove(TOKEN_KEY);
        self.save(&entries)?;
        Ok(true)
    }
}

/// In-memory credential store.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    token: Mutex<Option<String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> Result<Option<String>> {
        let guard = self
            .token
            .lock()
            .map_err(|_| anyhow::anyhow!("credential store lock poisoned"))?;
        Ok(guard.clone())
    }

    fn set(&self, token: &str) -> Result<()> {
        let mut guard = self
            .token
            .lock()
            .map_err(|_| anyhow::anyhow!("credential store lock poisoned"))?;
        *guard = Some(token.to_string());
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        let mut guard = self
            .token
            .lock()
            .map_err(|_| anyhow::anyhow!("credential store lock poisoned"))?;
        *guard = None;
        Ok(())
    }
    fn remove_if(&self, expected: &str) -> Result<bool> {
        let mut guard = self
            .token
            .lock()
            .map_err(|_| anyhow::anyhow!("credential store lock poisoned"))?;
        if guard.as_deref() != Some(expected) {
            return Ok(false);
        }
        *guard = None;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_missing_file_is_absent() {
        let dir = tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("credentials.json"));
        assert_eq!(store.get().unwrap(), None);
    }

    #[test]
    fn test_set_then_get_round_trips_through_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("credentials.json");
        let store = FileCredentialStore::new(&path);

        store.set("tok-123").unwrap();

        let reopened = FileCredentialStore::new(&path);
        assert_eq!(reopened.get().unwrap().as_deref(), Some("tok-123"));
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains(TOKEN_KEY));
    }

    #[cfg(unix)]
    #[test]
    fn test_credentials_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        FileCredentialStore::new(&path).set("tok").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("credentials.json"));

        store.remove().unwrap();
        store.set("tok").unwrap();
        store.remove().unwrap();
        store.remove().unwrap();

        assert_eq!(store.get().unwrap(), None);
    }

    #[test]
    fn test_corrupt_file_is_an_error_but_set_recovers() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        fs::write(&path, "{not json").unwrap();
        let store = FileCredentialStore::new(&path);

        assert!(store.get().is_err());
        store.set("fresh").unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("fresh"));
    }

    #[test]
    fn test_remove_if_leaves_a_replaced_credential() {
        let dir = tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("credentials.json"));
        store.set("stale").unwrap();
        store.set("fresh").unwrap();

        assert!(!store.remove_if("stale").unwrap());
        assert_eq!(store.get().unwrap().as_deref(), Some("fresh"));

        assert!(store.remove_if("fresh").unwrap());
        assert_eq!(store.get().unwrap(), None);
        assert!(!store.remove_if("fresh").unwrap());
    }

    #[test]
    fn test_memory_remove_if() {
        let store = MemoryCredentialStore::with_token("fresh");
        assert!(!store.remove_if("stale").unwrap());
        assert_eq!(store.get().unwrap().as_deref(), Some("fresh"));
        assert!(store.remove_if("fresh").unwrap());
        assert_eq!(store.get().unwrap(), None);
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryCredentialStore::with_token("tok-1");
        assert_eq!(store.get().unwrap().as_deref(), Some("tok-1"));
        store.set("tok-2").unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("tok-2"));
        store.remove().unwrap();
        assert_eq!(store.get().unwrap(), None);
    }
}
