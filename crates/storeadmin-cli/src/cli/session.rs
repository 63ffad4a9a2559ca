//! Session wiring shared by every command that talks to the backend.

use std::sync::Arc;

use anyhow::{Context, Result};
use storeadmin_core::api::{ApiClient, AuthExpiredListener, User};
use storeadmin_core::config::Config;
use storeadmin_core::credentials::{CredentialStore, FileCredentialStore};
use storeadmin_core::session::{SessionController, View};

pub const NOT_LOGGED_IN: &str = "Not logged in. Run `storeadmin login` first.";

pub struct Session {
    pub controller: Arc<SessionController>,
    pub api: ApiClient,
}

impl Session {
    /// Builds the controller and client around the on-disk credential.
    pub fn open(config: &Config) -> Result<Self> {
        let credentials: Arc<dyn CredentialStore> =
            Arc::new(FileCredentialStore::default_location());
        let controller = Arc::new(SessionController::new(Arc::clone(&credentials)));
        let listener: Arc<dyn AuthExpiredListener> = Arc::clone(&controller) as _;
        let api = ApiClient::from_config(&config.backend, credentials)
            .context("create API client")?
            .with_auth_listener(listener);
        tracing::debug!(base_url = %api.base_url(), "session opened");
        Ok(Self { controller, api })
    }

    pub async fn bootstrap(&self) -> View {
        self.controller.bootstrap(&self.api).await
    }

    /// Opens a session and fails unless the stored credential is accepted.
    pub async fn require_login(config: &Config) -> Result<(Self, User)> {
        let session = Self::open(config)?;
        let user = session.bootstrap().await.user.context(NOT_LOGGED_IN)?;
        Ok((session, user))
    }
}
