//! The session/navigation controller: the single owner of the active screen,
//! the authenticated user, and the selected order/product ids.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::Result;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use super::{NavigationState, Route, Screen, View};
use crate::api::{ApiClient, AuthExpiredListener, Id, User, decode_user};
use crate::credentials::CredentialStore;
use crate::tasks::ScreenScope;

struct SessionState {
    user: Option<User>,
    nav: NavigationState,
    scope: ScreenScope,
}

impl SessionState {
    fn view(&self) -> View {
        View {
            route: self.nav.route,
            user: self.user.clone(),
            selected_order_id: self.nav.selected_order_id.clone(),
            selected_inventory_id: self.nav.selected_inventory_id.clone(),
        }
    }

    fn reset_to_login(&mut self) {
        self.user = None;
        self.nav = NavigationState::login();
        self.scope.rotate();
    }
}

/// Shared via `Arc`; every method takes `&self`.
///
/// The internal lock is never held across an `.await`.
pub struct SessionController {
    credentials: Arc<dyn CredentialStore>,
    state: Mutex<SessionState>,
    changes: watch::Sender<View>,
}

impl SessionController {
    /// Starts in `Bootstrapping` with no user.
    pub fn new(credentials: Arc<dyn CredentialStore>) -> Self {
        let state = SessionState {
            user: None,
            nav: NavigationState::bootstrapping(),
            scope: ScreenScope::new(),
        };
        let (changes, _) = watch::channel(state.view());
        Self {
            credentials,
            state: Mutex::new(state),
            changes,
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        // State is replaced wholesale by each mutation, so a poisoned guard
        // still holds a consistent value.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, state: &SessionState) {
        self.changes.send_replace(state.view());
    }

    /// Validates any persisted credential and leaves `Bootstrapping`.
    ///
    /// A missing credential, a rejected one, and an unreachable backend all
    /// land on `LOGIN` with the credential cleared. If the session moved on
    /// while validation was in flight, the result is discarded.
    pub async fn bootstrap(&self, api: &ApiClient) -> View {
        let token = match self.credentials.get() {
            Ok(token) => token,
            Err(err) => {
                tracing::warn!(error = %format!("{err:#}"), "failed to read persisted credential");
                None
            }
        };

        let validated = match &token {
            Some(_) => match api.current_user().await.and_then(decode_user) {
                Ok(user) => Some(user),
                Err(err) => {
                    tracing::info!(kind = %err.kind(), "persisted credential not accepted");
                    None
                }
            },
            None => None,
        };

        let mut state = self.lock();
        if state.nav.route != Route::Bootstrapping {
            return state.view();
        }

        match validated {
            Some(user) => {
                tracing::info!(user_id = %user.id, "session restored");
                state.user = Some(user);
                state.nav.route = Route::Screen(Screen::Overview);
                state.scope.rotate();
            }
            None => {
                if let Some(token) = &token
                    && let Err(err) = self.credentials.remove_if(token)
                {
                    tracing::warn!(error = %format!("{err:#}"), "failed to clear credential");
                }
                state.reset_to_login();
            }
        }

        self.publish(&state);
        state.view()
    }

    /// Moves to `screen`. With an id, detail screens record their selection
    /// first; without one, the previous selection is kept.
    pub fn navigate(&self, screen: Screen, id: Option<Id>) {
        let mut state = self.lock();
        if let Some(id) = id {
            match screen {
                Screen::OrderDetail => state.nav.selected_order_id = Some(id),
                Screen::InventoryDetail => state.nav.selected_inventory_id = Some(id),
                _ => {}
            }
        }
        state.nav.route = Route::Screen(screen);
        state.scope.rotate();
        tracing::debug!(screen = %screen, "navigate");
        self.publish(&state);
    }

    /// Persists the credential, then enters `OVERVIEW` as `user`.
    ///
    /// # Errors
    /// Returns an error, with the session unchanged, if the credential
    /// cannot be persisted.
    pub fn login(&self, user: User, credential: &str) -> Result<()> {
        self.credentials.set(credential)?;

        let mut state = self.lock();
        tracing::info!(user_id = %user.id, "logged in");
        state.user = Some(user);
        state.nav.route = Route::Screen(Screen::Overview);
        state.scope.rotate();
        self.publish(&state);
        Ok(())
    }

    /// Clears credential, user and selections and returns to `LOGIN`.
    /// Idempotent.
    pub fn logout(&self) {
        if let Err(err) = self.credentials.remove() {
            tracing::warn!(error = %format!("{err:#}"), "failed to clear credential");
        }

        let mut state = self.lock();
        if state.user.is_some() {
            tracing::info!("logged out");
        }
        state.reset_to_login();
        self.publish(&state);
    }

    pub fn current_view(&self) -> View {
        self.lock().view()
    }

    pub fn is_authenticated(&self) -> bool {
        self.lock().user.is_some()
    }

    /// Cancellation token for fetches belonging to the current screen.
    pub fn screen_scope(&self) -> CancellationToken {
        self.lock().scope.current()
    }

    /// Receives a snapshot after every transition.
    pub fn subscribe(&self) -> watch::Receiver<View> {
        self.changes.subscribe()
    }
}

impl AuthExpiredListener for SessionController {
    fn on_auth_expired(&self) {
        let mut state = self.lock();
        // A credential stored by now belongs to a login that raced the 401.
        if matches!(self.credentials.get(), Ok(Some(_))) {
            tracing::info!("ignoring expiry for a replaced session");
            return;
        }
        tracing::info!("session expired");
        state.reset_to_login();
        self.publish(&state);
    }
}
