//! Sign-in, sign-out and session inspection.

use std::sync::Arc;

use anyhow::{Context, Result};
use storeadmin_core::api::{LoginRequest, LoginResponse, User, decode_data};
use storeadmin_core::config::Config;
use storeadmin_core::credentials::{CredentialStore, FileCredentialStore};
use storeadmin_core::session::SessionController;

use crate::cli::session::Session;

pub async fn login(config: &Config, email: String, password: String) -> Result<()> {
    let session = Session::open(config)?;
    let request = LoginRequest {
        email: email.trim().to_string(),
        password,
    };
    let body = session.api.login(&request).await.context("sign in")?;
    let LoginResponse { user, token } = decode_data(body).context("read sign-in response")?;

    let greeting = describe(&user);
    session
        .controller
        .login(user, &token)
        .context("save session")?;
    println!("Logged in as {greeting}");
    Ok(())
}

pub fn logout() -> Result<()> {
    let store = Arc::new(FileCredentialStore::default_location());
    let had_session = store.get().context("read stored session")?.is_some();
    SessionController::new(store).logout();
    if had_session {
        println!("Logged out.");
    } else {
        println!("No stored session.");
    }
    Ok(())
}

pub async fn whoami(config: &Config) -> Result<()> {
    let (_, user) = Session::require_login(config).await?;
    println!("{}", user.display_name());
    if !user.email.is_empty() {
        println!("Email: {}", user.email);
    }
    if let Some(phone) = &user.phone {
        println!("Phone: {phone}");
    }
    if let Some(role) = &user.role {
        println!("Role:  {role}");
    }
    if let Some(store) = &user.store {
        println!("Store: {}", store.name);
    }
    Ok(())
}

pub async fn status(config: &Config) -> Result<()> {
    let session = Session::open(config)?;
    println!("Backend: {}", session.api.base_url());
    let view = session.bootstrap().await;
    match (view.screen(), &view.user) {
        (Some(screen), Some(user)) => {
            println!("Signed in as {}", describe(user));
            println!("Start screen: {screen}");
        }
        (Some(screen), None) => {
            println!("Not signed in");
            println!("Start screen: {screen}");
        }
        (None, _) => println!("Session is still starting"),
    }
    Ok(())
}

fn describe(user: &User) -> String {
    if user.email.is_empty() || user.display_name() == user.email {
        user.display_name().to_string()
    } else {
        format!("{} <{}>", user.display_name(), user.email)
    }
}
