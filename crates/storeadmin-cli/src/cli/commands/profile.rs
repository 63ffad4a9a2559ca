//! Profile, avatar, password and notification preferences.

use std::path::Path;

use anyhow::{Context, Result};
use storeadmin_core::api::{
    AvatarUpload, NotificationKind, NotificationSettings, PasswordChange, ProfileUpdate,
    decode_confirmation, decode_user,
};
use storeadmin_core::config::Config;

use super::confirm;
use crate::cli::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Switch {
    On,
    Off,
}

impl Switch {
    fn is_on(self) -> bool {
        self == Switch::On
    }
}

pub async fn update(config: &Config, update: &ProfileUpdate) -> Result<()> {
    if update.is_empty() {
        anyhow::bail!("Nothing to update: pass --name, --email or --phone");
    }
    let (session, _) = Session::require_login(config).await?;
    let body = session
        .api
        .update_profile(update)
        .await
        .context("update profile")?;
    match decode_user(body.clone()) {
        Ok(user) => println!("Profile saved for {}", user.display_name()),
        Err(_) => confirm(decode_confirmation(&body)?, "Profile saved"),
    }
    Ok(())
}

pub async fn avatar(config: &Config, path: &Path) -> Result<()> {
    let upload = AvatarUpload::from_path(path)?;
    let (session, _) = Session::require_login(config).await?;
    let body = session
        .api
        .update_avatar(upload)
        .await
        .with_context(|| format!("upload {}", path.display()))?;
    confirm(decode_confirmation(&body)?, "Avatar updated");
    Ok(())
}

pub async fn password(config: &Config, current: String, new: String) -> Result<()> {
    if new.is_empty() {
        anyhow::bail!("New password cannot be empty");
    }
    let (session, _) = Session::require_login(config).await?;
    let change = PasswordChange::new(current, new);
    let body = session
        .api
        .update_password(&change)
        .await
        .context("change password")?;
    confirm(decode_confirmation(&body)?, "Password changed");
    Ok(())
}

/// Saves the preferences, starting from the defaults for any switch not given.
pub async fn notifications(
    config: &Config,
    push: Option<Switch>,
    orders: Option<Switch>,
    reports: Option<Switch>,
) -> Result<()> {
    let settings = apply_switches(NotificationSettings::default(), push, orders, reports);
    let (session, _) = Session::require_login(config).await?;
    let body = session
        .api
        .update_notification_settings(&settings)
        .await
        .context("save notification settings")?;
    confirm(decode_confirmation(&body)?, "Notification settings saved");
    for kind in NotificationKind::all() {
        let state = if settings.get(kind) { "on" } else { "off" };
        println!("  {}: {state}", kind.label());
    }
    Ok(())
}

fn apply_switches(
    mut settings: NotificationSettings,
    push: Option<Switch>,
    orders: Option<Switch>,
    reports: Option<Switch>,
) -> NotificationSettings {
    if let Some(push) = push {
        settings.push_notifications = push.is_on();
    }
    if let Some(orders) = orders {
        settings.order_updates = orders.is_on();
    }
    if let Some(reports) = reports {
        settings.daily_reports = reports.is_on();
    }
    settings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_switches_keep_defaults() {
        let settings = apply_switches(
            NotificationSettings::default(),
            None,
            Some(Switch::Off),
            Some(Switch::On),
        );
        assert!(settings.push_notifications);
        assert!(!settings.order_updates);
        assert!(settings.daily_reports);
    }
}
