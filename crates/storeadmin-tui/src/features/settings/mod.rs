//! Profile summary, notification toggles, and logout.

mod render;

use crossterm::event::{KeyCode, KeyEvent};
pub use render::render_settings;
use storeadmin_core::api::{ApiResult, NotificationKind, NotificationSettings};

use crate::common::TaskKind;
use crate::effects::UiEffect;
use crate::state::AppState;
use crate::update::report_error;

/// Row index of the "Log out" entry, after the notification toggles.
pub const LOGOUT_ROW: usize = 3;

#[derive(Debug, Clone, Default)]
pub struct SettingsState {
    pub notifications: NotificationSettings,
    pub selected: usize,
    pub confirm_logout: bool,
}

impl SettingsState {
    pub fn selected_toggle(&self) -> Option<NotificationKind> {
        NotificationKind::all().get(self.selected).copied()
    }
}

pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    if app.settings.confirm_logout {
        return match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                app.settings.confirm_logout = false;
                app.logging_out = true;
                vec![UiEffect::Logout]
            }
            KeyCode::Char('n') | KeyCode::Esc => {
                app.settings.confirm_logout = false;
                vec![]
            }
            _ => vec![],
        };
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            app.settings.selected = app.settings.selected.saturating_sub(1);
            vec![]
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.settings.selected = (app.settings.selected + 1).min(LOGOUT_ROW);
            vec![]
        }
        KeyCode::Enter | KeyCode::Char(' ') => activate(app),
        _ => vec![],
    }
}

fn activate(app: &mut AppState) -> Vec<UiEffect> {
    let Some(kind) = app.settings.selected_toggle() else {
        app.settings.confirm_logout = true;
        return vec![];
    };
    // One save at a time keeps the rollback value accurate.
    if app.tasks.state(TaskKind::Notifications).is_running() {
        return vec![];
    }
    let previous = app.settings.notifications;
    let settings = previous.toggled(kind);
    app.settings.notifications = settings;
    let task = app.task_seq.next_id();
    vec![UiEffect::SaveNotifications {
        task,
        settings,
        previous,
    }]
}

pub fn handle_saved(
    app: &mut AppState,
    previous: NotificationSettings,
    result: ApiResult<Option<String>>,
) {
    match result {
        Ok(message) => {
            app.show_info(message.unwrap_or_else(|| "Notification settings saved".to_string()));
        }
        Err(err) => {
            app.settings.notifications = previous;
            report_error(app, &err);
        }
    }
}
