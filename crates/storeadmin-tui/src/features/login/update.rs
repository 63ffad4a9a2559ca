//! Login form reducer.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use storeadmin_core::api::LoginRequest;

use super::{LoginField, LoginState};
use crate::effects::UiEffect;
use crate::events::LoginError;
use crate::state::AppState;

pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    if app.login.submitting {
        return vec![];
    }
    let login = &mut app.login;

    match key.code {
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            login.focus = login.focus.other();
            vec![]
        }
        KeyCode::Enter if login.focus == LoginField::Email => {
            login.focus = LoginField::Password;
            vec![]
        }
        KeyCode::Enter => submit(app),
        KeyCode::Backspace => {
            let focus = login.focus;
            login.value_mut(focus).pop();
            login.field_errors.remove(focus.key());
            vec![]
        }
        KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            login.show_password = !login.show_password;
            vec![]
        }
        KeyCode::Char(c)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            let focus = login.focus;
            login.value_mut(focus).push(c);
            login.field_errors.remove(focus.key());
            vec![]
        }
        _ => vec![],
    }
}

pub fn handle_paste(login: &mut LoginState, text: &str) {
    if login.submitting {
        return;
    }
    let focus = login.focus;
    let line = text.lines().next().unwrap_or_default();
    login.value_mut(focus).push_str(line);
    login.field_errors.remove(focus.key());
}

fn submit(app: &mut AppState) -> Vec<UiEffect> {
    let login = &mut app.login;
    login.error = None;
    login.field_errors.clear();

    let email = login.email.trim().to_string();
    if email.is_empty() {
        login
            .field_errors
            .insert("email".to_string(), vec!["Email is required".to_string()]);
    }
    if login.password.is_empty() {
        login
            .field_errors
            .insert("password".to_string(), vec!["Password is required".to_string()]);
    }
    if !login.field_errors.is_empty() {
        login.focus = first_invalid(login).unwrap_or(login.focus);
        return vec![];
    }

    login.submitting = true;
    let request = LoginRequest {
        email,
        password: login.password.clone(),
    };
    let task = app.task_seq.next_id();
    vec![UiEffect::SubmitLogin { task, request }]
}

pub fn handle_login_finished(login: &mut LoginState, result: Result<(), LoginError>) {
    login.submitting = false;
    match result {
        Ok(()) => reset_form(login),
        Err(err) => {
            login.password.clear();
            login.field_errors = err.field_errors;
            // Field messages already explain a validation failure.
            login.error = login.field_errors.is_empty().then_some(err.message);
            login.focus = first_invalid(login).unwrap_or(LoginField::Password);
        }
    }
}

/// Clears secrets and messages; keeps the email for the next attempt.
pub fn reset_form(login: &mut LoginState) {
    login.password.clear();
    login.show_password = false;
    login.submitting = false;
    login.error = None;
    login.field_errors.clear();
    login.focus = if login.email.is_empty() {
        LoginField::Email
    } else {
        LoginField::Password
    };
}

fn first_invalid(login: &LoginState) -> Option<LoginField> {
    [LoginField::Email, LoginField::Password]
        .into_iter()
        .find(|field| login.field_error(*field).is_some())
}
