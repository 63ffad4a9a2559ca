//! Sign-in form.

mod render;
mod update;

pub use render::render_login;
pub use storeadmin_core::api::FieldErrors;
pub use update::{handle_key, handle_login_finished, handle_paste, reset_form};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Email,
    Password,
}

impl LoginField {
    /// Key used by the backend's validation map.
    pub fn key(self) -> &'static str {
        match self {
            LoginField::Email => "email",
            LoginField::Password => "password",
        }
    }

    pub fn other(self) -> Self {
        match self {
            LoginField::Email => LoginField::Password,
            LoginField::Password => LoginField::Email,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoginState {
    pub email: String,
    pub password: String,
    pub focus: LoginField,
    pub show_password: bool,
    pub submitting: bool,
    /// Form-level message (e.g. "Invalid credentials").
    pub error: Option<String>,
    pub field_errors: FieldErrors,
}

impl LoginState {
    pub fn value(&self, field: LoginField) -> &str {
        match field {
            LoginField::Email => &self.email,
            LoginField::Password => &self.password,
        }
    }

    fn value_mut(&mut self, field: LoginField) -> &mut String {
        match field {
            LoginField::Email => &mut self.email,
            LoginField::Password => &mut self.password,
        }
    }

    /// First validation message for `field`, if any.
    pub fn field_error(&self, field: LoginField) -> Option<&str> {
        self.field_errors
            .get(field.key())
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }
}
