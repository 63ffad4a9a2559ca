//! Errors surfaced by the API layer.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field name -> validation messages, as returned in the `errors` envelope key.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Fallback message when the server does not supply one.
pub const DEFAULT_ERROR_MESSAGE: &str = "Something went wrong";

const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please log in again.";

/// Categories of API errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorKind {
    /// Transport-level failure (unreachable host, timeout, TLS)
    Network,
    /// HTTP 401; the session has already been torn down
    AuthenticationExpired,
    /// Non-2xx with a field-level error map
    Validation,
    /// Any other non-2xx, or an envelope with `success: false`
    Server,
    /// The request's scope was cancelled before it completed
    Cancelled,
    /// Body was not JSON or did not match the expected shape
    Decode,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::Network => write!(f, "network"),
            ApiErrorKind::AuthenticationExpired => write!(f, "authentication_expired"),
            ApiErrorKind::Validation => write!(f, "validation"),
            ApiErrorKind::Server => write!(f, "server"),
            ApiErrorKind::Cancelled => write!(f, "cancelled"),
            ApiErrorKind::Decode => write!(f, "decode"),
        }
    }
}

/// Error returned by [`ApiClient::request`](super::ApiClient::request) and
/// the resource wrappers.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    Network {
        message: String,
    },
    AuthenticationExpired {
        message: String,
    },
    Validation {
        status: u16,
        message: String,
        errors: FieldErrors,
    },
    Server {
        status: u16,
        message: String,
    },
    Cancelled,
    Decode {
        message: String,
    },
}

impl ApiError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// A 2xx envelope that reported `success: false`.
    pub fn rejected(message: Option<String>) -> Self {
        Self::Server {
            status: 200,
            message: message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string()),
        }
    }

    /// Builds the error for a 401 response.
    pub fn authentication_expired(body: Option<&Value>) -> Self {
        Self::AuthenticationExpired {
            message: body
                .and_then(server_message)
                .unwrap_or_else(|| SESSION_EXPIRED_MESSAGE.to_string()),
        }
    }

    /// Builds the error for any other non-2xx response.
    ///
    /// A non-empty `errors` object makes it a validation error.
    pub fn from_status(status: u16, body: Option<&Value>) -> Self {
        let message = body
            .and_then(server_message)
            .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string());

        match body.and_then(field_errors) {
            Some(errors) if !errors.is_empty() => Self::Validation {
                status,
                message,
                errors,
            },
            _ => Self::Server { status, message },
        }
    }

    pub fn kind(&self) -> ApiErrorKind {
        match self {
            ApiError::Network { .. } => ApiErrorKind::Network,
            ApiError::AuthenticationExpired { .. } => ApiErrorKind::AuthenticationExpired,
            ApiError::Validation { .. } => ApiErrorKind::Validation,
            ApiError::Server { .. } => ApiErrorKind::Server,
            ApiError::Cancelled => ApiErrorKind::Cancelled,
            ApiError::Decode { .. } => ApiErrorKind::Decode,
        }
    }

    /// One-line summary suitable for a toast.
    pub fn message(&self) -> &str {
        match self {
            ApiError::Network { message }
            | ApiError::AuthenticationExpired { message }
            | ApiError::Validation { message, .. }
            | ApiError::Server { message, .. }
            | ApiError::Decode { message } => message,
            ApiError::Cancelled => "Request cancelled",
        }
    }

    /// HTTP status, when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::AuthenticationExpired { .. } => Some(401),
            ApiError::Validation { status, .. } | ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            ApiError::Validation { errors, .. } => Some(errors),
            _ => None,
        }
    }

    /// First message for a single field, if the server flagged it.
    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.field_errors()?
            .get(field)?
            .first()
            .map(String::as_str)
    }

    pub fn is_auth_expired(&self) -> bool {
        matches!(self, ApiError::AuthenticationExpired { .. })
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network { message } => write!(f, "Network error: {message}"),
            ApiError::Server { status, message } if *status >= 300 => {
                write!(f, "HTTP {status}: {message}")
            }
            _ => write!(f, "{}", self.message()),
        }
    }
}

impl std::error::Error for ApiError {}

/// Result type for API operations.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

fn server_message(body: &Value) -> Option<String> {
    body.get("message")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(ToString::to_string)
}

fn field_errors(body: &Value) -> Option<FieldErrors> {
    let object = body.get("errors")?.as_object()?;
    let errors = object
        .iter()
        .map(|(field, messages)| {
            let messages = match messages {
                Value::Array(items) => items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(ToString::to_string)
                    .collect(),
                Value::String(single) => vec![single.clone()],
                _ => Vec::new(),
            };
            (field.clone(), messages)
        })
        .collect();
    Some(errors)
}
