//! Wire types shared by every resource: ids, the response envelope, list
//! payloads, and lenient number parsing.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::error::{ApiError, ApiResult, FieldErrors};

pub use super::models::*;

/// Resource identifier. The backend sends numbers for some resources and
/// strings (e.g. `#ORD-9921`) for others; both land here as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Id(pub String);

impl Id {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Id {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<u64> for Id {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl FromStr for Id {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err("id must not be empty".to_string());
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Signed(i64),
            Unsigned(u64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => Id(text),
            RawId::Signed(n) => Id(n.to_string()),
            RawId::Unsigned(n) => Id(n.to_string()),
        })
    }
}

/// `{success, data, message, errors}` response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    #[serde(default = "default_success")]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Option<FieldErrors>,
}

fn default_success() -> bool {
    true
}

impl<T: DeserializeOwned> Envelope<T> {
    /// Decodes a raw body returned by the API layer.
    ///
    /// # Errors
    /// Returns [`ApiError::Decode`] when the body does not match the shape.
    pub fn from_value(value: Value) -> ApiResult<Self> {
        serde_json::from_value(value)
            .map_err(|e| ApiError::decode(format!("Unexpected response shape: {e}")))
    }

    /// Returns the payload, treating `success: false` as a server error.
    ///
    /// # Errors
    /// Returns an error when the envelope reports failure or has no data.
    pub fn into_data(self) -> ApiResult<T> {
        if !self.success {
            return Err(ApiError::rejected(self.message));
        }
        self.data
            .ok_or_else(|| ApiError::decode("Response envelope has no data"))
    }
}

/// Decodes `body.data` as `T` in one step.
///
/// # Errors
/// Returns an error when decoding fails or the envelope reports failure.
pub fn decode_data<T: DeserializeOwned>(body: Value) -> ApiResult<T> {
    Envelope::<T>::from_value(body)?.into_data()
}

/// Decodes the current-user payload, which is either the user itself or
/// `{ "user": {...} }`.
///
/// # Errors
/// Returns an error when decoding fails or the envelope reports failure.
pub fn decode_user(body: Value) -> ApiResult<User> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum UserPayload {
        Wrapped { user: User },
        Bare(User),
    }

    Ok(match decode_data::<UserPayload>(body)? {
        UserPayload::Wrapped { user } | UserPayload::Bare(user) => user,
    })
}

/// Returns the envelope's `message`, if any (for mutation confirmations).
pub fn envelope_message(body: &Value) -> Option<&str> {
    body.get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.trim().is_empty())
}

/// Interprets a mutation response: `success: false` becomes an error,
/// otherwise the confirmation message (if any) is returned.
///
/// # Errors
/// Returns `ApiError::Server` when the envelope reports failure.
pub fn decode_confirmation(body: &Value) -> ApiResult<Option<String>> {
    let message = envelope_message(body).map(str::to_string);
    if body.get("success").and_then(Value::as_bool) == Some(false) {
        return Err(ApiError::rejected(message));
    }
    Ok(message)
}

/// A list payload: either a bare array or a paginated object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListPayload<T> {
    Items(Vec<T>),
    Page(Page<T>),
}

/// Paginated list as produced by the backend's paginator.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub current_page: Option<u64>,
    #[serde(default)]
    pub last_page: Option<u64>,
}

impl<T> ListPayload<T> {
    /// Total count across pages when known, otherwise the item count.
    pub fn total(&self) -> u64 {
        match self {
            ListPayload::Items(items) => items.len() as u64,
            ListPayload::Page(page) => page.total.unwrap_or(page.data.len() as u64),
        }
    }

    pub fn items(&self) -> &[T] {
        match self {
            ListPayload::Items(items) => items,
            ListPayload::Page(page) => &page.data,
        }
    }

    pub fn into_items(self) -> Vec<T> {
        match self {
            ListPayload::Items(items) => items,
            ListPayload::Page(page) => page.data,
        }
    }
}

/// Decodes `body.data` as a list of `T`.
///
/// # Errors
/// Returns an error when decoding fails or the envelope reports failure.
pub fn decode_list<T: DeserializeOwned>(body: Value) -> ApiResult<ListPayload<T>> {
    decode_data(body)
}

// ============================================================================
// Lenient number parsing (decimal columns often arrive as strings)
// ============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Float(f64),
    Text(String),
}

pub(crate) fn flex_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match Option::<RawNumber>::deserialize(deserializer)? {
        None => Ok(0.0),
        Some(RawNumber::Float(n)) => Ok(n),
        Some(RawNumber::Text(text)) => parse_number(&text).map_err(serde::de::Error::custom),
    }
}

pub(crate) fn flex_opt_f64<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<f64>, D::Error> {
    match Option::<RawNumber>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawNumber::Float(n)) => Ok(Some(n)),
        Some(RawNumber::Text(text)) => parse_number(&text)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

pub(crate) fn flex_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = flex_f64(deserializer)?;
    Ok(value.round() as i64)
}

pub(crate) fn flex_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let value = flex_f64(deserializer)?;
    if value < 0.0 {
        return Err(serde::de::Error::custom(format!(
            "expected a non-negative count, got {value}"
        )));
    }
    Ok(value.round() as u64)
}

fn parse_number(text: &str) -> Result<f64, String> {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | '%' | ' '))
        .collect();
    if cleaned.is_empty() {
        return Ok(0.0);
    }
    cleaned
        .parse::<f64>()
        .map_err(|_| format!("invalid number: {text}"))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::api::ApiErrorKind;

    #[test]
    fn test_id_accepts_numbers_and_strings() {
        let ids: Vec<Id> = serde_json::from_value(json!([1, "#ORD-9921", -3])).unwrap();
        assert_eq!(ids, vec![Id::from("1"), Id::from("#ORD-9921"), Id::from("-3")]);
        assert_eq!(serde_json::to_value(Id::from(7)).unwrap(), json!("7"));
    }

    #[test]
    fn test_envelope_into_data() {
        let body = json!({"success": true, "data": {"id": 1, "name": "A", "email": "a@b.c"}});
        let user: User = decode_data(body).unwrap();
        assert_eq!(user.id, Id::from("1"));
    }

    #[test]
    fn test_decode_user_accepts_wrapped_and_bare() {
        let wrapped = json!({"success": true, "data": {"user": {"id": 1, "name": "Owner"}}});
        assert_eq!(decode_user(wrapped).unwrap().name, "Owner");

        let bare = json!({"success": true, "data": {"id": "9", "name": "Bare"}});
        assert_eq!(decode_user(bare).unwrap().id, Id::from("9"));
    }

    #[test]
    fn test_envelope_failure_is_rejected() {
        let body = json!({"success": false, "message": "Invalid credentials"});
        let err = decode_data::<User>(body).unwrap_err();
        assert_eq!(err.message(), "Invalid credentials");
    }

    #[test]
    fn test_envelope_without_data_decodes() {
        let envelope =
            Envelope::<User>::from_value(json!({"success": true, "message": "Saved"})).unwrap();
        assert!(envelope.data.is_none());
        assert_eq!(envelope.message.as_deref(), Some("Saved"));

        let err = envelope.into_data().unwrap_err();
        assert_eq!(err.kind(), ApiErrorKind::Decode);
    }

    #[test]
    fn test_decode_confirmation() {
        let ok = decode_confirmation(&json!({"success": true, "message": "Order updated"}));
        assert_eq!(ok.unwrap().as_deref(), Some("Order updated"));
        assert_eq!(decode_confirmation(&Value::Null).unwrap(), None);

        let err = decode_confirmation(&json!({"success": false, "message": "Locked"})).unwrap_err();
        assert_eq!(err.message(), "Locked");
    }

    #[test]
    fn test_envelope_without_data_is_decode_error() {
        let err = decode_data::<User>(json!({"success": true})).unwrap_err();
        assert_eq!(err.kind(), crate::api::ApiErrorKind::Decode);
    }

    #[test]
    fn test_list_payload_bare_and_paginated() {
        let bare: ListPayload<Customer> = decode_list(json!({
            "success": true,
            "data": [{"id": 1, "name": "Ann", "email": "ann@x.io", "order_count": 3}]
        }))
        .unwrap();
        assert_eq!(bare.total(), 1);

        let paged: ListPayload<Customer> = decode_list(json!({
            "success": true,
            "data": {
                "data": [{"id": 2, "name": "Bo", "email": "bo@x.io"}],
                "total": 40,
                "current_page": 1,
                "last_page": 4
            }
        }))
        .unwrap();
        assert_eq!(paged.total(), 40);
        assert_eq!(paged.items()[0].name, "Bo");
    }

    #[test]
    fn test_parse_number_strips_formatting() {
        assert_eq!(parse_number("$1,240.00").unwrap(), 1240.0);
        assert_eq!(parse_number("12%").unwrap(), 12.0);
        assert_eq!(parse_number("").unwrap(), 0.0);
        assert!(parse_number("abc").is_err());
    }
}
