//! Request gateway for the store-admin backend.
//!
//! Every outbound call goes through [`ApiClient::request`], which attaches the
//! persisted bearer token, normalizes errors, and tears the session down on
//! HTTP 401.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use url::Url;

use super::error::{ApiError, ApiResult};
use crate::config::BackendConfig;
use crate::credentials::CredentialStore;

const USER_AGENT: &str = concat!("storeadmin/", env!("CARGO_PKG_VERSION"));

/// Notified when the backend rejects the session (HTTP 401).
///
/// Called after the persisted credential has been removed. A 401 for a
/// credential that was replaced while the request was in flight is not
/// reported.
pub trait AuthExpiredListener: Send + Sync {
    fn on_auth_expired(&self);
}

/// Request payload.
pub enum RequestBody {
    Empty,
    Json(Value),
    /// Content type (with boundary) is left to the transport.
    Multipart(reqwest::multipart::Form),
}

/// Method, query, body and cancellation for one request.
pub struct RequestOptions {
    method: Method,
    query: Vec<(String, String)>,
    body: RequestBody,
    cancel: Option<CancellationToken>,
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            query: Vec::new(),
            body: RequestBody::Empty,
            cancel: None,
        }
    }

    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    pub fn post() -> Self {
        Self::new(Method::POST)
    }

    pub fn put() -> Self {
        Self::new(Method::PUT)
    }

    pub fn patch() -> Self {
        Self::new(Method::PATCH)
    }

    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn query_pairs(mut self, pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    #[must_use]
    pub fn multipart(mut self, form: reqwest::multipart::Form) -> Self {
        self.body = RequestBody::Multipart(form);
        self
    }

    /// Abandons the request with [`ApiError::Cancelled`] once `token` fires.
    #[must_use]
    pub fn cancel_with(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }
}

/// HTTP client for the store-admin API.
///
/// Cheap to clone; clones share the connection pool, credential store and
/// auth listener.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    credentials: Arc<dyn CredentialStore>,
    auth_listener: Option<Arc<dyn AuthExpiredListener>>,
    scope: Option<CancellationToken>,
}

impl ApiClient {
    /// Creates a client for an already-resolved base URL.
    ///
    /// # Errors
    /// Returns an error if the URL is malformed or the HTTP client cannot be
    /// built.
    pub fn new(
        base_url: &str,
        timeout: Option<Duration>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Result<Self> {
        let base =
            Url::parse(base_url).with_context(|| format!("Invalid backend base URL: {base_url}"))?;
        if base.cannot_be_a_base() {
            anyhow::bail!("Invalid backend base URL: {base_url}");
        }

        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base,
            credentials,
            auth_listener: None,
            scope: None,
        })
    }

    /// Resolves the base URL from config and env once, then builds the client.
    ///
    /// # Errors
    /// Returns an error if the resolved URL is malformed.
    pub fn from_config(
        backend: &BackendConfig,
        credentials: Arc<dyn CredentialStore>,
    ) -> Result<Self> {
        let base_url = backend.resolve_base_url()?;
        tracing::info!(base_url = %base_url, "resolved backend");
        Self::new(&base_url, backend.timeout(), credentials)
    }

    #[must_use]
    pub fn with_auth_listener(mut self, listener: Arc<dyn AuthExpiredListener>) -> Self {
        self.auth_listener = Some(listener);
        self
    }

    /// Returns a clone whose requests are all cancelled by `token`, unless a
    /// request carries its own.
    #[must_use]
    pub fn scoped(&self, token: CancellationToken) -> Self {
        let mut scoped = self.clone();
        scoped.scope = Some(token);
        scoped
    }

    pub fn base_url(&self) -> &str {
        self.base.as_str().trim_end_matches('/')
    }

    /// Appends `segments` to the base URL's path, percent-encoding each one.
    fn url<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Url {
        let mut url = self.base.clone();
        // Checked in `new`: the base can always take path segments.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Issues one request against a fixed `/`-separated endpoint such as
    /// `/store-admin/orders`.
    ///
    /// # Errors
    /// See [`ApiClient::request_at`].
    pub async fn request(&self, endpoint: &str, options: RequestOptions) -> ApiResult<Value> {
        let url = self.url(endpoint.split('/').filter(|s| !s.is_empty()));
        self.send(url, options).await
    }

    /// Issues one request against the base URL plus `segments`. Segments are
    /// taken verbatim, so ids like `#ORD-9921` or `a/b` stay one segment.
    ///
    /// On success the parsed body is returned unchanged; callers interpret
    /// the envelope. A 2xx with an empty body yields `Value::Null`.
    ///
    /// # Errors
    /// See [`ApiError`]. A 401 has already cleared the credential and
    /// notified the auth listener when it is returned, unless the credential
    /// was replaced while the request was in flight.
    pub async fn request_at<'a>(
        &self,
        segments: impl IntoIterator<Item = &'a str>,
        options: RequestOptions,
    ) -> ApiResult<Value> {
        let url = self.url(segments);
        self.send(url, options).await
    }

    async fn send(&self, url: Url, options: RequestOptions) -> ApiResult<Value> {
        let RequestOptions {
            method,
            query,
            body,
            cancel,
        } = options;
        let cancel = cancel.or_else(|| self.scope.clone());

        if cancel.as_ref().is_some_and(CancellationToken::is_cancelled) {
            return Err(ApiError::Cancelled);
        }

        let credential = match self.credentials.get() {
            Ok(credential) => credential,
            Err(err) => {
                tracing::warn!(error = %format!("{err:#}"), "failed to read credential");
                None
            }
        };

        let endpoint = url.path().to_owned();
        let mut builder = self
            .http
            .request(method.clone(), url)
            .header(ACCEPT, "application/json");
        if !query.is_empty() {
            builder = builder.query(&query);
        }
        if let Some(credential) = &credential {
            builder = builder.bearer_auth(credential);
        }
        builder = match body {
            RequestBody::Empty => builder.header(CONTENT_TYPE, "application/json"),
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(form) => builder.multipart(form),
        };

        let exchange = async {
            let response = builder.send().await.map_err(transport_error)?;
            let status = response.status();
            let text = response.text().await.map_err(transport_error)?;
            Ok::<_, ApiError>((status, text))
        };

        let result = match cancel {
            Some(token) => tokio::select! {
                biased;
                () = token.cancelled() => Err(ApiError::Cancelled),
                result = exchange => result,
            },
            None => exchange.await,
        };

        let (status, text) = match result {
            Ok(exchanged) => exchanged,
            Err(err) => {
                tracing::debug!(
                    method = %method,
                    endpoint = %endpoint,
                    error = %err,
                    "api request failed"
                );
                return Err(err);
            }
        };
        tracing::debug!(
            method = %method,
            endpoint = %endpoint,
            status = status.as_u16(),
            "api request"
        );

        self.interpret(status, &text, credential.as_deref())
    }

    /// `sent` is the credential the request carried, if any.
    fn interpret(&self, status: StatusCode, text: &str, sent: Option<&str>) -> ApiResult<Value> {
        let body = if text.trim().is_empty() {
            None
        } else {
            serde_json::from_str::<Value>(text).ok()
        };

        if status == StatusCode::UNAUTHORIZED {
            self.expire_session(sent);
            return Err(ApiError::authentication_expired(body.as_ref()));
        }

        if !status.is_success() {
            return Err(ApiError::from_status(status.as_u16(), body.as_ref()));
        }

        match body {
            Some(value) => Ok(value),
            None if text.trim().is_empty() => Ok(Value::Null),
            None => Err(ApiError::decode(format!(
                "Expected JSON from server (HTTP {})",
                status.as_u16()
            ))),
        }
    }

    fn expire_session(&self, sent: Option<&str>) {
        let Some(sent) = sent else {
            tracing::debug!("401 for a request without a credential; session untouched");
            return;
        };
        match self.credentials.remove_if(sent) {
            Ok(true) => tracing::info!("backend rejected credential; clearing session"),
            Ok(false) => {
                tracing::info!("backend rejected a credential that was already replaced");
                return;
            }
            Err(err) => {
                tracing::warn!(error = %format!("{err:#}"), "failed to clear credential");
            }
        }
        if let Some(listener) = &self.auth_listener {
            listener.on_auth_expired();
        }
    }
}

fn transport_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::network("Request timed out")
    } else if err.is_connect() {
        ApiError::network("Could not reach the server")
    } else {
        ApiError::network(err.to_string())
    }
}

/// Serializes a typed payload for [`RequestOptions::json`].
pub(crate) fn to_body<T: Serialize>(payload: &T) -> ApiResult<Value> {
    serde_json::to_value(payload)
        .map_err(|e| ApiError::decode(format!("Failed to encode request: {e}")))
}
