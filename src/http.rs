//! REST request executor.
//!
//! Thin wrapper over `reqwest`: one call, one outcome. Response
//! classification is pure (`classify_response`) so it can be tested without
//! a socket; only the 401 path has a side effect, and it runs before any
//! other classification.
//!
//! No retries happen here. A failed attempt is surfaced immediately and the
//! caller decides whether to try again.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{ApiError, RequestOutcome};
use crate::session::SessionVault;

const SUCCESS_MESSAGE: &str = "operation succeeded";

/// HTTP methods used against the REST backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    fn to_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload returned for successful responses without a body (e.g. 204).
#[must_use]
pub fn success_sentinel() -> Value {
    serde_json::json!({ "success": true, "message": SUCCESS_MESSAGE })
}

// =============================================================================
// CLIENT
// =============================================================================

/// REST client bound to one base URL and one session vault.
///
/// Cheap to clone; clones share the connection pool and the vault.
#[derive(Clone, Debug)]
pub struct HttpClient {
    http: reqwest::Client,
    config: ClientConfig,
    vault: SessionVault,
}

impl HttpClient {
    /// Build a client for `config`, reading credentials from `vault`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::HttpClientBuild`] if the TLS backend or connection
    /// pool cannot be initialized.
    pub fn new(config: ClientConfig, vault: SessionVault) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeouts.request_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = config.timeouts.connect_secs {
            builder = builder.connect_timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, config, vault })
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    #[must_use]
    pub fn vault(&self) -> &SessionVault {
        &self.vault
    }

    /// Execute one call against `base_url + endpoint`.
    ///
    /// `body` is sent as JSON for every method except GET. The persisted
    /// session's token, when present, is attached as a bearer credential.
    ///
    /// # Errors
    ///
    /// - [`ApiError::SessionExpired`] on 401, after the session is destroyed
    /// - [`ApiError::RequestFailed`] on any other non-2xx status
    /// - [`ApiError::Transport`] when no response arrives
    /// - [`ApiError::Decode`] when a 2xx body is not JSON
    pub async fn request(&self, method: Method, endpoint: &str, body: Option<&Value>) -> RequestOutcome {
        let url = self.config.url(endpoint);
        let token = self.vault.token();
        let response = self.send(method, &url, body, token.as_deref()).await?;

        let status = response.status().as_u16();
        if status == 401 {
            warn!(%method, %url, "credential rejected; ending session");
            self.vault.expire();
            return Err(ApiError::SessionExpired);
        }

        let text = read_body(response).await?;
        let outcome = classify_response(status, &text);
        if let Err(e) = &outcome {
            debug!(%method, %url, status, error = %e, "api call rejected");
        }
        outcome
    }

    /// GET without credentials, leaving the session untouched.
    ///
    /// # Errors
    ///
    /// As [`Self::request`], except that a 401 is an ordinary
    /// [`ApiError::RequestFailed`] and never ends the session.
    pub async fn get_anonymous(&self, endpoint: &str) -> RequestOutcome {
        let url = self.config.url(endpoint);
        let response = self.send(Method::Get, &url, None, None).await?;

        let status = response.status().as_u16();
        let text = read_body(response).await?;
        if status == 401 {
            return Err(ApiError::RequestFailed { status, message: error_message(status, &text) });
        }
        classify_response(status, &text)
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
        token: Option<&str>,
    ) -> Result<reqwest::Response, ApiError> {
        debug!(%method, %url, authenticated = token.is_some(), "api call");

        let mut req = self
            .http
            .request(method.to_reqwest(), url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        if method != Method::Get
            && let Some(body) = body
        {
            req = req.json(body);
        }

        req.send().await.map_err(|e| {
            warn!(%method, %url, error = %e, "api call failed without response");
            ApiError::Transport(e.to_string())
        })
    }

    /// [`Self::request`] followed by decoding into `T`.
    ///
    /// # Errors
    ///
    /// As [`Self::request`], plus [`ApiError::Decode`] if the payload does
    /// not match `T`.
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
    ) -> RequestOutcome<T> {
        decode(self.request(method, endpoint, body).await?)
    }

    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn get(&self, endpoint: &str) -> RequestOutcome {
        self.request(Method::Get, endpoint, None).await
    }

    /// # Errors
    ///
    /// See [`Self::request_json`].
    pub async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> RequestOutcome<T> {
        self.request_json(Method::Get, endpoint, None).await
    }

    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn post(&self, endpoint: &str, body: &Value) -> RequestOutcome {
        self.request(Method::Post, endpoint, Some(body)).await
    }

    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn put(&self, endpoint: &str, body: &Value) -> RequestOutcome {
        self.request(Method::Put, endpoint, Some(body)).await
    }

    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn delete(&self, endpoint: &str) -> RequestOutcome {
        self.request(Method::Delete, endpoint, None).await
    }
}

// =============================================================================
// CLASSIFICATION
// =============================================================================

async fn read_body(response: reqwest::Response) -> Result<String, ApiError> {
    response.text().await.map_err(|e| ApiError::Transport(e.to_string()))
}

/// Map a status and raw body to an outcome.
pub(crate) fn classify_response(status: u16, body: &str) -> RequestOutcome {
    if status == 401 {
        return Err(ApiError::SessionExpired);
    }
    if !(200..300).contains(&status) {
        return Err(ApiError::RequestFailed { status, message: error_message(status, body) });
    }
    if status == 204 || body.trim().is_empty() {
        return Ok(success_sentinel());
    }
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// User-facing message for a failed response: the JSON `detail` field, else
/// the raw text, else `"error <status>"`.
pub(crate) fn error_message(status: u16, body: &str) -> String {
    let fallback = format!("error {status}");
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        return detail_message(&json).unwrap_or(fallback);
    }
    let text = body.trim();
    if text.is_empty() { fallback } else { text.to_owned() }
}

fn detail_message(json: &Value) -> Option<String> {
    match json.get("detail")? {
        Value::String(detail) if !detail.trim().is_empty() => Some(detail.clone()),
        // Validation errors arrive as `[{"loc": [...], "msg": "...", ...}]`.
        Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        Value::Object(obj) => obj.get("msg").and_then(Value::as_str).map(str::to_owned),
        _ => None,
    }
}

/// Decode a payload into a typed record at the client boundary.
///
/// # Errors
///
/// Returns [`ApiError::Decode`] if the shape does not match `T`.
pub fn decode<T: DeserializeOwned>(value: Value) -> RequestOutcome<T> {
    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;
