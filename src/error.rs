//! Error taxonomy for data-access calls.
//!
//! DESIGN
//! ======
//! Every failure a REST call can produce is one `ApiError` variant. The
//! `Display` text of each variant is the user-facing message that resource
//! bindings surface in their `error` slot, so `RequestFailed` renders the
//! backend-provided message verbatim.

/// Stable machine-readable code and retry hint for an error.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

/// Errors produced by [`crate::http::HttpClient`] and resource bindings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The backend rejected the credential (HTTP 401). The session has
    /// already been destroyed when this is returned.
    #[error("session expired; please log in again")]
    SessionExpired,

    /// The backend answered with a non-success status, other than a 401 on
    /// an authenticated call.
    #[error("{message}")]
    RequestFailed { status: u16, message: String },

    /// No response was received at all.
    #[error("could not reach server: {0}")]
    Transport(String),

    /// A success response did not have the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ApiError {
    /// HTTP status behind the error, when the backend answered.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::SessionExpired => Some(401),
            Self::RequestFailed { status, .. } => Some(*status),
            Self::Transport(_) | Self::Decode(_) | Self::HttpClientBuild(_) => None,
        }
    }

    /// Whether the backend could not be reached.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

impl ErrorCode for ApiError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::SessionExpired => "E_SESSION_EXPIRED",
            Self::RequestFailed { .. } => "E_REQUEST_FAILED",
            Self::Transport(_) => "E_TRANSPORT",
            Self::Decode(_) => "E_DECODE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::RequestFailed { status: 429 | 500..=599, .. })
    }
}

/// Result of every data-access call: the parsed payload or a typed failure.
pub type RequestOutcome<T = serde_json::Value> = Result<T, ApiError>;

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
