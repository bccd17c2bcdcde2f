//! Client configuration parsed from environment variables.

use std::path::PathBuf;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";

/// Directory name under the platform data dir.
const APP_DIR_NAME: &str = "gestion";

/// Errors raised while building a [`ClientConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The base URL is empty or does not use an HTTP scheme.
    #[error("invalid API base URL '{0}' (expected http:// or https://)")]
    InvalidBaseUrl(String),
}

/// Optional network timeouts. `None` means the call may wait indefinitely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Timeouts {
    pub request_secs: Option<u64>,
    pub connect_secs: Option<u64>,
}

/// Where the session entry is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStorage {
    /// One file per key under this directory; survives restarts.
    File(PathBuf),
    /// Process memory only; the session ends with the process.
    Memory,
}

impl Default for SessionStorage {
    fn default() -> Self {
        Self::File(default_session_dir())
    }
}

/// Per-user session directory.
///
/// - Linux: `~/.local/share/gestion/`
/// - macOS: `~/Library/Application Support/gestion/`
/// - Windows: `{FOLDERID_RoamingAppData}\gestion\`
#[must_use]
pub fn default_session_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL every endpoint path is appended to, without trailing slash.
    pub base_url: String,
    pub timeouts: Timeouts,
    pub session: SessionStorage,
}

impl ClientConfig {
    /// Config for `base_url` with no timeouts and the session persisted
    /// under [`default_session_dir`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the URL is not http(s).
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            timeouts: Timeouts::default(),
            session: SessionStorage::default(),
        })
    }

    /// Keep the session in process memory instead of on disk.
    #[must_use]
    pub fn with_memory_session(mut self) -> Self {
        self.session = SessionStorage::Memory;
        self
    }

    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `GESTION_API_BASE_URL`: default `http://localhost:8000/api`
    /// - `GESTION_REQUEST_TIMEOUT_SECS`: unset means no request timeout
    /// - `GESTION_CONNECT_TIMEOUT_SECS`: unset means no connect timeout
    /// - `GESTION_SESSION_DIR`: directory for the persisted session, default
    ///   [`default_session_dir`]
    /// - `GESTION_SESSION_STORAGE`: `memory` keeps the session in process
    ///   memory only; anything else persists it
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the base URL is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw_url = std::env::var("GESTION_API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
        let base_url = parse_base_url(&raw_url)?;
        let timeouts = Timeouts {
            request_secs: env_parse_opt_u64("GESTION_REQUEST_TIMEOUT_SECS"),
            connect_secs: env_parse_opt_u64("GESTION_CONNECT_TIMEOUT_SECS"),
        };
        let in_memory = std::env::var("GESTION_SESSION_STORAGE")
            .is_ok_and(|kind| kind.trim().eq_ignore_ascii_case("memory"));
        let session = if in_memory {
            SessionStorage::Memory
        } else {
            std::env::var("GESTION_SESSION_DIR")
                .ok()
                .filter(|dir| !dir.trim().is_empty())
                .map_or_else(SessionStorage::default, |dir| SessionStorage::File(PathBuf::from(dir)))
        };

        Ok(Self { base_url, timeouts, session })
    }

    /// Absolute URL for an endpoint path relative to the base.
    #[must_use]
    pub fn url(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{endpoint}", self.base_url)
        } else {
            format!("{}/{endpoint}", self.base_url)
        }
    }
}

fn parse_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let has_host = trimmed
        .strip_prefix("http://")
        .or_else(|| trimmed.strip_prefix("https://"))
        .is_some_and(|rest| !rest.is_empty());
    if !has_host {
        return Err(ConfigError::InvalidBaseUrl(raw.to_string()));
    }
    Ok(trimmed.to_string())
}

fn env_parse_opt_u64(key: &str) -> Option<u64> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse::<u64>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring non-numeric timeout");
            None
        }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
