//! Process-wide wiring of the data-access layer.
//!
//! DESIGN
//! ======
//! `AppContext` is built once at startup and handed to the view layer by
//! handle. It holds one session vault; the HTTP client, the session manager,
//! and every auth gate read the same vault, so there is exactly one session
//! per process.

use std::sync::Arc;

use records::Resource;

use crate::auth::SessionManager;
use crate::config::{ClientConfig, ConfigError, SessionStorage};
use crate::error::{ApiError, ErrorCode, RequestOutcome};
use crate::gate::AuthGate;
use crate::http::HttpClient;
use crate::resource::ResourceBinding;
use crate::session::SessionVault;
use crate::storage::{FileStore, KeyValueStore, MemoryStore};

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl ErrorCode for BootstrapError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(_) => "E_INVALID_CONFIG",
            Self::Api(e) => e.error_code(),
        }
    }
}

/// Shared handles for the view layer. Clones share everything.
#[derive(Clone, Debug)]
pub struct AppContext {
    client: HttpClient,
    auth: Arc<SessionManager>,
}

impl AppContext {
    /// Build from `GESTION_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError`] if the config is invalid or the HTTP
    /// client cannot be built.
    pub fn from_env() -> Result<Self, BootstrapError> {
        Ok(Self::new(ClientConfig::from_env()?)?)
    }

    /// Build from `config`, restoring any persisted session.
    ///
    /// The session is kept where `config.session` says: on disk unless
    /// memory storage was requested.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::HttpClientBuild`] if the HTTP client cannot be
    /// built.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let store: Arc<dyn KeyValueStore> = match &config.session {
            SessionStorage::File(dir) => Arc::new(FileStore::new(dir.clone())),
            SessionStorage::Memory => Arc::new(MemoryStore::new()),
        };
        let vault = SessionVault::new(store);
        vault.restore();

        let client = HttpClient::new(config, vault.clone())?;
        let auth = Arc::new(SessionManager::new(vault));
        tracing::info!(base_url = %client.config().base_url, session = ?client.config().session, "data-access layer ready");
        Ok(Self { client, auth })
    }

    #[must_use]
    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    #[must_use]
    pub fn auth(&self) -> &SessionManager {
        &self.auth
    }

    #[must_use]
    pub fn gate(&self) -> AuthGate {
        AuthGate::new(self.client.vault())
    }

    /// Binding on `R`'s list endpoint with its demo fallback, plus the
    /// initial outcome when `auto_fetch` is set.
    pub async fn bind<R: Resource>(&self, auto_fetch: bool) -> (ResourceBinding, Option<RequestOutcome>) {
        ResourceBinding::for_resource::<R>(self.client.clone(), auto_fetch).await
    }
}

#[cfg(test)]
#[path = "app_test.rs"]
mod tests;
