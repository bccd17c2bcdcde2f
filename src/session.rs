//! The active session record and its durable vault.
//!
//! ARCHITECTURE
//! ============
//! One `SessionVault` is built at process start and cloned into the HTTP
//! client, the session manager, and the auth gate. It owns the storage entry
//! under [`SESSION_STORAGE_KEY`] and broadcasts every change over a
//! `tokio::sync::watch` channel, so readers never poll storage to learn that
//! the session ended.
//!
//! The persisted entry is authoritative for the bearer credential: the HTTP
//! client reads it on every request. The broadcast status is authoritative for
//! "who is logged in" as seen by views.

use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};
use tokio::sync::watch;
use tracing::{info, warn};
use uuid::Uuid;

use crate::storage::{KeyValueStore, StorageError};

/// Storage key holding the serialized [`Session`].
pub const SESSION_STORAGE_KEY: &str = "user";

/// Role tag given to sessions created by login and registration.
pub const DEFAULT_ROLE: &str = "user";

/// The authenticated identity in the current process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Unique identifier. Older entries stored a numeric timestamp here.
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    /// Display name.
    pub name: String,
    pub email: String,
    /// Role tag (e.g. `"user"`).
    pub role: String,
    /// Opaque bearer credential, when the identity backend issued one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Session {
    /// Fresh session with a random id and the default role.
    #[must_use]
    pub fn new_user(name: &str, email: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_owned(),
            email: email.to_owned(),
            role: DEFAULT_ROLE.to_owned(),
            token: None,
        }
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as _;
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        _ => Err(D::Error::custom("expected string or number id")),
    }
}

/// Broadcast view of the session slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    /// A session is active.
    Active(Session),
    /// No session: never logged in, or logged out explicitly.
    SignedOut,
    /// The backend rejected the credential; the session was destroyed.
    Expired,
}

impl SessionStatus {
    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::Active(session) => Some(session),
            Self::SignedOut | Self::Expired => None,
        }
    }
}

// =============================================================================
// VAULT
// =============================================================================

/// Shared handle on the persisted session. Cloning shares the same slot.
#[derive(Clone)]
pub struct SessionVault {
    store: Arc<dyn KeyValueStore>,
    status: Arc<watch::Sender<SessionStatus>>,
}

impl SessionVault {
    /// Vault over `store`. Starts signed out; call [`Self::restore`] to
    /// rehydrate a previously persisted session.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let (status, _) = watch::channel(SessionStatus::SignedOut);
        Self { store, status: Arc::new(status) }
    }

    /// Load the persisted session, if any, and publish it.
    ///
    /// An unreadable or corrupt entry is discarded and treated as no session.
    pub fn restore(&self) -> Option<Session> {
        let session = self.persisted()?;
        info!(session_id = %session.id, email = %session.email, "session restored");
        self.status.send_replace(SessionStatus::Active(session.clone()));
        Some(session)
    }

    /// Read the session straight from storage.
    #[must_use]
    pub fn persisted(&self) -> Option<Session> {
        let raw = match self.store.get(SESSION_STORAGE_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(error = %e, "session storage unreadable");
                return None;
            }
        };
        match serde_json::from_str::<Session>(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!(error = %e, "discarding corrupt session entry");
                if let Err(e) = self.store.remove(SESSION_STORAGE_KEY) {
                    warn!(error = %e, "failed to remove corrupt session entry");
                }
                None
            }
        }
    }

    /// Bearer credential of the persisted session, if it carries one.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.persisted()?.token
    }

    /// The currently published session.
    #[must_use]
    pub fn current(&self) -> Option<Session> {
        self.status.borrow().session().cloned()
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status.borrow().clone()
    }

    /// Receiver notified on every session change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.status.subscribe()
    }

    /// Persist `session` and publish it, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the entry cannot be written; the
    /// published status is left unchanged in that case.
    pub fn establish(&self, session: Session) -> Result<(), StorageError> {
        let raw = serde_json::to_string(&session).map_err(std::io::Error::other)?;
        self.store.set(SESSION_STORAGE_KEY, &raw)?;
        self.status.send_replace(SessionStatus::Active(session));
        Ok(())
    }

    /// Remove the persisted session after an explicit logout.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the entry cannot be removed. The status
    /// is published as signed out regardless.
    pub fn sign_out(&self) -> Result<(), StorageError> {
        let removed = self.store.remove(SESSION_STORAGE_KEY);
        self.status.send_replace(SessionStatus::SignedOut);
        removed
    }

    /// Destroy the session because the backend rejected its credential.
    pub fn expire(&self) {
        if let Err(e) = self.store.remove(SESSION_STORAGE_KEY) {
            warn!(error = %e, "failed to remove expired session entry");
        }
        self.status.send_replace(SessionStatus::Expired);
    }
}

impl std::fmt::Debug for SessionVault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionVault")
            .field("status", &*self.status.borrow())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
