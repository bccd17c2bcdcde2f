//! Session manager: login, registration, and logout against the account
//! directory.
//!
//! DESIGN
//! ======
//! The account directory is the only identity backend. It is seeded with the
//! two demo accounts, grows on registration, and lives in process memory
//! only. Outcomes are returned as values: a rejected login is an `AuthError`
//! for the form to render, never a panic or a logged failure.
//!
//! The manager holds no session of its own. It writes through the shared
//! [`SessionVault`], so a 401 seen by the HTTP client ends the session here
//! as well.

use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::RwLock;
use tracing::info;

use crate::error::ErrorCode;
use crate::session::{Session, SessionVault};
use crate::storage::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("email already registered")]
    AccountConflict,

    #[error("incorrect password")]
    CredentialMismatch,

    #[error("email not registered")]
    UnknownEmail,

    #[error("incomplete data")]
    IncompleteData,

    #[error("session storage failed: {0}")]
    Storage(#[from] StorageError),
}

impl ErrorCode for AuthError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::AccountConflict => "E_ACCOUNT_CONFLICT",
            Self::CredentialMismatch => "E_CREDENTIAL_MISMATCH",
            Self::UnknownEmail => "E_UNKNOWN_EMAIL",
            Self::IncompleteData => "E_INCOMPLETE_DATA",
            Self::Storage(_) => "E_STORAGE",
        }
    }
}

/// A known login credential.
#[derive(Clone, PartialEq, Eq)]
pub struct RegisteredAccount {
    pub email: String,
    pub password: String,
    pub name: String,
}

impl RegisteredAccount {
    #[must_use]
    pub fn new(email: &str, password: &str, name: &str) -> Self {
        Self { email: email.to_owned(), password: password.to_owned(), name: name.to_owned() }
    }
}

impl std::fmt::Debug for RegisteredAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredAccount")
            .field("email", &self.email)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Accounts present at startup.
#[must_use]
pub fn demo_accounts() -> Vec<RegisteredAccount> {
    vec![
        RegisteredAccount::new("admin@sistema.com", "admin123", "Administrador"),
        RegisteredAccount::new("usuario@ejemplo.com", "usuario123", "Usuario Demo"),
    ]
}

/// Where the manager is in the login flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPhase {
    Unauthenticated,
    /// A login or registration call is in progress.
    Authenticating,
    Authenticated,
}

struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

// =============================================================================
// SESSION MANAGER
// =============================================================================

pub struct SessionManager {
    vault: SessionVault,
    accounts: RwLock<Vec<RegisteredAccount>>,
    in_flight: AtomicUsize,
}

impl SessionManager {
    /// Manager over `vault` with the demo accounts registered.
    #[must_use]
    pub fn new(vault: SessionVault) -> Self {
        Self::with_accounts(vault, demo_accounts())
    }

    #[must_use]
    pub fn with_accounts(vault: SessionVault, accounts: Vec<RegisteredAccount>) -> Self {
        Self { vault, accounts: RwLock::new(accounts), in_flight: AtomicUsize::new(0) }
    }

    #[must_use]
    pub fn vault(&self) -> &SessionVault {
        &self.vault
    }

    /// Rehydrate the persisted session at startup.
    pub fn restore(&self) -> Option<Session> {
        self.vault.restore()
    }

    #[must_use]
    pub fn current_session(&self) -> Option<Session> {
        self.vault.current()
    }

    #[must_use]
    pub fn phase(&self) -> AuthPhase {
        if self.in_flight.load(Ordering::SeqCst) > 0 {
            AuthPhase::Authenticating
        } else if self.vault.current().is_some() {
            AuthPhase::Authenticated
        } else {
            AuthPhase::Unauthenticated
        }
    }

    /// Check `email`/`password` and start a session on an exact match.
    ///
    /// # Errors
    ///
    /// - [`AuthError::CredentialMismatch`] when the email is known but the
    ///   password differs
    /// - [`AuthError::UnknownEmail`] when no account has that email
    /// - [`AuthError::Storage`] when the session cannot be persisted
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let _in_flight = InFlight::enter(&self.in_flight);
        let name = {
            let accounts = self.accounts.read().await;
            match accounts.iter().find(|a| a.email == email) {
                Some(account) if account.password == password => account.name.clone(),
                Some(_) => return Err(AuthError::CredentialMismatch),
                None => return Err(AuthError::UnknownEmail),
            }
        };

        let session = Session::new_user(&name, email);
        self.vault.establish(session.clone())?;
        info!(session_id = %session.id, %email, "logged in");
        Ok(session)
    }

    /// Create an account and start a session for it.
    ///
    /// # Errors
    ///
    /// - [`AuthError::AccountConflict`] when the email is already registered
    /// - [`AuthError::IncompleteData`] when any field is empty
    /// - [`AuthError::Storage`] when the session cannot be persisted; the
    ///   account stays registered
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<Session, AuthError> {
        let _in_flight = InFlight::enter(&self.in_flight);
        {
            let mut accounts = self.accounts.write().await;
            if accounts.iter().any(|a| a.email == email) {
                return Err(AuthError::AccountConflict);
            }
            if name.is_empty() || email.is_empty() || password.is_empty() {
                return Err(AuthError::IncompleteData);
            }
            accounts.push(RegisteredAccount::new(email, password, name));
        }

        let session = Session::new_user(name, email);
        self.vault.establish(session.clone())?;
        info!(session_id = %session.id, %email, "registered");
        Ok(session)
    }

    /// End the current session and remove it from storage.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Storage`] if the entry cannot be removed; the
    /// session is signed out in memory regardless.
    pub fn logout(&self) -> Result<(), AuthError> {
        let email = self.vault.current().map(|s| s.email);
        self.vault.sign_out()?;
        info!(email = email.as_deref().unwrap_or("-"), "logged out");
        Ok(())
    }

    /// Whether an account with `email` exists.
    pub async fn is_registered(&self, email: &str) -> bool {
        self.accounts.read().await.iter().any(|a| a.email == email)
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("vault", &self.vault)
            .field("phase", &self.phase())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
