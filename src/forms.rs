//! Login and registration form guards.
//!
//! Checks run in the order the forms show them, and a form that fails a
//! check never reaches the [`SessionManager`].

use crate::auth::{AuthError, SessionManager};
use crate::error::ErrorCode;
use crate::gate::Route;
use crate::session::Session;

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("name is required")]
    EmptyName,

    #[error("please enter a valid email address")]
    MalformedEmail,

    #[error("passwords do not match")]
    PasswordMismatch,

    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },
}

impl ErrorCode for ValidationError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyName => "E_EMPTY_NAME",
            Self::MalformedEmail => "E_MALFORMED_EMAIL",
            Self::PasswordMismatch => "E_PASSWORD_MISMATCH",
            Self::PasswordTooShort { .. } => "E_PASSWORD_TOO_SHORT",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    /// # Errors
    ///
    /// Returns [`ValidationError::MalformedEmail`] if the email has no `@`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_email(&self.email)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegistrationForm {
    /// # Errors
    ///
    /// Returns the first failing check: blank name, malformed email,
    /// mismatched confirmation, then short password.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        check_email(&self.email)?;
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort { min: MIN_PASSWORD_LEN });
        }
        Ok(())
    }
}

fn check_email(email: &str) -> Result<(), ValidationError> {
    if email.contains('@') { Ok(()) } else { Err(ValidationError::MalformedEmail) }
}

// =============================================================================
// SUBMISSION
// =============================================================================

/// Why a form submission did not produce a session.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Rejected(#[from] AuthError),
}

impl FormError {
    /// The other auth view to offer: registration for an unknown email,
    /// login for an email that already has an account.
    #[must_use]
    pub fn alternate_route(&self) -> Option<Route> {
        match self {
            Self::Rejected(AuthError::UnknownEmail) => Some(Route::Register),
            Self::Rejected(AuthError::AccountConflict) => Some(Route::Login),
            _ => None,
        }
    }
}

impl ErrorCode for FormError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Invalid(e) => e.error_code(),
            Self::Rejected(e) => e.error_code(),
        }
    }
}

/// Validate `form` and, if it passes, log in.
///
/// # Errors
///
/// Returns [`FormError::Invalid`] without contacting the manager, or
/// [`FormError::Rejected`] with the manager's verdict.
pub async fn submit_login(auth: &SessionManager, form: &LoginForm) -> Result<Session, FormError> {
    form.validate()?;
    Ok(auth.login(&form.email, &form.password).await?)
}

/// Validate `form` and, if it passes, register.
///
/// # Errors
///
/// As [`submit_login`].
pub async fn submit_registration(auth: &SessionManager, form: &RegistrationForm) -> Result<Session, FormError> {
    form.validate()?;
    Ok(auth.register(&form.name, &form.email, &form.password).await?)
}

#[cfg(test)]
#[path = "forms_test.rs"]
mod tests;
