use std::sync::Arc;

use super::*;
use crate::session::SessionVault;
use crate::storage::MemoryStore;

fn registration(name: &str, email: &str, password: &str, confirm: &str) -> RegistrationForm {
    RegistrationForm {
        name: name.into(),
        email: email.into(),
        password: password.into(),
        confirm_password: confirm.into(),
    }
}

fn manager() -> SessionManager {
    SessionManager::new(SessionVault::new(Arc::new(MemoryStore::new())))
}

#[test]
fn login_form_requires_at_sign() {
    let form = LoginForm { email: "admin.sistema.com".into(), password: "admin123".into() };
    assert_eq!(form.validate(), Err(ValidationError::MalformedEmail));

    let form = LoginForm { email: "admin@sistema.com".into(), password: String::new() };
    assert_eq!(form.validate(), Ok(()));
}

#[test]
fn registration_checks_run_in_order() {
    assert_eq!(registration("  ", "bad", "1", "2").validate(), Err(ValidationError::EmptyName));
    assert_eq!(registration("Ana", "bad", "1", "2").validate(), Err(ValidationError::MalformedEmail));
    assert_eq!(registration("Ana", "a@b.c", "1", "2").validate(), Err(ValidationError::PasswordMismatch));
    assert_eq!(
        registration("Ana", "a@b.c", "12345", "12345").validate(),
        Err(ValidationError::PasswordTooShort { min: 6 })
    );
    assert_eq!(registration("Ana", "a@b.c", "123456", "123456").validate(), Ok(()));
}

#[test]
fn short_password_message_names_minimum() {
    let err = ValidationError::PasswordTooShort { min: MIN_PASSWORD_LEN };
    assert_eq!(err.to_string(), "password must be at least 6 characters");
}

#[tokio::test]
async fn invalid_form_never_reaches_manager() {
    let auth = manager();

    let err = submit_registration(&auth, &registration("Ana", "ana@b.c", "123", "123")).await.unwrap_err();

    assert!(matches!(err, FormError::Invalid(ValidationError::PasswordTooShort { .. })));
    assert!(!auth.is_registered("ana@b.c").await);
}

#[tokio::test]
async fn valid_forms_reach_manager() {
    let auth = manager();

    let session = submit_registration(&auth, &registration("Ana", "ana@b.c", "secreto", "secreto")).await.unwrap();
    assert_eq!(session.name, "Ana");

    let login = LoginForm { email: "ana@b.c".into(), password: "secreto".into() };
    assert_eq!(submit_login(&auth, &login).await.unwrap().name, "Ana");
}

#[tokio::test]
async fn rejections_suggest_the_other_view() {
    let auth = manager();

    let unknown = LoginForm { email: "ghost@b.c".into(), password: "x".into() };
    let err = submit_login(&auth, &unknown).await.unwrap_err();
    assert_eq!(err.to_string(), "email not registered");
    assert_eq!(err.alternate_route(), Some(Route::Register));

    let taken = registration("Admin", "admin@sistema.com", "admin123", "admin123");
    let err = submit_registration(&auth, &taken).await.unwrap_err();
    assert_eq!(err.alternate_route(), Some(Route::Login));
    assert_eq!(err.error_code(), "E_ACCOUNT_CONFLICT");

    let wrong = LoginForm { email: "admin@sistema.com".into(), password: "x".into() };
    assert_eq!(submit_login(&auth, &wrong).await.unwrap_err().alternate_route(), None);
}
