use super::*;
use crate::storage::MemoryStore;

fn vault_with(store: &MemoryStore) -> SessionVault {
    SessionVault::new(Arc::new(store.clone()))
}

// =============================================================================
// Session
// =============================================================================

#[test]
fn new_user_has_default_role_and_unique_id() {
    let a = Session::new_user("Ana", "ana@example.com");
    let b = Session::new_user("Ana", "ana@example.com");
    assert_eq!(a.role, "user");
    assert!(a.token.is_none());
    assert_ne!(a.id, b.id);
}

#[test]
fn session_serializes_without_absent_token() {
    let session = Session {
        id: "s1".into(),
        name: "Ana".into(),
        email: "ana@example.com".into(),
        role: "user".into(),
        token: None,
    };
    let json = serde_json::to_value(&session).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"id": "s1", "name": "Ana", "email": "ana@example.com", "role": "user"})
    );
}

#[test]
fn session_accepts_numeric_timestamp_id() {
    let raw = r#"{"id": 1718000000000, "name": "Administrador", "email": "admin@sistema.com", "role": "user"}"#;
    let session: Session = serde_json::from_str(raw).unwrap();
    assert_eq!(session.id, "1718000000000");
}

// =============================================================================
// SessionVault
// =============================================================================

#[test]
fn vault_starts_signed_out() {
    let vault = vault_with(&MemoryStore::new());
    assert_eq!(vault.status(), SessionStatus::SignedOut);
    assert!(vault.current().is_none());
    assert!(vault.token().is_none());
}

#[test]
fn establish_persists_and_publishes() {
    let store = MemoryStore::new();
    let vault = vault_with(&store);
    let session = Session::new_user("Ana", "ana@example.com").with_token("tok-1");

    vault.establish(session.clone()).unwrap();

    assert_eq!(vault.current(), Some(session.clone()));
    assert_eq!(vault.token().as_deref(), Some("tok-1"));
    let raw = store.get(SESSION_STORAGE_KEY).unwrap().unwrap();
    let stored: Session = serde_json::from_str(&raw).unwrap();
    assert_eq!(stored, session);
}

#[test]
fn restore_rehydrates_from_storage() {
    let store = MemoryStore::new();
    let session = Session::new_user("Ana", "ana@example.com");
    vault_with(&store).establish(session.clone()).unwrap();

    let fresh = vault_with(&store);
    assert!(fresh.current().is_none());
    assert_eq!(fresh.restore(), Some(session.clone()));
    assert_eq!(fresh.current(), Some(session));
}

#[test]
fn restore_discards_corrupt_entry() {
    let store = MemoryStore::new();
    store.set(SESSION_STORAGE_KEY, "{not json").unwrap();

    let vault = vault_with(&store);
    assert!(vault.restore().is_none());
    assert_eq!(vault.status(), SessionStatus::SignedOut);
    assert_eq!(store.get(SESSION_STORAGE_KEY).unwrap(), None);
}

#[test]
fn sign_out_removes_entry() {
    let store = MemoryStore::new();
    let vault = vault_with(&store);
    vault.establish(Session::new_user("Ana", "ana@example.com")).unwrap();

    vault.sign_out().unwrap();

    assert_eq!(vault.status(), SessionStatus::SignedOut);
    assert_eq!(store.get(SESSION_STORAGE_KEY).unwrap(), None);
}

#[test]
fn expire_removes_entry_and_marks_expired() {
    let store = MemoryStore::new();
    let vault = vault_with(&store);
    vault.establish(Session::new_user("Ana", "ana@example.com").with_token("t")).unwrap();

    vault.expire();

    assert_eq!(vault.status(), SessionStatus::Expired);
    assert!(vault.current().is_none());
    assert!(vault.persisted().is_none());
}

#[test]
fn clones_share_the_slot() {
    let vault = vault_with(&MemoryStore::new());
    let other = vault.clone();
    vault.establish(Session::new_user("Ana", "ana@example.com")).unwrap();
    assert!(other.current().is_some());
    other.expire();
    assert_eq!(vault.status(), SessionStatus::Expired);
}

#[tokio::test]
async fn subscribers_observe_changes() {
    let vault = vault_with(&MemoryStore::new());
    let mut rx = vault.subscribe();

    vault.establish(Session::new_user("Ana", "ana@example.com")).unwrap();
    rx.changed().await.unwrap();
    assert!(matches!(&*rx.borrow_and_update(), SessionStatus::Active(s) if s.name == "Ana"));

    vault.expire();
    rx.changed().await.unwrap();
    assert_eq!(*rx.borrow_and_update(), SessionStatus::Expired);
}
