use axum::Json;
use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use records::Technician;
use serde_json::json;

use super::*;
use crate::gate::{Route, ViewTree};
use crate::config::SessionStorage;
use crate::resource::SourceMode;
use crate::session::SessionStatus;
use crate::test_helpers::spawn_backend;

fn scratch_dir() -> std::path::PathBuf {
    std::env::temp_dir().join(format!("gestion-app-{}", uuid::Uuid::new_v4()))
}

#[tokio::test]
async fn login_survives_restart_with_file_session() {
    let dir = scratch_dir();
    let mut config = ClientConfig::new("http://127.0.0.1:9/api").unwrap();
    config.session = SessionStorage::File(dir.clone());

    let first = AppContext::new(config.clone()).unwrap();
    assert_eq!(first.gate().view(), ViewTree::Public);
    first.auth().login("admin@sistema.com", "admin123").await.unwrap();

    let second = AppContext::new(config).unwrap();
    assert_eq!(second.gate().view(), ViewTree::Protected);
    assert_eq!(second.auth().current_session().unwrap().name, "Administrador");

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn memory_session_ends_with_the_context() {
    let config = ClientConfig::new("http://127.0.0.1:9/api").unwrap().with_memory_session();

    let first = AppContext::new(config.clone()).unwrap();
    first.auth().login("admin@sistema.com", "admin123").await.unwrap();
    assert_eq!(first.gate().view(), ViewTree::Protected);

    let second = AppContext::new(config).unwrap();
    assert_eq!(second.gate().view(), ViewTree::Public);
}

#[tokio::test]
async fn unauthorized_response_signs_everyone_out() {
    let app = Router::new().route("/tecnicos/todos/", get(|| async { StatusCode::UNAUTHORIZED }));
    let base = spawn_backend(app).await;
    let ctx = AppContext::new(ClientConfig::new(&base).unwrap().with_memory_session()).unwrap();
    ctx.auth().login("admin@sistema.com", "admin123").await.unwrap();
    let gate = ctx.gate();

    let (binding, initial) = ctx.bind::<Technician>(true).await;

    assert_eq!(initial, Some(Err(ApiError::SessionExpired)));
    assert_eq!(binding.state().error.as_deref(), Some("session expired; please log in again"));
    assert_eq!(binding.mode(), SourceMode::Live);
    assert!(ctx.auth().current_session().is_none());
    assert_eq!(ctx.client().vault().status(), SessionStatus::Expired);
    assert!(gate.session_expired());
    assert_eq!(gate.resolve(Route::Technicians), Route::Login);
}

#[tokio::test]
async fn bind_reads_typed_records() {
    let app = Router::new().route(
        "/tecnicos/todos/",
        get(|| async {
            Json(json!([{"id_tecnico": 3, "nombre": "Luis", "apellido": "Mora", "especialidad": "Frenos"}]))
        }),
    );
    let base = spawn_backend(app).await;
    let ctx = AppContext::new(ClientConfig::new(&base).unwrap().with_memory_session()).unwrap();

    let (binding, _) = ctx.bind::<Technician>(true).await;

    let technicians: Vec<Technician> = binding.typed_data().unwrap().unwrap();
    assert_eq!(technicians[0].especialidad, "Frenos");
}

#[test]
fn bootstrap_error_codes() {
    let err = BootstrapError::from(ConfigError::InvalidBaseUrl("ftp://x".into()));
    assert_eq!(err.error_code(), "E_INVALID_CONFIG");
}
