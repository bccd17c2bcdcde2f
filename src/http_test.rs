use axum::Json;
use axum::Router;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{delete, get, post};
use serde_json::json;

use super::*;
use crate::error::ErrorCode;
use crate::session::{SESSION_STORAGE_KEY, Session, SessionStatus};
use crate::storage::KeyValueStore;
use crate::test_helpers::{client_for, spawn_backend, unreachable_base_url};

// =============================================================================
// classify_response
// =============================================================================

#[test]
fn classify_json_success() {
    let out = classify_response(200, r#"[{"id_articulo": 1}]"#).unwrap();
    assert_eq!(out, json!([{"id_articulo": 1}]));
}

#[test]
fn classify_no_content_returns_sentinel() {
    assert_eq!(classify_response(204, "").unwrap(), success_sentinel());
    assert_eq!(classify_response(200, "  ").unwrap(), success_sentinel());
}

#[test]
fn classify_unauthorized_before_anything_else() {
    assert_eq!(classify_response(401, r#"{"detail": "bad token"}"#), Err(ApiError::SessionExpired));
}

#[test]
fn classify_success_with_text_body_is_decode_error() {
    assert!(matches!(classify_response(200, "<html>"), Err(ApiError::Decode(_))));
}

#[test]
fn error_message_prefers_detail_string() {
    assert_eq!(error_message(404, r#"{"detail": "Cliente no encontrado"}"#), "Cliente no encontrado");
}

#[test]
fn error_message_joins_validation_array() {
    let body = r#"{"detail": [
        {"loc": ["body", "precio"], "msg": "field required", "type": "missing"},
        {"loc": ["body", "nombre"], "msg": "string too short", "type": "too_short"}
    ]}"#;
    assert_eq!(error_message(422, body), "field required; string too short");
}

#[test]
fn error_message_json_without_detail_falls_back_to_status() {
    assert_eq!(error_message(500, r#"{"error": "boom"}"#), "error 500");
}

#[test]
fn error_message_uses_raw_text_then_status() {
    assert_eq!(error_message(502, "Bad Gateway\n"), "Bad Gateway");
    assert_eq!(error_message(503, ""), "error 503");
}

#[test]
fn method_names() {
    assert_eq!(Method::Get.to_string(), "GET");
    assert_eq!(Method::Delete.as_str(), "DELETE");
}

#[test]
fn decode_rejects_shape_mismatch() {
    let err = decode::<Vec<records::Article>>(json!([{"nombre": "Laptop"}])).unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

// =============================================================================
// Live requests
// =============================================================================

fn catalogue() -> Router {
    Router::new()
        .route(
            "/articulos/todos/",
            get(|| async { Json(json!([{"id_articulo": 1, "nombre": "Laptop", "precio": 1500}])) }),
        )
        .route("/articulos/{id}", delete(|| async { StatusCode::NO_CONTENT }))
        .route(
            "/articulos/",
            post(|| async {
                (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({"detail": "Stock must be non-negative"})))
            }),
        )
        .route("/clientes/", post(|Json(body): Json<Value>| async move { (StatusCode::CREATED, Json(body)) }))
        .route("/ventas/todos/", get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "database offline") }))
        .route(
            "/whoami/",
            get(|headers: HeaderMap| async move {
                let auth = headers.get("authorization").and_then(|v| v.to_str().ok()).map(str::to_owned);
                Json(json!({ "authorization": auth }))
            }),
        )
        .route("/ordenes/todos/", get(|| async { StatusCode::UNAUTHORIZED }))
}

#[tokio::test]
async fn get_article_list() {
    let base = spawn_backend(catalogue()).await;
    let (client, _) = client_for(&base);

    let data = client.get("/articulos/todos/").await.unwrap();
    assert_eq!(data, json!([{"id_articulo": 1, "nombre": "Laptop", "precio": 1500}]));

    let typed: Vec<records::Article> = client.get_json("/articulos/todos/").await.unwrap();
    assert_eq!(typed[0].nombre, "Laptop");
}

#[tokio::test]
async fn delete_no_content_returns_sentinel() {
    let base = spawn_backend(catalogue()).await;
    let (client, _) = client_for(&base);

    let out = client.delete("/articulos/9").await.unwrap();
    assert_eq!(out, json!({"success": true, "message": "operation succeeded"}));
}

#[tokio::test]
async fn post_rejection_carries_detail_text() {
    let base = spawn_backend(catalogue()).await;
    let (client, _) = client_for(&base);

    let err = client.post("/articulos/", &json!({"nombre": "X", "stock": -1})).await.unwrap_err();
    assert_eq!(err.to_string(), "Stock must be non-negative");
    assert_eq!(err.status(), Some(422));
}

#[tokio::test]
async fn post_sends_json_body() {
    let base = spawn_backend(catalogue()).await;
    let (client, _) = client_for(&base);

    let body = json!({"nombre": "Ana", "apellido": "Ruiz"});
    assert_eq!(client.post("/clientes/", &body).await.unwrap(), body);
}

#[tokio::test]
async fn text_error_body_becomes_message() {
    let base = spawn_backend(catalogue()).await;
    let (client, _) = client_for(&base);

    let err = client.get("/ventas/todos/").await.unwrap_err();
    assert_eq!(err, ApiError::RequestFailed { status: 500, message: "database offline".into() });
    assert!(err.retryable());
}

#[tokio::test]
async fn bearer_attached_on_get_when_token_present() {
    let base = spawn_backend(catalogue()).await;
    let (client, _) = client_for(&base);

    let anonymous = client.get("/whoami/").await.unwrap();
    assert_eq!(anonymous["authorization"], Value::Null);

    client
        .vault()
        .establish(Session::new_user("Ana", "ana@example.com").with_token("tok-123"))
        .unwrap();
    let authed = client.get("/whoami/").await.unwrap();
    assert_eq!(authed["authorization"], "Bearer tok-123");
}

#[tokio::test]
async fn unauthorized_destroys_session() {
    let base = spawn_backend(catalogue()).await;
    let (client, store) = client_for(&base);
    client
        .vault()
        .establish(Session::new_user("Ana", "ana@example.com").with_token("stale"))
        .unwrap();

    let err = client.get("/ordenes/todos/").await.unwrap_err();

    assert_eq!(err, ApiError::SessionExpired);
    assert_eq!(store.get(SESSION_STORAGE_KEY).unwrap(), None);
    assert_eq!(client.vault().status(), SessionStatus::Expired);
}

#[tokio::test]
async fn anonymous_get_sends_no_credential_and_keeps_session() {
    let base = spawn_backend(catalogue()).await;
    let (client, store) = client_for(&base);
    let session = Session::new_user("Ana", "ana@example.com").with_token("tok-123");
    client.vault().establish(session.clone()).unwrap();

    let seen = client.get_anonymous("/whoami/").await.unwrap();
    assert_eq!(seen["authorization"], Value::Null);

    let err = client.get_anonymous("/ordenes/todos/").await.unwrap_err();
    assert_eq!(err, ApiError::RequestFailed { status: 401, message: "error 401".into() });
    assert_eq!(client.vault().status(), SessionStatus::Active(session));
    assert!(store.get(SESSION_STORAGE_KEY).unwrap().is_some());
}

#[tokio::test]
async fn unreachable_backend_is_transport_error() {
    let base = unreachable_base_url().await;
    let (client, _) = client_for(&base);

    let err = client.get("/articulos/todos/").await.unwrap_err();
    assert!(err.is_transport(), "got {err:?}");
    assert!(err.retryable());
}
