//! Shared fixtures for unit tests: a throwaway local backend and clients
//! wired to it.

use std::sync::Arc;

use axum::Router;

use crate::config::ClientConfig;
use crate::http::HttpClient;
use crate::session::SessionVault;
use crate::storage::MemoryStore;

/// Serve `app` under `/api` on an ephemeral local port and return the base
/// URL to configure clients with.
pub async fn spawn_backend(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    serve_on(listener, app)
}

/// Serve `app` under `/api` on an already bound listener.
pub fn serve_on(listener: tokio::net::TcpListener, app: Router) -> String {
    let app = Router::new().nest("/api", app);
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/api")
}

/// Base URL of a port nothing listens on.
pub async fn unreachable_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/api")
}

/// Client against `base_url` with an empty in-memory session store.
pub fn client_for(base_url: &str) -> (HttpClient, MemoryStore) {
    let store = MemoryStore::new();
    let vault = SessionVault::new(Arc::new(store.clone()));
    let config = ClientConfig::new(base_url).unwrap();
    (HttpClient::new(config, vault).unwrap(), store)
}
