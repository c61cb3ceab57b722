//! Shared helpers for HTTP-level integration tests.
//!
//! Builds the real application router (same middleware stack as production)
//! on top of the in-memory credential store, and provides small
//! request/response helpers around `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::Request;
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use forum_auth_api::auth::jwt::JwtConfig;
use forum_auth_api::config::{RolePolicy, ServerConfig};
use forum_auth_api::engine::AuthEngine;
use forum_auth_api::router::build_app_router;
use forum_auth_api::state::AppState;
use forum_auth_db::store::{CredentialStore, MemoryStore};

/// Build a test `ServerConfig` with safe defaults and a fixed signing secret.
pub fn test_config(role_policy: RolePolicy) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 30,
        },
        role_policy,
    }
}

/// Build the full application router over a fresh in-memory store.
///
/// The returned router is cheaply cloneable and shares its state, so a test
/// can issue several requests against one logical server instance.
pub fn build_test_app_with_policy(role_policy: RolePolicy) -> Router {
    let config = test_config(role_policy);
    let store: Arc<dyn CredentialStore> = Arc::new(MemoryStore::new());
    let engine = Arc::new(AuthEngine::new(
        Arc::clone(&store),
        config.jwt.clone(),
        config.role_policy,
    ));
    let state = AppState {
        engine,
        store,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Build a test app with the default (force-default) role policy.
pub fn build_test_app() -> Router {
    build_test_app_with_policy(RolePolicy::ForceDefault)
}

/// Send a POST request with a JSON body.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request should build");
    app.oneshot(request).await.expect("request should succeed")
}

/// Send a POST request with a raw (possibly invalid) body.
pub async fn post_raw(app: Router, uri: &str, body: &str) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request should build");
    app.oneshot(request).await.expect("request should succeed")
}

/// Send a GET request.
pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("request should build");
    app.oneshot(request).await.expect("request should succeed")
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}
