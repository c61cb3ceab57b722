//! Route tree construction.

pub mod auth;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/register   register (public)
/// /auth/login      login (public)
/// /auth/refresh    refresh (public)
/// /auth/verify     verify (service-to-service)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/auth", auth::router())
}
