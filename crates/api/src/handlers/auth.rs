//! Handlers for the `/auth` resource (register, login, refresh, verify).

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use forum_auth_core::roles::Role;
use forum_auth_core::types::DbId;

use crate::auth::jwt::Claims;
use crate::engine::RegisterInput;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    /// Honored only when the server runs with the caller-choice role policy.
    #[serde(default)]
    pub role: Option<Role>,
}

/// Response body for a successful registration.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: &'static str,
    pub user_id: DbId,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Successful authentication response returned by login and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
}

/// Request body for `POST /auth/verify`.
#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub token: String,
}

/// Decoded claims returned by the verify surface.
#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub claims: Claims,
}

/// Unwrap a JSON body, turning every extraction failure into a 400.
fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => Err(AppError::BadRequest(rejection.body_text())),
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Create a new user account. Returns the assigned user id.
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AppResult<Json<RegisterResponse>> {
    let input = body(payload)?;

    let user = state
        .engine
        .register(RegisterInput {
            username: input.username,
            password: input.password,
            role: input.role,
        })
        .await?;

    Ok(Json(RegisterResponse {
        message: "user registered",
        user_id: user.id,
    }))
}

/// POST /api/v1/auth/login
///
/// Authenticate with username + password. Returns access and refresh tokens.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<AuthResponse>> {
    let input = body(payload)?;

    let pair = state.engine.login(&input.username, &input.password).await?;

    Ok(Json(AuthResponse {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
    }))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a valid refresh token for a new access + refresh pair. The old
/// refresh token is consumed and cannot be used again.
pub async fn refresh(
    State(state): State<AppState>,
    payload: Result<Json<RefreshRequest>, JsonRejection>,
) -> AppResult<Json<AuthResponse>> {
    let input = body(payload)?;

    let pair = state.engine.refresh_token(&input.refresh_token).await?;

    Ok(Json(AuthResponse {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
    }))
}

/// POST /api/v1/auth/verify
///
/// Validate a token and return its claims. Intended for sibling services
/// that share the signing secret but have no access to the credential store.
pub async fn verify(
    State(state): State<AppState>,
    payload: Result<Json<VerifyRequest>, JsonRejection>,
) -> AppResult<Json<VerifyResponse>> {
    let input = body(payload)?;

    let claims = state.engine.verify(&input.token)?;

    Ok(Json(VerifyResponse { claims }))
}
