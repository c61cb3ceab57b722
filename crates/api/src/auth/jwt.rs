//! The token codec: HS256-signed claims for access and refresh tokens.
//!
//! Both token kinds carry the same [`Claims`] shape and differ only in
//! lifetime. Refresh tokens are additionally persisted by their full string
//! so the store can enforce one-time-use rotation.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use forum_auth_core::error::AuthError;
use forum_auth_core::roles::Role;
use forum_auth_core::types::{DbId, Timestamp};

/// Signed claims embedded in every token.
///
/// Strongly typed: a token whose payload is missing a field or carries a
/// wrong-typed value fails at decode time with [`AuthError::InvalidTokenData`]
/// instead of surfacing as a runtime type assertion later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject -- the user's internal database id.
    pub sub: DbId,
    pub username: String,
    pub role: Role,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Unique token identifier. Keeps two tokens minted for the same user
    /// within the same second from colliding as strings.
    pub jti: String,
}

/// Configuration for token signing and verification.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Access token lifetime in minutes (default: 15).
    pub access_token_expiry_mins: i64,
    /// Refresh token lifetime in days (default: 30).
    pub refresh_token_expiry_days: i64,
}

/// Default access token expiry in minutes.
const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 15;
/// Default refresh token expiry in days.
const DEFAULT_REFRESH_EXPIRY_DAYS: i64 = 30;

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var                    | Required | Default |
    /// |----------------------------|----------|---------|
    /// | `JWT_SECRET`               | **yes**  | --      |
    /// | `JWT_ACCESS_EXPIRY_MINS`   | no       | `15`    |
    /// | `JWT_REFRESH_EXPIRY_DAYS`  | no       | `30`    |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty. There is deliberately
    /// no fallback secret.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let access_token_expiry_mins: i64 = std::env::var("JWT_ACCESS_EXPIRY_MINS")
            .unwrap_or_else(|_| DEFAULT_ACCESS_EXPIRY_MINS.to_string())
            .parse()
            .expect("JWT_ACCESS_EXPIRY_MINS must be a valid i64");

        let refresh_token_expiry_days: i64 = std::env::var("JWT_REFRESH_EXPIRY_DAYS")
            .unwrap_or_else(|_| DEFAULT_REFRESH_EXPIRY_DAYS.to_string())
            .parse()
            .expect("JWT_REFRESH_EXPIRY_DAYS must be a valid i64");

        Self {
            secret,
            access_token_expiry_mins,
            refresh_token_expiry_days,
        }
    }
}

/// Generate an HS256 access token for the given user.
pub fn generate_access_token(
    user_id: DbId,
    username: &str,
    role: Role,
    config: &JwtConfig,
) -> Result<String, AuthError> {
    let now = chrono::Utc::now().timestamp();
    let exp = now + config.access_token_expiry_mins * 60;
    sign(build_claims(user_id, username, role, now, exp), config)
}

/// Generate an HS256 refresh token for the given user.
///
/// Returns the token string together with its expiry so the persisted row
/// can mirror the claim.
pub fn generate_refresh_token(
    user_id: DbId,
    username: &str,
    role: Role,
    config: &JwtConfig,
) -> Result<(String, Timestamp), AuthError> {
    let now = chrono::Utc::now();
    let expires_at = now + chrono::Duration::days(config.refresh_token_expiry_days);
    let token = sign(
        build_claims(
            user_id,
            username,
            role,
            now.timestamp(),
            expires_at.timestamp(),
        ),
        config,
    )?;
    Ok((token, expires_at))
}

/// Verify a token's signature and expiry, returning the embedded [`Claims`].
///
/// Malformed, unsigned, and expired tokens all collapse to
/// [`AuthError::InvalidToken`]; a correctly signed token whose payload does
/// not deserialize into [`Claims`] maps to [`AuthError::InvalidTokenData`].
pub fn verify_token(token: &str, config: &JwtConfig) -> Result<Claims, AuthError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::Json(_) => AuthError::InvalidTokenData,
        _ => AuthError::InvalidToken,
    })?;
    Ok(token_data.claims)
}

fn build_claims(user_id: DbId, username: &str, role: Role, iat: i64, exp: i64) -> Claims {
    Claims {
        sub: user_id,
        username: username.to_string(),
        role,
        iat,
        exp,
        jti: Uuid::new_v4().to_string(),
    }
}

fn sign(claims: Claims, config: &JwtConfig) -> Result<String, AuthError> {
    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(|e| AuthError::Signing(e.to_string()))
}
