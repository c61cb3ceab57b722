//! The auth engine: registration, login, and refresh-token rotation.
//!
//! Stateless between calls; all durable state lives behind the injected
//! [`CredentialStore`]. Token lifetimes and signing are delegated to the
//! codec in [`crate::auth::jwt`].

use std::sync::Arc;

use forum_auth_core::error::AuthError;
use forum_auth_core::roles::Role;
use forum_auth_core::types::DbId;
use forum_auth_core::validation::{validate_password, validate_username};
use forum_auth_db::models::refresh_token::NewRefreshToken;
use forum_auth_db::models::user::{NewUser, User};
use forum_auth_db::store::CredentialStore;

use crate::auth::jwt::{
    generate_access_token, generate_refresh_token, verify_token, Claims, JwtConfig,
};
use crate::auth::password::{hash_password, verify_password};
use crate::config::RolePolicy;

/// Registration input. `role` is only honored under
/// [`RolePolicy::CallerChoice`].
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub username: String,
    pub password: String,
    pub role: Option<Role>,
}

/// An access/refresh token pair returned by login and refresh.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Orchestrates credential verification and the token lifecycle.
pub struct AuthEngine {
    store: Arc<dyn CredentialStore>,
    jwt: JwtConfig,
    role_policy: RolePolicy,
}

impl AuthEngine {
    pub fn new(store: Arc<dyn CredentialStore>, jwt: JwtConfig, role_policy: RolePolicy) -> Self {
        Self {
            store,
            jwt,
            role_policy,
        }
    }

    /// Register a new user, returning the created row with its assigned id.
    pub async fn register(&self, input: RegisterInput) -> Result<User, AuthError> {
        tracing::debug!(username = %input.username, "registering user");

        let username = validate_username(&input.username)?.to_string();
        validate_password(&input.password)?;
        let role = self.resolve_role(input.role)?;

        if self
            .store
            .get_user_by_username(&username)
            .await?
            .is_some()
        {
            tracing::warn!(username = %username, "user already exists");
            return Err(AuthError::UserAlreadyExists);
        }

        let password_hash = hash_password(&input.password)
            .map_err(|e| AuthError::Internal(format!("password hashing failed: {e}")))?;

        // The unique constraint still backs this up if a concurrent register
        // slipped past the existence check; the store maps that violation
        // back to UserAlreadyExists.
        let user = self
            .store
            .create_user(&NewUser {
                username,
                password_hash,
                role,
            })
            .await?;

        tracing::info!(user_id = user.id, username = %user.username, "user registered");
        Ok(user)
    }

    /// Verify credentials and issue a fresh token pair.
    ///
    /// Replaces any previously stored refresh token for the user in a single
    /// store transaction: one live session per user.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair, AuthError> {
        tracing::debug!(username = %username, "login attempt");

        // Unknown username and wrong password take the same exit so the
        // response does not reveal which usernames exist.
        let user = self
            .store
            .get_user_by_username(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let password_valid = verify_password(password, &user.password_hash)
            .map_err(|e| AuthError::Internal(format!("password verification failed: {e}")))?;
        if !password_valid {
            tracing::warn!(username = %username, "invalid credentials");
            return Err(AuthError::InvalidCredentials);
        }

        let (pair, expires_at) = self.issue_pair(user.id, &user.username, user.role)?;
        self.store
            .replace_refresh_token(
                user.id,
                &NewRefreshToken {
                    user_id: user.id,
                    token: pair.refresh_token.clone(),
                    expires_at,
                },
            )
            .await?;

        tracing::info!(user_id = user.id, username = %user.username, "user logged in");
        Ok(pair)
    }

    /// Exchange a refresh token for a new pair, consuming the old one.
    ///
    /// Strict one-time use: the old token's row is deleted in the same store
    /// transaction that persists the new one, so a replay -- or the loser of
    /// a concurrent refresh race -- always fails with `InvalidRefreshToken`.
    pub async fn refresh_token(&self, old_token: &str) -> Result<TokenPair, AuthError> {
        tracing::debug!("token refresh attempt");

        let claims = verify_token(old_token, &self.jwt)?;

        let row = self
            .store
            .get_refresh_token(old_token)
            .await?
            .ok_or(AuthError::InvalidRefreshToken)?;

        // The stored row must agree with the token's own claims, and the
        // store-side expiry is checked again even though the codec already
        // rejected expired signatures: a guard against clock or state skew.
        if row.user_id != claims.sub {
            tracing::warn!(user_id = claims.sub, "refresh token user mismatch");
            return Err(AuthError::InvalidRefreshToken);
        }
        if chrono::Utc::now() > row.expires_at {
            tracing::warn!(user_id = claims.sub, "stored refresh token expired");
            return Err(AuthError::InvalidRefreshToken);
        }

        let (pair, expires_at) = self.issue_pair(claims.sub, &claims.username, claims.role)?;
        self.store
            .rotate_refresh_token(
                old_token,
                &NewRefreshToken {
                    user_id: claims.sub,
                    token: pair.refresh_token.clone(),
                    expires_at,
                },
            )
            .await?;

        tracing::info!(user_id = claims.sub, "refresh token rotated");
        Ok(pair)
    }

    /// Verify any token and return its claims. Used by the
    /// service-to-service verify surface; no store access.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        verify_token(token, &self.jwt)
    }

    fn resolve_role(&self, requested: Option<Role>) -> Result<Role, AuthError> {
        match self.role_policy {
            RolePolicy::ForceDefault => Ok(Role::User),
            RolePolicy::CallerChoice => {
                requested.ok_or_else(|| AuthError::Validation("role is required".to_string()))
            }
        }
    }

    fn issue_pair(
        &self,
        user_id: DbId,
        username: &str,
        role: Role,
    ) -> Result<(TokenPair, forum_auth_core::types::Timestamp), AuthError> {
        let access_token = generate_access_token(user_id, username, role, &self.jwt)?;
        let (refresh_token, expires_at) =
            generate_refresh_token(user_id, username, role, &self.jwt)?;
        Ok((
            TokenPair {
                access_token,
                refresh_token,
            },
            expires_at,
        ))
    }
}
