//! The credential store capability trait and its implementations.
//!
//! The auth engine depends only on [`CredentialStore`]; [`pg::PgStore`] is
//! the production adapter and [`memory::MemoryStore`] backs tests and local
//! development without a database.

use async_trait::async_trait;

use forum_auth_core::error::AuthError;
use forum_auth_core::types::DbId;

use crate::models::refresh_token::{NewRefreshToken, RefreshToken};
use crate::models::user::{NewUser, User};

pub mod memory;
pub mod pg;

pub use memory::MemoryStore;
pub use pg::PgStore;

/// Errors surfaced by credential store implementations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint was violated (duplicate username or token).
    #[error("duplicate row violates a unique constraint")]
    Duplicate,

    /// A row this operation requires no longer exists.
    #[error("row not found")]
    NotFound,

    /// Any other backend failure.
    #[error("backend error: {0}")]
    Backend(#[from] sqlx::Error),
}

/// Translate store failures into the domain taxonomy at the engine boundary.
///
/// `NotFound` only escapes a store on rotation, where a missing row means the
/// refresh token was already consumed.
impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate => AuthError::UserAlreadyExists,
            StoreError::NotFound => AuthError::InvalidRefreshToken,
            StoreError::Backend(e) => AuthError::Store(e.to_string()),
        }
    }
}

/// Persistence operations the auth engine requires.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Insert a new user, returning the created row with its assigned id.
    ///
    /// Fails with [`StoreError::Duplicate`] if the username is taken.
    async fn create_user(&self, input: &NewUser) -> Result<User, StoreError>;

    /// Find a user by username (case-sensitive).
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Delete every refresh token belonging to a user. Returns the count.
    async fn delete_refresh_tokens_by_user_id(&self, user_id: DbId) -> Result<u64, StoreError>;

    /// Insert a refresh token row.
    async fn save_refresh_token(
        &self,
        input: &NewRefreshToken,
    ) -> Result<RefreshToken, StoreError>;

    /// Find a refresh token row by its token string.
    async fn get_refresh_token(&self, token: &str) -> Result<Option<RefreshToken>, StoreError>;

    /// Delete a refresh token row by its token string. Returns `true` if a
    /// row was deleted.
    async fn delete_refresh_token(&self, token: &str) -> Result<bool, StoreError>;

    /// Atomically delete every refresh token for `user_id` and insert `new`.
    ///
    /// Backs the login path: a successful login leaves exactly one live
    /// refresh token for the user, with no window where the delete committed
    /// but the insert did not.
    async fn replace_refresh_token(
        &self,
        user_id: DbId,
        new: &NewRefreshToken,
    ) -> Result<RefreshToken, StoreError>;

    /// Atomically delete the row for `old_token` and insert `new`.
    ///
    /// Fails with [`StoreError::NotFound`] when `old_token` has no row, which
    /// is how a replayed (or concurrently consumed) refresh token is rejected.
    async fn rotate_refresh_token(
        &self,
        old_token: &str,
        new: &NewRefreshToken,
    ) -> Result<RefreshToken, StoreError>;

    /// Backend reachability probe for the health endpoint.
    async fn ping(&self) -> Result<(), StoreError>;
}
