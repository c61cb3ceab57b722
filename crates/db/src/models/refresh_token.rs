//! Refresh token entity model and insert DTO.

use sqlx::FromRow;

use forum_auth_core::types::{DbId, Timestamp};

/// A refresh token row from the `refresh_tokens` table.
///
/// At most one live row exists per user: a login replaces every prior row
/// for that user, and a refresh consumes the row it was presented with.
#[derive(Debug, Clone, FromRow)]
pub struct RefreshToken {
    pub id: DbId,
    pub user_id: DbId,
    pub token: String,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
}

/// DTO for persisting a newly issued refresh token.
#[derive(Debug, Clone)]
pub struct NewRefreshToken {
    pub user_id: DbId,
    pub token: String,
    pub expires_at: Timestamp,
}
