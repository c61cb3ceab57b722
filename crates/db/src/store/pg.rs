//! PostgreSQL credential store adapter.

use async_trait::async_trait;

use forum_auth_core::types::DbId;

use crate::models::refresh_token::{NewRefreshToken, RefreshToken};
use crate::models::user::{NewUser, User};
use crate::store::{CredentialStore, StoreError};
use crate::DbPool;

/// Column list shared across user queries to avoid repetition.
const USER_COLUMNS: &str = "id, username, password_hash, role, created_at";

/// Column list shared across refresh token queries.
const TOKEN_COLUMNS: &str = "id, user_id, token, expires_at, created_at";

/// Credential store backed by the `users` and `refresh_tokens` tables.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map insert failures, distinguishing unique-constraint violations.
fn classify_insert_error(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => StoreError::Duplicate,
        _ => StoreError::Backend(err),
    }
}

#[async_trait]
impl CredentialStore for PgStore {
    async fn create_user(&self, input: &NewUser) -> Result<User, StoreError> {
        let query = format!(
            "INSERT INTO users (username, password_hash, role)
             VALUES ($1, $2, $3)
             RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.password_hash)
            .bind(input.role.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(classify_insert_error)
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn delete_refresh_tokens_by_user_id(&self, user_id: DbId) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn save_refresh_token(
        &self,
        input: &NewRefreshToken,
    ) -> Result<RefreshToken, StoreError> {
        let query = format!(
            "INSERT INTO refresh_tokens (user_id, token, expires_at)
             VALUES ($1, $2, $3)
             RETURNING {TOKEN_COLUMNS}"
        );
        sqlx::query_as::<_, RefreshToken>(&query)
            .bind(input.user_id)
            .bind(&input.token)
            .bind(input.expires_at)
            .fetch_one(&self.pool)
            .await
            .map_err(classify_insert_error)
    }

    async fn get_refresh_token(&self, token: &str) -> Result<Option<RefreshToken>, StoreError> {
        let query = format!("SELECT {TOKEN_COLUMNS} FROM refresh_tokens WHERE token = $1");
        let row = sqlx::query_as::<_, RefreshToken>(&query)
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete_refresh_token(&self, token: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn replace_refresh_token(
        &self,
        user_id: DbId,
        new: &NewRefreshToken,
    ) -> Result<RefreshToken, StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM refresh_tokens WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        let query = format!(
            "INSERT INTO refresh_tokens (user_id, token, expires_at)
             VALUES ($1, $2, $3)
             RETURNING {TOKEN_COLUMNS}"
        );
        let row = sqlx::query_as::<_, RefreshToken>(&query)
            .bind(new.user_id)
            .bind(&new.token)
            .bind(new.expires_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(classify_insert_error)?;

        tx.commit().await?;
        Ok(row)
    }

    async fn rotate_refresh_token(
        &self,
        old_token: &str,
        new: &NewRefreshToken,
    ) -> Result<RefreshToken, StoreError> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM refresh_tokens WHERE token = $1")
            .bind(old_token)
            .execute(&mut *tx)
            .await?;
        if deleted.rows_affected() == 0 {
            // Already consumed by a concurrent refresh, or replayed.
            tracing::warn!("refresh token row missing during rotation");
            return Err(StoreError::NotFound);
        }

        let query = format!(
            "INSERT INTO refresh_tokens (user_id, token, expires_at)
             VALUES ($1, $2, $3)
             RETURNING {TOKEN_COLUMNS}"
        );
        let row = sqlx::query_as::<_, RefreshToken>(&query)
            .bind(new.user_id)
            .bind(&new.token)
            .bind(new.expires_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(classify_insert_error)?;

        tx.commit().await?;
        Ok(row)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
