//! In-memory credential store.
//!
//! Backs the test suites and local development without a PostgreSQL
//! instance. Mirrors the constraints the migrations enforce: unique
//! usernames and unique token strings.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use forum_auth_core::types::DbId;

use crate::models::refresh_token::{NewRefreshToken, RefreshToken};
use crate::models::user::{NewUser, User};
use crate::store::{CredentialStore, StoreError};

#[derive(Default)]
struct Inner {
    users: HashMap<DbId, User>,
    /// token string -> row, matching the unique index on `token`.
    tokens: HashMap<String, RefreshToken>,
    next_user_id: DbId,
    next_token_id: DbId,
}

/// Mutex-guarded in-memory store.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn create_user(&self, input: &NewUser) -> Result<User, StoreError> {
        let mut inner = self.inner.lock().expect("memory store poisoned");
        if inner.users.values().any(|u| u.username == input.username) {
            return Err(StoreError::Duplicate);
        }
        inner.next_user_id += 1;
        let user = User {
            id: inner.next_user_id,
            username: input.username.clone(),
            password_hash: input.password_hash.clone(),
            role: input.role,
            created_at: Utc::now(),
        };
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let inner = self.inner.lock().expect("memory store poisoned");
        Ok(inner
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn delete_refresh_tokens_by_user_id(&self, user_id: DbId) -> Result<u64, StoreError> {
        let mut inner = self.inner.lock().expect("memory store poisoned");
        let before = inner.tokens.len();
        inner.tokens.retain(|_, row| row.user_id != user_id);
        Ok((before - inner.tokens.len()) as u64)
    }

    async fn save_refresh_token(
        &self,
        input: &NewRefreshToken,
    ) -> Result<RefreshToken, StoreError> {
        let mut inner = self.inner.lock().expect("memory store poisoned");
        if inner.tokens.contains_key(&input.token) {
            return Err(StoreError::Duplicate);
        }
        inner.next_token_id += 1;
        let row = RefreshToken {
            id: inner.next_token_id,
            user_id: input.user_id,
            token: input.token.clone(),
            expires_at: input.expires_at,
            created_at: Utc::now(),
        };
        inner.tokens.insert(row.token.clone(), row.clone());
        Ok(row)
    }

    async fn get_refresh_token(&self, token: &str) -> Result<Option<RefreshToken>, StoreError> {
        let inner = self.inner.lock().expect("memory store poisoned");
        Ok(inner.tokens.get(token).cloned())
    }

    async fn delete_refresh_token(&self, token: &str) -> Result<bool, StoreError> {
        let mut inner = self.inner.lock().expect("memory store poisoned");
        Ok(inner.tokens.remove(token).is_some())
    }

    async fn replace_refresh_token(
        &self,
        user_id: DbId,
        new: &NewRefreshToken,
    ) -> Result<RefreshToken, StoreError> {
        let mut inner = self.inner.lock().expect("memory store poisoned");
        inner.tokens.retain(|_, row| row.user_id != user_id);
        inner.next_token_id += 1;
        let row = RefreshToken {
            id: inner.next_token_id,
            user_id: new.user_id,
            token: new.token.clone(),
            expires_at: new.expires_at,
            created_at: Utc::now(),
        };
        inner.tokens.insert(row.token.clone(), row.clone());
        Ok(row)
    }

    async fn rotate_refresh_token(
        &self,
        old_token: &str,
        new: &NewRefreshToken,
    ) -> Result<RefreshToken, StoreError> {
        let mut inner = self.inner.lock().expect("memory store poisoned");
        if inner.tokens.remove(old_token).is_none() {
            return Err(StoreError::NotFound);
        }
        inner.next_token_id += 1;
        let row = RefreshToken {
            id: inner.next_token_id,
            user_id: new.user_id,
            token: new.token.clone(),
            expires_at: new.expires_at,
            created_at: Utc::now(),
        };
        inner.tokens.insert(row.token.clone(), row.clone());
        Ok(row)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{Duration, Utc};

    use forum_auth_core::roles::Role;

    use super::*;

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            password_hash: "$argon2id$fake".to_string(),
            role: Role::User,
        }
    }

    fn new_token(user_id: DbId, token: &str) -> NewRefreshToken {
        NewRefreshToken {
            user_id,
            token: token.to_string(),
            expires_at: Utc::now() + Duration::days(30),
        }
    }

    #[tokio::test]
    async fn test_create_user_assigns_sequential_ids() {
        let store = MemoryStore::new();
        let a = store.create_user(&new_user("alice")).await.unwrap();
        let b = store.create_user(&new_user("bob")).await.unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let store = MemoryStore::new();
        store.create_user(&new_user("alice")).await.unwrap();
        let err = store.create_user(&new_user("alice")).await.unwrap_err();
        assert_matches!(err, StoreError::Duplicate);
    }

    #[tokio::test]
    async fn test_replace_deletes_all_prior_tokens_for_user() {
        let store = MemoryStore::new();
        let user = store.create_user(&new_user("alice")).await.unwrap();
        store
            .save_refresh_token(&new_token(user.id, "first"))
            .await
            .unwrap();
        store
            .replace_refresh_token(user.id, &new_token(user.id, "second"))
            .await
            .unwrap();

        assert!(store.get_refresh_token("first").await.unwrap().is_none());
        assert!(store.get_refresh_token("second").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_ops() {
        let store = MemoryStore::new();
        let user = store.create_user(&new_user("alice")).await.unwrap();
        store
            .save_refresh_token(&new_token(user.id, "one"))
            .await
            .unwrap();
        store
            .save_refresh_token(&new_token(user.id, "two"))
            .await
            .unwrap();

        assert!(store.delete_refresh_token("one").await.unwrap());
        assert!(!store.delete_refresh_token("one").await.unwrap());

        let deleted = store
            .delete_refresh_tokens_by_user_id(user.id)
            .await
            .unwrap();
        assert_eq!(deleted, 1);
        assert!(store.get_refresh_token("two").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rotate_fails_when_old_token_missing() {
        let store = MemoryStore::new();
        let err = store
            .rotate_refresh_token("never-saved", &new_token(1, "new"))
            .await
            .unwrap_err();
        assert_matches!(err, StoreError::NotFound);
    }

    #[tokio::test]
    async fn test_rotate_consumes_old_and_saves_new() {
        let store = MemoryStore::new();
        let user = store.create_user(&new_user("alice")).await.unwrap();
        store
            .save_refresh_token(&new_token(user.id, "old"))
            .await
            .unwrap();

        store
            .rotate_refresh_token("old", &new_token(user.id, "new"))
            .await
            .unwrap();

        assert!(store.get_refresh_token("old").await.unwrap().is_none());
        let row = store.get_refresh_token("new").await.unwrap().unwrap();
        assert_eq!(row.user_id, user.id);

        // Rotating the same old token again must fail (one-time use).
        let err = store
            .rotate_refresh_token("old", &new_token(user.id, "newer"))
            .await
            .unwrap_err();
        assert_matches!(err, StoreError::NotFound);
    }
}
