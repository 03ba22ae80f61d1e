//! Session storage backends.
//!
//! A session maps an opaque token to the user it was issued for, plus a
//! cached copy of that user's name and role. The cache is refreshed on every
//! verified request but never used to authorize one.

use crate::{SessionError, Store};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use rand::RngCore;
use sqlx::{Row, SqlitePool};
use std::collections::HashMap;
use std::sync::Arc;
use stockroom_core::{Role, SessionBackend, UserIdentity};
use tokio::sync::RwLock;

/// Server-held state for one session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub user_id: i64,
    pub username: String,
    pub role_id: i64,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn new(identity: &UserIdentity) -> Self {
        Self {
            user_id: identity.user_id,
            username: identity.username.clone(),
            role_id: identity.role_id,
            role: identity.role.clone(),
            created_at: Utc::now(),
        }
    }

    fn refresh(&mut self, identity: &UserIdentity) {
        self.username = identity.username.clone();
        self.role_id = identity.role_id;
        self.role = identity.role.clone();
    }
}

/// A fresh 256-bit token, base64url encoded.
pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Key-value repository of sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert(&self, token: &str, record: SessionRecord) -> Result<(), SessionError>;

    async fn get(&self, token: &str) -> Result<Option<SessionRecord>, SessionError>;

    /// Overwrite the cached identity of an existing session. A missing token
    /// is not an error.
    async fn refresh(&self, token: &str, identity: &UserIdentity) -> Result<(), SessionError>;

    /// Delete a session. Returns whether it existed.
    async fn remove(&self, token: &str) -> Result<bool, SessionError>;
}

/// Create the session backend selected in configuration.
pub fn create_session_store(backend: SessionBackend, store: &Store) -> Arc<dyn SessionStore> {
    match backend {
        SessionBackend::Memory => Arc::new(InMemorySessionStore::new()),
        SessionBackend::Database => Arc::new(SqliteSessionStore::new(store.pool().clone())),
    }
}

/// Process-local sessions. Lost on restart and not shared between instances.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, SessionRecord>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn insert(&self, token: &str, record: SessionRecord) -> Result<(), SessionError> {
        self.sessions.write().await.insert(token.to_string(), record);
        Ok(())
    }

    async fn get(&self, token: &str) -> Result<Option<SessionRecord>, SessionError> {
        Ok(self.sessions.read().await.get(token).cloned())
    }

    async fn refresh(&self, token: &str, identity: &UserIdentity) -> Result<(), SessionError> {
        if let Some(record) = self.sessions.write().await.get_mut(token) {
            record.refresh(identity);
        }
        Ok(())
    }

    async fn remove(&self, token: &str) -> Result<bool, SessionError> {
        Ok(self.sessions.write().await.remove(token).is_some())
    }
}

/// Sessions in the `sessions` table of the application database.
#[derive(Debug, Clone)]
pub struct SqliteSessionStore {
    pool: SqlitePool,
}

impl SqliteSessionStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    async fn insert(&self, token: &str, record: SessionRecord) -> Result<(), SessionError> {
        sqlx::query(
            "INSERT INTO sessions (token, user_id, username, role_id, role_name, created_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(token)
        .bind(record.user_id)
        .bind(&record.username)
        .bind(record.role_id)
        .bind(record.role.name())
        .bind(record.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get(&self, token: &str) -> Result<Option<SessionRecord>, SessionError> {
        let row = sqlx::query(
            "SELECT user_id, username, role_id, role_name, created_at FROM sessions WHERE token = ?",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let role_name: String = row.try_get("role_name")?;
        Ok(Some(SessionRecord {
            user_id: row.try_get("user_id")?,
            username: row.try_get("username")?,
            role_id: row.try_get("role_id")?,
            role: Role::from_name(&role_name),
            created_at: row.try_get("created_at")?,
        }))
    }

    async fn refresh(&self, token: &str, identity: &UserIdentity) -> Result<(), SessionError> {
        sqlx::query("UPDATE sessions SET username = ?, role_id = ?, role_name = ? WHERE token = ?")
            .bind(&identity.username)
            .bind(identity.role_id)
            .bind(identity.role.name())
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn remove(&self, token: &str) -> Result<bool, SessionError> {
        let result = sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::memory_store;

    fn identity(user_id: i64, username: &str, role: Role, role_id: i64) -> UserIdentity {
        UserIdentity {
            user_id,
            username: username.to_string(),
            role_id,
            role,
        }
    }

    async fn exercise(sessions: &dyn SessionStore, user_id: i64) {
        let who = identity(user_id, "mia", Role::Manager, 2);
        let token = generate_token();

        assert!(sessions.get(&token).await.unwrap().is_none());
        sessions.insert(&token, SessionRecord::new(&who)).await.unwrap();

        let record = sessions.get(&token).await.unwrap().unwrap();
        assert_eq!(record.user_id, user_id);
        assert_eq!(record.role, Role::Manager);

        let demoted = identity(user_id, "mia", Role::StandardUser, 3);
        sessions.refresh(&token, &demoted).await.unwrap();
        let record = sessions.get(&token).await.unwrap().unwrap();
        assert_eq!(record.role, Role::StandardUser);
        assert_eq!(record.role_id, 3);

        sessions.refresh("missing", &demoted).await.unwrap();

        assert!(sessions.remove(&token).await.unwrap());
        assert!(!sessions.remove(&token).await.unwrap());
        assert!(sessions.get(&token).await.unwrap().is_none());
    }

    #[test]
    fn test_tokens_are_unique_and_url_safe() {
        let a = generate_token();
        let b = generate_token();
        assert_ne!(a, b);
        assert_eq!(a.len(), 43);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[tokio::test]
    async fn test_in_memory_store() {
        let sessions = InMemorySessionStore::new();
        exercise(&sessions, 7).await;
        assert!(sessions.is_empty().await);
    }

    #[tokio::test]
    async fn test_sqlite_store() {
        let store = memory_store().await;
        let user_id = store
            .create_user("mia", "pw", &Role::Manager)
            .await
            .unwrap();
        let sessions = SqliteSessionStore::new(store.pool().clone());
        exercise(&sessions, user_id).await;
    }

    #[tokio::test]
    async fn test_sqlite_sessions_follow_user_deletion() {
        let store = memory_store().await;
        let user_id = store
            .create_user("mia", "pw", &Role::Manager)
            .await
            .unwrap();
        let sessions = SqliteSessionStore::new(store.pool().clone());
        let token = generate_token();
        sessions
            .insert(&token, SessionRecord::new(&identity(user_id, "mia", Role::Manager, 2)))
            .await
            .unwrap();

        store.delete_user("mia").await.unwrap();
        assert!(sessions.get(&token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_factory_selects_backend() {
        let store = memory_store().await;
        let sessions = create_session_store(SessionBackend::Database, &store);
        let token = generate_token();
        let user_id = store
            .create_user("mia", "pw", &Role::Manager)
            .await
            .unwrap();
        sessions
            .insert(&token, SessionRecord::new(&identity(user_id, "mia", Role::Manager, 2)))
            .await
            .unwrap();
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sessions")
            .fetch_one(store.pool())
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}
