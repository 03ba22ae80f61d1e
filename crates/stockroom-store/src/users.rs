//! User and role queries.

use crate::error::conflict_or;
use crate::password::{hash_password_blocking, verify_password_blocking};
use crate::{Store, StoreError};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use stockroom_core::{Role, UserCredentials, UserIdentity};

const IDENTITY_BY_ID: &str = r#"
    SELECT u.id, u.username, r.id AS role_id, r.name AS role_name
    FROM users u
    JOIN roles r ON u.role_id = r.id
    WHERE u.id = ?
"#;

const CREDENTIALS_BY_USERNAME: &str = r#"
    SELECT u.id, u.username, u.password_hash, r.id AS role_id, r.name AS role_name
    FROM users u
    JOIN roles r ON u.role_id = r.id
    WHERE u.username = ?
"#;

fn identity_from_row(row: &SqliteRow) -> Result<UserIdentity, sqlx::Error> {
    let role_name: String = row.try_get("role_name")?;
    Ok(UserIdentity {
        user_id: row.try_get("id")?,
        username: row.try_get("username")?,
        role_id: row.try_get("role_id")?,
        role: Role::from_name(&role_name),
    })
}

impl Store {
    /// Current identity of user `user_id`, or `None` if the user (or their
    /// role) no longer exists.
    pub async fn find_identity(&self, user_id: i64) -> Result<Option<UserIdentity>, StoreError> {
        let row = sqlx::query(IDENTITY_BY_ID)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(identity_from_row).transpose()?)
    }

    pub async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<UserCredentials>, StoreError> {
        let row = sqlx::query(CREDENTIALS_BY_USERNAME)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        Ok(Some(UserCredentials {
            identity: identity_from_row(&row)?,
            password_hash: row.try_get("password_hash")?,
        }))
    }

    /// Verify a username/password pair.
    ///
    /// Returns `None` for an unknown user and for a wrong password alike.
    /// Both cases run one Argon2 verification.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<UserIdentity>, StoreError> {
        let credentials = self.find_credentials(username).await?;
        let stored_hash = credentials.as_ref().map(|c| c.password_hash.clone());
        let matches = verify_password_blocking(password.to_string(), stored_hash).await?;
        Ok(credentials
            .filter(|_| matches)
            .map(|credentials| credentials.identity))
    }

    /// Create a user with a freshly hashed password. Returns the new id.
    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        role: &Role,
    ) -> Result<i64, StoreError> {
        let role_id = self
            .role_id(role)
            .await?
            .ok_or_else(|| StoreError::UnknownRole(role.to_string()))?;
        let hash = hash_password_blocking(password.to_string()).await?;

        let result =
            sqlx::query("INSERT INTO users (username, password_hash, role_id) VALUES (?, ?, ?)")
                .bind(username)
                .bind(hash)
                .bind(role_id)
                .execute(&self.pool)
                .await
                .map_err(|e| conflict_or(e, format!("user '{username}'")))?;

        Ok(result.last_insert_rowid())
    }

    /// Delete a user by name. Their stored sessions go with them.
    pub async fn delete_user(&self, username: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE username = ?")
            .bind(username)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count_users(&self) -> Result<i64, StoreError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(1) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0)
    }

    pub async fn role_id(&self, role: &Role) -> Result<Option<i64>, StoreError> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM roles WHERE name = ?")
            .bind(role.name())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| r.0))
    }
}

#[cfg(test)]
mod tests {
    use crate::StoreError;
    use crate::password::{VERIFIED, dummy_hash};
    use crate::test_support::memory_store;
    use stockroom_core::Role;

    #[tokio::test]
    async fn test_seeded_roles() {
        let store = memory_store().await;
        assert_eq!(store.role_id(&Role::Administrator).await.unwrap(), Some(1));
        assert_eq!(store.role_id(&Role::Manager).await.unwrap(), Some(2));
        assert_eq!(store.role_id(&Role::StandardUser).await.unwrap(), Some(3));
        assert_eq!(
            store.role_id(&Role::Other("Auditor".into())).await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_create_and_find_identity() {
        let store = memory_store().await;
        let id = store.create_user("mia", "pw", &Role::Manager).await.unwrap();

        let identity = store.find_identity(id).await.unwrap().unwrap();
        assert_eq!(identity.username, "mia");
        assert_eq!(identity.role, Role::Manager);
        assert_eq!(identity.role_id, 2);
        assert_eq!(store.count_users().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_password_is_not_stored_in_plain_text() {
        let store = memory_store().await;
        store.create_user("mia", "pw", &Role::Manager).await.unwrap();
        let creds = store.find_credentials("mia").await.unwrap().unwrap();
        assert_ne!(creds.password_hash, "pw");
        assert!(creds.password_hash.starts_with("$argon2"));
    }

    #[tokio::test]
    async fn test_authenticate() {
        let store = memory_store().await;
        store.create_user("mia", "pw", &Role::StandardUser).await.unwrap();

        let ok = store.authenticate("mia", "pw").await.unwrap();
        assert_eq!(ok.map(|i| i.username), Some("mia".to_string()));
        assert!(store.authenticate("mia", "PW").await.unwrap().is_none());
        assert!(store.authenticate("nobody", "pw").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unknown_user_still_runs_password_verification() {
        let store = memory_store().await;
        store.create_user("mia", "pw", &Role::Manager).await.unwrap();

        let attempt = "unknown-user-attempt-5c1e";
        assert!(store.authenticate("nobody", attempt).await.unwrap().is_none());

        let verified = VERIFIED.lock().unwrap();
        assert!(
            verified
                .iter()
                .any(|(password, hash)| password == attempt && hash == dummy_hash())
        );
    }

    #[tokio::test]
    async fn test_duplicate_username_is_a_conflict() {
        let store = memory_store().await;
        store.create_user("mia", "pw", &Role::Manager).await.unwrap();
        let err = store.create_user("mia", "other", &Role::Manager).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_unknown_role_is_rejected() {
        let store = memory_store().await;
        let err = store
            .create_user("mia", "pw", &Role::Other("Auditor".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownRole(_)));
    }

    #[tokio::test]
    async fn test_deleted_user_has_no_identity() {
        let store = memory_store().await;
        let id = store.create_user("mia", "pw", &Role::Manager).await.unwrap();
        assert!(store.delete_user("mia").await.unwrap());
        assert!(store.find_identity(id).await.unwrap().is_none());
        assert!(!store.delete_user("mia").await.unwrap());
    }
}
