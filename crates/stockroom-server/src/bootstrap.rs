use stockroom_core::{BootstrapConfig, Role};
use stockroom_store::Store;

pub const ADMIN_PASSWORD_ENV: &str = "STOCKROOM_ADMIN_PASSWORD";

/// The bootstrap admin password.
///
/// Source (highest precedence first):
/// - env `STOCKROOM_ADMIN_PASSWORD`
/// - `stockroom.toml` `[bootstrap].admin_password`
pub fn admin_password(cfg: &BootstrapConfig) -> String {
    std::env::var(ADMIN_PASSWORD_ENV).unwrap_or_else(|_| cfg.admin_password.clone())
}

/// On startup, if there are no users, create an Administrator.
///
/// Returns whether an account was created.
pub async fn bootstrap_admin(
    store: &Store,
    username: &str,
    password: &str,
) -> anyhow::Result<bool> {
    if store.count_users().await? > 0 {
        return Ok(false);
    }

    if password.trim().is_empty() {
        anyhow::bail!(
            "bootstrap admin password is empty (set {ADMIN_PASSWORD_ENV} or stockroom.toml [bootstrap].admin_password)"
        );
    }

    store
        .create_user(username, password, &Role::Administrator)
        .await?;

    tracing::warn!(
        user = %username,
        "bootstrapped administrator account (password taken from env/config)"
    );
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_core::DatabaseConfig;

    async fn store() -> Store {
        let store = Store::connect(&DatabaseConfig {
            url: "sqlite::memory:".into(),
            max_connections: 1,
        })
        .await
        .unwrap();
        store.migrate().await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_bootstrap_creates_admin_once() {
        let store = store().await;

        assert!(bootstrap_admin(&store, "admin", "changeme").await.unwrap());
        assert!(!bootstrap_admin(&store, "admin", "other").await.unwrap());
        assert_eq!(store.count_users().await.unwrap(), 1);

        let identity = store
            .authenticate("admin", "changeme")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(identity.role, Role::Administrator);
    }

    #[tokio::test]
    async fn test_bootstrap_rejects_empty_password() {
        let store = store().await;
        assert!(bootstrap_admin(&store, "admin", "   ").await.is_err());
        assert_eq!(store.count_users().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_bootstrap_skipped_when_users_exist() {
        let store = store().await;
        store
            .create_user("mia", "pw", &Role::Manager)
            .await
            .unwrap();
        assert!(!bootstrap_admin(&store, "admin", "").await.unwrap());
    }
}
