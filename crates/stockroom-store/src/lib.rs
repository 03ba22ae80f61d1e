//! # stockroom-store
//!
//! SQLite persistence for Stockroom.
//!
//! All statements use bound parameters. The stock withdrawal is a single
//! conditional `UPDATE` (see [`Store::withdraw_stock`]), so concurrent
//! withdrawals against the same product can never drive its stock negative.

pub mod error;
pub mod inventory;
pub mod password;
pub mod session;
pub mod users;

pub use error::{SessionError, StoreError};
pub use inventory::WithdrawOutcome;
pub use session::{
    InMemorySessionStore, SessionRecord, SessionStore, SqliteSessionStore, create_session_store,
    generate_token,
};

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use stockroom_core::DatabaseConfig;

/// Handle to the application database.
///
/// Cheap to clone; clones share the pool.
#[derive(Debug, Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Open (creating if needed) the database named by `cfg.url`.
    ///
    /// An in-memory database exists per connection, so it is given a single
    /// connection that is never recycled.
    pub async fn connect(cfg: &DatabaseConfig) -> Result<Self, StoreError> {
        let file_path = cfg.file_path();
        if let Some(path) = file_path {
            ensure_parent_dir(path)?;
        }

        let options = SqliteConnectOptions::from_str(&cfg.url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool_options = match file_path {
            Some(_) => SqlitePoolOptions::new().max_connections(cfg.max_connections),
            None => SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None),
        };

        let pool = pool_options.connect_with(options).await?;
        tracing::info!(url = %cfg.url, "connected to database");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Apply the embedded migrations.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

fn ensure_parent_dir(file_path: &str) -> Result<(), StoreError> {
    let p = Path::new(file_path);
    if let Some(parent) = p.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
