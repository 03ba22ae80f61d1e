//! Error types for the store crate.

use thiserror::Error;

/// Errors raised by the relational store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Query or connection failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Embedded migrations failed to apply.
    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A unique constraint rejected the write.
    #[error("already exists: {0}")]
    Conflict(String),

    /// The named role is not in the `roles` table.
    #[error("unknown role: {0}")]
    UnknownRole(String),

    /// Hashing or verifying a password failed.
    #[error("password hashing failed: {0}")]
    PasswordHash(String),

    /// Preparing the database file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by session backends.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Map a unique-constraint violation to [`StoreError::Conflict`].
pub(crate) fn conflict_or(err: sqlx::Error, what: impl Into<String>) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Conflict(what.into()),
        _ => StoreError::Database(err),
    }
}
