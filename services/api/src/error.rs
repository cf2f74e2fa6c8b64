//! services/api/src/error.rs
//!
//! The startup-level error type of the service binary. Per-request
//! failures never reach this: handlers map `LookupError` straight onto
//! HTTP statuses, so `ApiError` only covers what can go wrong while
//! bringing the service up.

use crate::config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Connecting to or querying the cache database failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Applying the cache-table migrations failed.
    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// Binding the listen socket or serving on it failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
