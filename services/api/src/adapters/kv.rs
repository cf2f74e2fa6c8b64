//! services/api/src/adapters/kv.rs
//!
//! Key-value cache adapters implementing the `BookCache` port. The
//! production adapter persists entries in Postgres using `sqlx`; the
//! in-memory adapter backs local development without a database. Both key
//! entries by `(namespace, isbn)` and treat `put` as an unconditional
//! overwrite.

use async_trait::async_trait;
use bookscan_core::domain::CachedBook;
use bookscan_core::ports::{BookCache, PortError, PortResult};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// The namespace under which book records are stored.
pub const CACHE_NAMESPACE: &str = "book_cache";

//=========================================================================================
// Postgres Adapter
//=========================================================================================

/// A cache adapter that implements the `BookCache` port on Postgres.
#[derive(Clone)]
pub struct PgCacheAdapter {
    pool: PgPool,
}

impl PgCacheAdapter {
    /// Creates a new `PgCacheAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct CacheRow {
    record: serde_json::Value,
    cached_at: DateTime<Utc>,
}

impl CacheRow {
    fn to_domain(self) -> PortResult<CachedBook> {
        let book = serde_json::from_value(self.record)
            .map_err(|e| PortError::Unexpected(format!("corrupt cache record: {e}")))?;
        Ok(CachedBook {
            book,
            cached_at: self.cached_at,
        })
    }
}

#[async_trait]
impl BookCache for PgCacheAdapter {
    async fn get(&self, isbn: &str) -> PortResult<Option<CachedBook>> {
        let row: Option<CacheRow> = sqlx::query_as(
            "SELECT record, cached_at FROM book_cache WHERE namespace = $1 AND isbn = $2",
        )
        .bind(CACHE_NAMESPACE)
        .bind(isbn)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        row.map(CacheRow::to_domain).transpose()
    }

    async fn put(&self, isbn: &str, entry: &CachedBook) -> PortResult<()> {
        let record = serde_json::to_value(&entry.book)
            .map_err(|e| PortError::Unexpected(format!("unserializable record: {e}")))?;

        sqlx::query(
            "INSERT INTO book_cache (namespace, isbn, record, cached_at) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (namespace, isbn) \
             DO UPDATE SET record = EXCLUDED.record, cached_at = EXCLUDED.cached_at",
        )
        .bind(CACHE_NAMESPACE)
        .bind(isbn)
        .bind(record)
        .bind(entry.cached_at)
        .execute(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(())
    }
}

//=========================================================================================
// In-Memory Adapter
//=========================================================================================

/// A process-local cache for running the service without Postgres. The
/// cache then lives exactly as long as the process does.
#[derive(Default)]
pub struct MemoryCacheAdapter {
    entries: RwLock<HashMap<String, CachedBook>>,
}

impl MemoryCacheAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(isbn: &str) -> String {
        format!("{CACHE_NAMESPACE}:{isbn}")
    }
}

#[async_trait]
impl BookCache for MemoryCacheAdapter {
    async fn get(&self, isbn: &str) -> PortResult<Option<CachedBook>> {
        Ok(self.entries.read().await.get(&Self::key(isbn)).cloned())
    }

    async fn put(&self, isbn: &str, entry: &CachedBook) -> PortResult<()> {
        self.entries
            .write()
            .await
            .insert(Self::key(isbn), entry.clone());
        Ok(())
    }
}
