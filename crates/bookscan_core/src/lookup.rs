//! crates/bookscan_core/src/lookup.rs
//!
//! The cache-or-fetch lookup flow. `LookupService` owns the per-call state
//! machine: an ISBN lookup is cache-first with a write-through on miss, a
//! free-text lookup always bypasses the cache. Both capabilities (the KV
//! cache and the remote catalog) are injected as ports so tests can
//! substitute fakes without touching global state.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::{Book, CachedBook};
use crate::ports::{BookCache, BookCatalog, PortError};

/// How many shaped records a free-text lookup returns at most.
pub const FREE_TEXT_RESULT_LIMIT: usize = 10;

/// The error taxonomy of a single lookup attempt. All variants are local
/// to the attempt; the scan loop simply tries again on its next tick.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("Missing parameter: {0}")]
    MissingParameter(&'static str),
    #[error("No catalog entry found for {0}")]
    NotFound(String),
    #[error("Upstream catalog error: {0}")]
    Upstream(String),
}

impl From<PortError> for LookupError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound(what) => LookupError::NotFound(what),
            PortError::Unexpected(msg) => LookupError::Upstream(msg),
        }
    }
}

/// A parsed lookup request: exactly one of the two query forms.
#[derive(Debug, Clone)]
pub enum LookupRequest {
    Isbn(String),
    FreeText(String),
}

/// The two shapes a successful lookup can take.
#[derive(Debug, Clone)]
pub enum LookupResponse {
    Single(Book),
    Matches(Vec<Book>),
}

/// Coordinates the cache and the remote catalog for one lookup at a time.
#[derive(Clone)]
pub struct LookupService {
    cache: Arc<dyn BookCache>,
    catalog: Arc<dyn BookCatalog>,
}

impl LookupService {
    pub fn new(cache: Arc<dyn BookCache>, catalog: Arc<dyn BookCatalog>) -> Self {
        Self { cache, catalog }
    }

    /// Runs one lookup attempt end to end. No retries happen at this
    /// layer and a failed attempt leaves no partial state behind: the
    /// only side effect is the write-through on a successful ISBN miss.
    pub async fn lookup(&self, request: LookupRequest) -> Result<LookupResponse, LookupError> {
        match request {
            LookupRequest::Isbn(isbn) => {
                let isbn = isbn.trim().to_string();
                if isbn.is_empty() {
                    return Err(LookupError::MissingParameter("isbn"));
                }
                self.lookup_by_isbn(&isbn).await.map(LookupResponse::Single)
            }
            LookupRequest::FreeText(query) => {
                let query = query.trim().to_string();
                if query.is_empty() {
                    return Err(LookupError::MissingParameter("q"));
                }
                let matches = self.catalog.search(&query, FREE_TEXT_RESULT_LIMIT).await?;
                Ok(LookupResponse::Matches(matches))
            }
        }
    }

    async fn lookup_by_isbn(&self, isbn: &str) -> Result<Book, LookupError> {
        // Cache hit short-circuits the fetch entirely, which also means a
        // cached entry is never refreshed under normal operation.
        if let Some(entry) = self.cache.get(isbn).await? {
            return Ok(entry.book);
        }

        let book = self
            .catalog
            .find_by_isbn(isbn)
            .await?
            .ok_or_else(|| LookupError::NotFound(isbn.to_string()))?;

        let entry = CachedBook {
            book: book.clone(),
            cached_at: Utc::now(),
        };
        self.cache.put(isbn, &entry).await?;
        Ok(book)
    }
}
