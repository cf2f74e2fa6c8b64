//! crates/bookscan_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like the KV store,
//! the remote catalog API, or the barcode decoding engine.

use async_trait::async_trait;

use crate::domain::{Book, CachedBook, DecodedSymbol};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., store, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Key-value storage of fetched book records, keyed by the ISBN exactly as
/// the lookup layer derived it. The store is opaque: single-key get/put
/// with per-key atomicity, nothing more is assumed.
#[async_trait]
pub trait BookCache: Send + Sync {
    async fn get(&self, isbn: &str) -> PortResult<Option<CachedBook>>;

    /// Unconditionally overwrites any prior entry under `isbn`.
    async fn put(&self, isbn: &str, entry: &CachedBook) -> PortResult<()>;
}

/// The remote catalog API, queried by ISBN or free text.
#[async_trait]
pub trait BookCatalog: Send + Sync {
    /// Fetches the single best match for an ISBN. `Ok(None)` means the
    /// catalog had zero results; transport failures are `Err`.
    async fn find_by_isbn(&self, isbn: &str) -> PortResult<Option<Book>>;

    /// Free-text search returning at most `limit` shaped records.
    async fn search(&self, query: &str, limit: usize) -> PortResult<Vec<Book>>;
}

/// A single-shot barcode decoding engine over one captured camera frame.
pub trait BarcodeDecoder: Send + Sync {
    /// Attempts one decode pass over an encoded image. "No symbol found"
    /// is `Ok` with an empty list, never an error; engine failures are
    /// `Err` and recoverable per attempt.
    fn decode_frame(&self, frame: &[u8]) -> PortResult<Vec<DecodedSymbol>>;
}
