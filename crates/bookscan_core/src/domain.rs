//! crates/bookscan_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or HTTP concern beyond
//! the serde derives needed to round-trip them through the cache.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The canonical representation of a catalog item.
///
/// Created by the metadata fetch adapter and read-only thereafter. When an
/// ISBN is present it is the 13-digit normalized form where derivable and
/// passes the ISBN-13 checksum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// 13-digit normalized ISBN where derivable; empty when the upstream
    /// entry carried no usable identifier (free-text results may not).
    pub isbn: String,
    pub title: String,
    pub authors: Vec<String>,
    pub publisher: Option<String>,
    pub published_date: Option<String>,
    pub description: Option<String>,
    /// Cover image URL, always rewritten to the https scheme.
    pub thumbnail: Option<String>,
    /// Alternate identifiers as reported upstream (ISBN_10, ISBN_13, ...).
    pub identifiers: Vec<Identifier>,
}

/// An alternate identifier attached to a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    pub kind: String,
    pub value: String,
}

/// A cache entry: one book plus the moment it was fetched.
///
/// Written once per ISBN on a cache miss; a later miss-triggered fetch
/// simply overwrites. Entries are never expired by this core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedBook {
    pub book: Book,
    pub cached_at: DateTime<Utc>,
}

/// Barcode symbologies the scan path recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolFormat {
    Ean13,
    Ean8,
    UpcA,
    UpcE,
}

/// Raw decoder output for a single scan attempt. Ephemeral: the payload is
/// transformed into an ISBN and never persisted as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedSymbol {
    pub format: SymbolFormat,
    pub text: String,
}
