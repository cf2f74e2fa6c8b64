//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::state::AppState;
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use bookscan_core::domain::{Book, Identifier};
use bookscan_core::isbn::extract_isbn_from_barcode;
use bookscan_core::lookup::{LookupError, LookupRequest, LookupResponse};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};
use utoipa::{IntoParams, OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        health_handler,
        lookup_handler,
        scan_handler,
    ),
    components(
        schemas(BookDto, IdentifierDto, LookupResponseDto)
    ),
    tags(
        (name = "Book Scan API", description = "API endpoints for classroom book barcode lookup.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// A catalog record as returned to the UI.
#[derive(Serialize, ToSchema)]
pub struct BookDto {
    isbn: String,
    title: String,
    authors: Vec<String>,
    publisher: Option<String>,
    published_date: Option<String>,
    description: Option<String>,
    thumbnail: Option<String>,
    identifiers: Vec<IdentifierDto>,
}

#[derive(Serialize, ToSchema)]
pub struct IdentifierDto {
    kind: String,
    value: String,
}

impl From<Book> for BookDto {
    fn from(book: Book) -> Self {
        Self {
            isbn: book.isbn,
            title: book.title,
            authors: book.authors,
            publisher: book.publisher,
            published_date: book.published_date,
            description: book.description,
            thumbnail: book.thumbnail,
            identifiers: book.identifiers.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<Identifier> for IdentifierDto {
    fn from(id: Identifier) -> Self {
        Self {
            kind: id.kind,
            value: id.value,
        }
    }
}

/// The two shapes the lookup endpoint can answer with: one record for an
/// ISBN query, a bare array of up to 10 records for a free-text query.
#[derive(Serialize, ToSchema)]
#[serde(untagged)]
pub enum LookupResponseDto {
    Single(BookDto),
    Matches(Vec<BookDto>),
}

/// Query parameters for the lookup endpoint. Exactly one of the two is
/// required; `isbn` wins when both are present.
#[derive(Deserialize, IntoParams)]
pub struct LookupParams {
    /// An ISBN-10 or ISBN-13, hyphens allowed.
    isbn: Option<String>,
    /// A free-text title/author query.
    q: Option<String>,
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Liveness check.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up"))
)]
pub async fn health_handler() -> StatusCode {
    StatusCode::OK
}

/// Look up catalog metadata by ISBN or free text.
///
/// ISBN lookups are served from the cache when possible and trigger a
/// remote fetch plus a cache write on miss. Free-text lookups always go
/// to the remote catalog and are never cached.
#[utoipa::path(
    get,
    path = "/lookup",
    params(LookupParams),
    responses(
        (status = 200, description = "A single book (isbn) or an array of up to 10 books (q)", body = LookupResponseDto),
        (status = 400, description = "Neither isbn nor q was provided"),
        (status = 404, description = "No catalog entry matched the ISBN"),
        (status = 502, description = "The remote catalog failed")
    )
)]
pub async fn lookup_handler(
    State(app_state): State<Arc<AppState>>,
    Query(params): Query<LookupParams>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let request = match (params.isbn, params.q) {
        (Some(isbn), _) => LookupRequest::Isbn(isbn),
        (None, Some(q)) => LookupRequest::FreeText(q),
        (None, None) => {
            return Err((
                StatusCode::BAD_REQUEST,
                "Missing parameter: provide either isbn or q".to_string(),
            ))
        }
    };

    match app_state.lookup.lookup(request).await {
        Ok(LookupResponse::Single(book)) => Ok(Json(LookupResponseDto::Single(book.into()))),
        Ok(LookupResponse::Matches(books)) => Ok(Json(LookupResponseDto::Matches(
            books.into_iter().map(BookDto::from).collect(),
        ))),
        Err(e) => Err(lookup_error_response(e)),
    }
}

/// Decode one captured camera frame and look up the book it identifies.
///
/// The request body is the raw encoded image of a single frame. The
/// pipeline is decode, extract a canonical ISBN from the payload, then
/// the same cache-or-fetch lookup as `/lookup?isbn=`.
#[utoipa::path(
    post,
    path = "/scan",
    request_body(content_type = "application/octet-stream", description = "One captured frame as an encoded image."),
    responses(
        (status = 200, description = "The book identified by the frame's barcode", body = BookDto),
        (status = 404, description = "The barcode decoded but matched no catalog entry"),
        (status = 422, description = "No barcode or no ISBN-shaped payload in the frame"),
        (status = 500, description = "The decode engine failed on the frame"),
        (status = 502, description = "The remote catalog failed")
    )
)]
pub async fn scan_handler(
    State(app_state): State<Arc<AppState>>,
    frame: Bytes,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    // An engine fault is not a clean "nothing in this frame": the former
    // is a 500, the latter a 422. Both are per-attempt failures the scan
    // loop answers by sending the next frame.
    let symbols = app_state.decoder.decode_frame(&frame).map_err(|e| {
        error!("barcode engine failed on frame: {e}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Decode engine failure: {e}"),
        )
    })?;

    let Some(symbol) = symbols.into_iter().next() else {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            "No barcode recognized in frame".to_string(),
        ));
    };

    let Some(isbn) = extract_isbn_from_barcode(&symbol.text) else {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("Decoded payload '{}' is not an ISBN", symbol.text),
        ));
    };

    info!(format = ?symbol.format, %isbn, "decoded barcode");
    match app_state.lookup.lookup(LookupRequest::Isbn(isbn)).await {
        Ok(LookupResponse::Single(book)) => Ok(Json(BookDto::from(book))),
        // An ISBN request can only produce a single record.
        Ok(LookupResponse::Matches(_)) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            "Unexpected multi-record response for an ISBN lookup".to_string(),
        )),
        Err(e) => Err(lookup_error_response(e)),
    }
}

/// Maps the lookup error taxonomy onto HTTP statuses.
fn lookup_error_response(err: LookupError) -> (StatusCode, String) {
    match err {
        LookupError::MissingParameter(_) => (StatusCode::BAD_REQUEST, err.to_string()),
        LookupError::NotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
        LookupError::Upstream(_) => {
            error!("lookup failed upstream: {err}");
            (StatusCode::BAD_GATEWAY, err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use async_trait::async_trait;
    use bookscan_core::domain::{CachedBook, DecodedSymbol, SymbolFormat};
    use bookscan_core::lookup::LookupService;
    use bookscan_core::ports::{
        BarcodeDecoder, BookCache, BookCatalog, PortError, PortResult,
    };

    struct NullCache;

    #[async_trait]
    impl BookCache for NullCache {
        async fn get(&self, _isbn: &str) -> PortResult<Option<CachedBook>> {
            Ok(None)
        }

        async fn put(&self, _isbn: &str, _entry: &CachedBook) -> PortResult<()> {
            Ok(())
        }
    }

    struct NullCatalog;

    #[async_trait]
    impl BookCatalog for NullCatalog {
        async fn find_by_isbn(&self, _isbn: &str) -> PortResult<Option<Book>> {
            Ok(None)
        }

        async fn search(&self, _query: &str, _limit: usize) -> PortResult<Vec<Book>> {
            Ok(vec![])
        }
    }

    /// A decoder stub that either fails outright or reports fixed symbols.
    enum StubDecoder {
        Failing,
        Yielding(Vec<DecodedSymbol>),
    }

    impl BarcodeDecoder for StubDecoder {
        fn decode_frame(&self, _frame: &[u8]) -> PortResult<Vec<DecodedSymbol>> {
            match self {
                StubDecoder::Failing => {
                    Err(PortError::Unexpected("unreadable frame image".to_string()))
                }
                StubDecoder::Yielding(symbols) => Ok(symbols.clone()),
            }
        }
    }

    fn state_with_decoder(decoder: StubDecoder) -> Arc<AppState> {
        Arc::new(AppState {
            lookup: LookupService::new(Arc::new(NullCache), Arc::new(NullCatalog)),
            decoder: Arc::new(decoder),
            config: Arc::new(Config {
                bind_address: "127.0.0.1:0".parse().unwrap(),
                database_url: None,
                log_level: tracing::Level::INFO,
                catalog_endpoint: "https://catalog.example/volumes".to_string(),
                catalog_api_key: None,
            }),
        })
    }

    async fn scan_error(state: Arc<AppState>) -> (StatusCode, String) {
        match scan_handler(State(state), Bytes::from_static(b"frame")).await {
            Err(e) => e,
            Ok(_) => panic!("expected the scan to fail"),
        }
    }

    #[tokio::test]
    async fn engine_fault_is_a_500_not_a_clean_non_detection() {
        let (status, message) = scan_error(state_with_decoder(StubDecoder::Failing)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(message.contains("unreadable frame image"));
    }

    #[tokio::test]
    async fn empty_frame_and_non_isbn_payload_are_422() {
        let (status, _) =
            scan_error(state_with_decoder(StubDecoder::Yielding(vec![]))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let symbol = DecodedSymbol {
            format: SymbolFormat::Ean8,
            text: "96385074".to_string(),
        };
        let (status, message) =
            scan_error(state_with_decoder(StubDecoder::Yielding(vec![symbol]))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(message.contains("not an ISBN"));
    }

    #[test]
    fn lookup_response_serializes_untagged() {
        let single = LookupResponseDto::Single(BookDto::from(Book {
            isbn: "9780134190440".to_string(),
            title: "Effective Java".to_string(),
            authors: vec!["Joshua Bloch".to_string()],
            publisher: None,
            published_date: None,
            description: None,
            thumbnail: None,
            identifiers: vec![],
        }));
        let value = serde_json::to_value(&single).unwrap();
        assert!(value.is_object());
        assert_eq!(value["isbn"], "9780134190440");

        let matches = LookupResponseDto::Matches(vec![]);
        assert!(serde_json::to_value(&matches).unwrap().is_array());
    }

    #[test]
    fn lookup_errors_map_to_the_documented_statuses() {
        let (status, _) = lookup_error_response(LookupError::MissingParameter("isbn"));
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) =
            lookup_error_response(LookupError::NotFound("9780134190440".to_string()));
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, message) =
            lookup_error_response(LookupError::Upstream("connection reset".to_string()));
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(message.contains("connection reset"));
    }
}
