//! services/api/src/adapters/google_books.rs
//!
//! The remote catalog adapter, a concrete implementation of the
//! `BookCatalog` port against the Google Books volumes API. It owns the
//! query construction and the shaping of the loosely-typed upstream JSON
//! into the strict canonical `Book` record.

use async_trait::async_trait;
use bookscan_core::domain::{Book, Identifier};
use bookscan_core::ports::{BookCatalog, PortError, PortResult};
use serde::Deserialize;
use tracing::debug;

const TITLE_PLACEHOLDER: &str = "Unknown Title";
const AUTHOR_PLACEHOLDER: &str = "Unknown Author";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A catalog adapter that implements the `BookCatalog` port over HTTP.
#[derive(Clone)]
pub struct GoogleBooksAdapter {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl GoogleBooksAdapter {
    pub fn new(client: reqwest::Client, endpoint: String, api_key: Option<String>) -> Self {
        Self {
            client,
            endpoint,
            api_key,
        }
    }

    fn volumes_url(&self, query: &str, limit: usize) -> String {
        let mut url = format!(
            "{}?q={}&maxResults={}",
            self.endpoint,
            urlencoding::encode(query),
            limit
        );
        if let Some(key) = &self.api_key {
            url.push_str("&key=");
            url.push_str(&urlencoding::encode(key));
        }
        url
    }

    async fn fetch_volumes(&self, query: &str, limit: usize) -> PortResult<Vec<Volume>> {
        let url = self.volumes_url(query, limit);
        debug!(query, "querying remote catalog");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| PortError::Unexpected(format!("catalog request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PortError::Unexpected(format!(
                "catalog returned status {status}"
            )));
        }

        let body: VolumesResponse = response
            .json()
            .await
            .map_err(|e| PortError::Unexpected(format!("malformed catalog response: {e}")))?;

        Ok(body.items.unwrap_or_default())
    }
}

#[async_trait]
impl BookCatalog for GoogleBooksAdapter {
    async fn find_by_isbn(&self, isbn: &str) -> PortResult<Option<Book>> {
        let volumes = self.fetch_volumes(&format!("isbn:{isbn}"), 1).await?;
        Ok(volumes.into_iter().next().map(shape_volume))
    }

    async fn search(&self, query: &str, limit: usize) -> PortResult<Vec<Book>> {
        let volumes = self.fetch_volumes(query, limit).await?;
        Ok(volumes.into_iter().take(limit).map(shape_volume).collect())
    }
}

//=========================================================================================
// "Impure" Upstream Record Structs
//=========================================================================================

// Every field the upstream may omit is an Option here; the defaulting
// rules live in `shape_volume`, not in ad hoc fallback chains at the
// call sites.

#[derive(Deserialize)]
struct VolumesResponse {
    items: Option<Vec<Volume>>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct Volume {
    volume_info: Option<VolumeInfo>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct VolumeInfo {
    title: Option<String>,
    authors: Option<Vec<String>>,
    publisher: Option<String>,
    published_date: Option<String>,
    description: Option<String>,
    image_links: Option<ImageLinks>,
    industry_identifiers: Option<Vec<IndustryIdentifier>>,
}

#[derive(Deserialize, Default)]
struct ImageLinks {
    thumbnail: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct IndustryIdentifier {
    #[serde(rename = "type")]
    kind: Option<String>,
    identifier: Option<String>,
}

//=========================================================================================
// Result Shaping
//=========================================================================================

/// Maps one upstream volume into the canonical record.
///
/// Defaulting rules: title falls back to a fixed placeholder, authors to a
/// single-element placeholder list, the ISBN prefers an explicit ISBN_13
/// identifier then ISBN_10 then empty, and a `http:` thumbnail scheme is
/// rewritten to `https:` unconditionally.
fn shape_volume(volume: Volume) -> Book {
    let info = volume.volume_info.unwrap_or_default();

    let identifiers: Vec<Identifier> = info
        .industry_identifiers
        .unwrap_or_default()
        .into_iter()
        .filter_map(|id| {
            Some(Identifier {
                kind: id.kind?,
                value: id.identifier?,
            })
        })
        .collect();

    let isbn = identifiers
        .iter()
        .find(|id| id.kind == "ISBN_13")
        .or_else(|| identifiers.iter().find(|id| id.kind == "ISBN_10"))
        .map(|id| id.value.clone())
        .unwrap_or_default();

    let thumbnail = info
        .image_links
        .and_then(|links| links.thumbnail)
        .map(|url| match url.strip_prefix("http://") {
            Some(rest) => format!("https://{rest}"),
            None => url,
        });

    Book {
        isbn,
        title: info.title.unwrap_or_else(|| TITLE_PLACEHOLDER.to_string()),
        authors: info
            .authors
            .filter(|authors| !authors.is_empty())
            .unwrap_or_else(|| vec![AUTHOR_PLACEHOLDER.to_string()]),
        publisher: info.publisher,
        published_date: info.published_date,
        description: info.description,
        thumbnail,
        identifiers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn volume_from(value: serde_json::Value) -> Volume {
        serde_json::from_value(value).expect("fixture should deserialize")
    }

    #[test]
    fn shapes_a_fully_populated_volume() {
        let book = shape_volume(volume_from(json!({
            "volumeInfo": {
                "title": "The Rust Programming Language",
                "authors": ["Steve Klabnik", "Carol Nichols"],
                "publisher": "No Starch Press",
                "publishedDate": "2019-08-06",
                "description": "The official book.",
                "imageLinks": { "thumbnail": "https://books.example/cover.jpg" },
                "industryIdentifiers": [
                    { "type": "ISBN_10", "identifier": "1718500440" },
                    { "type": "ISBN_13", "identifier": "9781718500440" }
                ]
            }
        })));

        assert_eq!(book.isbn, "9781718500440");
        assert_eq!(book.title, "The Rust Programming Language");
        assert_eq!(book.authors.len(), 2);
        assert_eq!(book.publisher.as_deref(), Some("No Starch Press"));
        assert_eq!(book.identifiers.len(), 2);
    }

    #[test]
    fn prefers_isbn13_falls_back_to_isbn10_then_empty() {
        let only_10 = shape_volume(volume_from(json!({
            "volumeInfo": {
                "title": "Old Edition",
                "industryIdentifiers": [
                    { "type": "ISBN_10", "identifier": "0134190440" }
                ]
            }
        })));
        assert_eq!(only_10.isbn, "0134190440");

        let none = shape_volume(volume_from(json!({
            "volumeInfo": { "title": "Serialized Magazine" }
        })));
        assert_eq!(none.isbn, "");
    }

    #[test]
    fn missing_title_and_authors_get_placeholders() {
        let book = shape_volume(volume_from(json!({ "volumeInfo": {} })));
        assert_eq!(book.title, "Unknown Title");
        assert_eq!(book.authors, vec!["Unknown Author".to_string()]);

        let empty_authors = shape_volume(volume_from(json!({
            "volumeInfo": { "title": "Anthology", "authors": [] }
        })));
        assert_eq!(empty_authors.authors, vec!["Unknown Author".to_string()]);
    }

    #[test]
    fn thumbnail_scheme_is_upgraded_to_https() {
        let book = shape_volume(volume_from(json!({
            "volumeInfo": {
                "title": "X",
                "imageLinks": { "thumbnail": "http://example.com/x.jpg" }
            }
        })));
        assert_eq!(book.thumbnail.as_deref(), Some("https://example.com/x.jpg"));
    }

    #[test]
    fn volume_without_volume_info_still_shapes() {
        let book = shape_volume(volume_from(json!({})));
        assert_eq!(book.title, "Unknown Title");
        assert!(book.identifiers.is_empty());
        assert!(book.thumbnail.is_none());
    }

    #[test]
    fn api_key_is_appended_and_query_encoded() {
        let adapter = GoogleBooksAdapter::new(
            reqwest::Client::new(),
            "https://catalog.example/volumes".to_string(),
            Some("secret".to_string()),
        );
        let url = adapter.volumes_url("isbn:9780134190440", 1);
        assert_eq!(
            url,
            "https://catalog.example/volumes?q=isbn%3A9780134190440&maxResults=1&key=secret"
        );

        let no_key = GoogleBooksAdapter::new(
            reqwest::Client::new(),
            "https://catalog.example/volumes".to_string(),
            None,
        );
        assert_eq!(
            no_key.volumes_url("harry potter", 10),
            "https://catalog.example/volumes?q=harry%20potter&maxResults=10"
        );
    }
}
