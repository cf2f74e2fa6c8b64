//! services/api/src/bin/openapi.rs
//!
//! Dumps the OpenAPI document for the book-scan REST surface so the
//! classroom UI can generate a typed client without a running server.

use api_lib::web::rest::ApiDoc;
use utoipa::OpenApi;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // An alternate output path may be given as the first argument.
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "openapi.json".to_string());
    let spec = ApiDoc::openapi().to_pretty_json()?;
    std::fs::write(&path, spec)?;
    println!("wrote OpenAPI document to {path}");
    Ok(())
}
