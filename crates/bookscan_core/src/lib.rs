pub mod domain;
pub mod isbn;
pub mod lookup;
pub mod ports;

pub use domain::{Book, CachedBook, DecodedSymbol, Identifier, SymbolFormat};
pub use lookup::{LookupError, LookupRequest, LookupResponse, LookupService};
pub use ports::{BarcodeDecoder, BookCache, BookCatalog, PortError, PortResult};
