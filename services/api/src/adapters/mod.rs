pub mod barcode;
pub mod google_books;
pub mod kv;

pub use barcode::RxingDecoderAdapter;
pub use google_books::GoogleBooksAdapter;
pub use kv::{MemoryCacheAdapter, PgCacheAdapter};
