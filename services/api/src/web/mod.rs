pub mod rest;
pub mod state;

// Re-export the handlers to make them easily accessible to the binary
// that will build the web server router.
pub use rest::{health_handler, lookup_handler, scan_handler};
