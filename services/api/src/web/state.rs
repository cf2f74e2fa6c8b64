//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use bookscan_core::lookup::LookupService;
use bookscan_core::ports::BarcodeDecoder;
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
///
/// The lookup service already carries its cache and catalog ports; the
/// decoder is held separately because only the scan path needs it.
#[derive(Clone)]
pub struct AppState {
    pub lookup: LookupService,
    pub decoder: Arc<dyn BarcodeDecoder>,
    pub config: Arc<Config>,
}
