//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{GoogleBooksAdapter, MemoryCacheAdapter, PgCacheAdapter, RxingDecoderAdapter},
    config::Config,
    error::ApiError,
    web::{
        health_handler, lookup_handler, rest::ApiDoc, scan_handler, state::AppState,
    },
};
use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        Method,
    },
    routing::{get, post},
    Router,
};
use bookscan_core::lookup::LookupService;
use bookscan_core::ports::BookCache;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Set Up the Cache Store ---
    let cache: Arc<dyn BookCache> = match &config.database_url {
        Some(database_url) => {
            info!("Connecting to database...");
            let db_pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(database_url)
                .await?;
            let adapter = PgCacheAdapter::new(db_pool);
            info!("Running database migrations...");
            adapter.run_migrations().await?;
            info!("Database migrations complete.");
            Arc::new(adapter)
        }
        None => {
            warn!("DATABASE_URL not set; using in-memory cache (entries die with the process)");
            Arc::new(MemoryCacheAdapter::new())
        }
    };

    // --- 3. Initialize Service Adapters ---
    let catalog = Arc::new(GoogleBooksAdapter::new(
        reqwest::Client::new(),
        config.catalog_endpoint.clone(),
        config.catalog_api_key.clone(),
    ));
    let decoder = Arc::new(RxingDecoderAdapter::new());
    let lookup = LookupService::new(cache, catalog);

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        lookup,
        decoder,
        config: config.clone(),
    });

    // The classroom UI is a browser app on another origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT]);

    // --- 5. Create the Web Router ---
    let api_router = Router::new()
        .route("/health", get(health_handler))
        .route("/lookup", get(lookup_handler))
        .route("/scan", post(scan_handler))
        // Camera frames arrive as whole encoded images.
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
        .layer(cors)
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
