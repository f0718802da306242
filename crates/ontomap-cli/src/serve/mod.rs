//! HTTP API server for uploads, bulk builds and ontology browsing.
//!
//! # Module Structure
//!
//! - `handlers` - HTTP route handlers
//! - `models` - API request/response types (DTOs)
//! - `error` - service error to status code mapping

mod error;
mod handlers;
mod models;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use ontomap_core::OntologyService;

// =============================================================================
// Application State
// =============================================================================

/// Shared application state for the server.
pub struct AppState {
    pub service: Arc<OntologyService>,
}

// =============================================================================
// Server Configuration
// =============================================================================

/// Bind address for the server.
pub struct ServeConfig {
    pub host: String,
    pub port: u16,
}

// =============================================================================
// Router
// =============================================================================

/// Build the API router around `service`.
pub fn router(service: Arc<OntologyService>) -> Router {
    let body_limit = usize::try_from(service.config().server.max_upload_size).unwrap_or(usize::MAX);
    let state = Arc::new(AppState { service });

    Router::new()
        .route("/", get(handlers::index))
        .route("/api/v1/upload_data", post(handlers::upload_data))
        .route("/api/v1/build_hybrid_ontology", post(handlers::build_hybrid_ontology))
        .route("/api/v1/map", post(handlers::map_texts))
        .route("/api/v1/get_hybrid_ontology", get(handlers::get_hybrid_ontology))
        .route("/api/v1/list_ontologies", get(handlers::list_ontologies))
        .route("/api/v1/ontologies/{id}", delete(handlers::delete_ontology))
        .route("/api/v1/get_ontology_graph/{id}", get(handlers::get_ontology_graph))
        .route(
            "/api/v1/get_merged_ontology_graph",
            get(handlers::get_merged_ontology_graph),
        )
        // Multipart overhead on top of the file itself.
        .layer(DefaultBodyLimit::max(body_limit.saturating_add(1024 * 1024)))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

// =============================================================================
// Server Entry Point
// =============================================================================

/// Start the API server and run until the process is stopped.
pub async fn start_server(
    service: Arc<OntologyService>,
    config: ServeConfig,
) -> color_eyre::Result<()> {
    let app = router(service);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(%addr, "ontomap API listening");
    println!("Ontomap API: http://{}", addr);
    println!("Press Ctrl+C to stop\n");

    axum::serve(listener, app).await?;

    Ok(())
}
