use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::AppState;

/// Build the application router with all routes
pub fn build(state: Arc<AppState>, static_dir: &str) -> Router {
    let max_upload_bytes = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(handlers::healthcheck))
        // Configuration routes
        .route("/upload", post(handlers::configs::upload_config))
        .route("/parse/:config_id", get(handlers::configs::get_parsed_config))
        .route("/configs", get(handlers::configs::list_configs))
        .route("/config/:config_id", delete(handlers::configs::delete_config))
        .route("/sample-config", get(handlers::configs::get_sample_config))
        // Diagram routes
        .route("/diagram/:config_id", get(handlers::diagrams::get_diagram))
        .route("/diagrams/:config_id", get(handlers::diagrams::get_all_diagrams))
        .route("/mermaid/:config_id", get(handlers::diagrams::get_mermaid_diagrams))
        .route(
            "/mermaid/:config_id/:diagram_type",
            get(handlers::diagrams::get_mermaid_diagram),
        )
        // Static files (frontend)
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback_service(
            ServeDir::new(static_dir).fallback(ServeFile::new(format!("{}/index.html", static_dir))),
        )
        // Add state and middleware
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
