//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! The level API lives under `/api`. Every other path falls through to the
//! static public directory, which holds the editor bundle and its assets.

pub mod levels;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Full application router: API routes plus the static fallback.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let public = ServeDir::new(&state.config.public_dir).append_index_html_on_directories(true);

    Router::new()
        .route("/api/levels", get(levels::list_levels))
        .route("/api/save-level", post(levels::save_level))
        .route("/healthz", get(healthz))
        .fallback_service(public)
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
