//! # Routes
//!
//! Router assembly for the HTTP surface.

use crate::api::rest::handlers::{
    get_average, get_quotes, get_slippage, health, not_found, service_info, AppState,
};
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Builds the application router with tracing and permissive CORS.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(service_info))
        .route("/quotes", get(get_quotes))
        .route("/average", get(get_average))
        .route("/slippage", get(get_slippage))
        .route("/health", get(health))
        .fallback(not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
