pub mod health;
pub mod metrics;
pub mod scan;
pub mod wines;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;

/// API routes with the standard middleware stack.
///
/// `/metrics` is mounted separately by the binary since it needs the
/// Prometheus handle.
pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/scan_wine", post(scan::scan_wine))
        .route("/add_wine", post(wines::add_wine))
        .route("/list_wines", get(wines::list_wines))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_upload_bytes))
}
