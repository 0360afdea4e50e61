//! API module
//!
//! Contains the HTTP handlers and the router that wires them together

pub mod chat;
pub mod health;
pub mod middleware;

use axum::{
    routing::{any, get},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::SharedState;

/// Build the application router
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/api/health", get(health::health_check))
        // Every method reaches the relay; it answers non-POST with 405
        .route("/api/chat", any(chat::relay_chat))
        // Middleware (order matters - request_id should be first)
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(CorsLayer::permissive()) // Allow CORS for development
        .with_state(state)
}
