//! Popup demo server library.
//!
//! Serves the builder, demo and purchase-success pages, the share-link API
//! and the wasm bundle. Exposed as a library so the router can be tested
//! without binding a socket.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;
pub mod telemetry;

use axum::{Router, middleware::from_fn, routing::get};
use tower_http::{services::ServeDir, trace::TraceLayer};

use state::AppState;

/// Build the application router (without the Sentry layers).
pub fn app(state: AppState) -> Router {
    let static_dir = state.config().static_dir.clone();

    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .nest_service("/pkg", ServeDir::new(static_dir))
        .with_state(state)
        .layer(from_fn(middleware::request_id_middleware))
        .layer(TraceLayer::new_for_http())
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
