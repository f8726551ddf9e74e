//! HTTP route handlers for the server.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Builder page
//! GET  /demo                    - Demo page (configuration read from the fragment)
//! GET  /purchase_success        - Thank-you page (?orderId=)
//!
//! # API
//! POST /api/share               - Configuration JSON -> { hash, url }
//! GET  /api/share/resolve       - ?hash= -> { found, config, theme, layout }
//! GET  /api/presets             - Preset list
//! GET  /api/presets/{code}      - One preset
//! ```

pub mod api;
pub mod pages;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the JSON API router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/share", post(api::share::create))
        .route("/share/resolve", get(api::share::resolve))
        .route("/presets", get(api::presets::index))
        .route("/presets/{code}", get(api::presets::show))
}

/// Create all routes for the server.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::builder))
        .route("/demo", get(pages::demo))
        .route("/purchase_success", get(pages::purchase_success))
        .nest("/api", api_routes())
}
