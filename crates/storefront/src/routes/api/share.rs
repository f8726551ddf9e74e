//! Share-link API routes.

use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
};
use popup_demo_core::Configuration;
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::services::{Resolution, ShareLink};
use crate::state::AppState;

/// Query for resolving a share fragment.
#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    #[serde(default)]
    pub hash: String,
}

/// Create a share link for a configuration.
///
/// POST /api/share
///
/// # Errors
///
/// Returns 400 if the body is not a configuration, or names neither a
/// storefront nor a preset.
#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Configuration>, JsonRejection>,
) -> Result<Json<ShareLink>> {
    let Json(config) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let link = state.share().create(&config)?;
    Ok(Json(link))
}

/// Resolve a share fragment into the demo it renders.
///
/// GET /api/share/resolve?hash=
///
/// Unknown fragments resolve to the default demo with `found: false`.
#[instrument(skip(state, query))]
pub async fn resolve(
    State(state): State<AppState>,
    Query(query): Query<ResolveQuery>,
) -> Json<Resolution> {
    let resolution = state.share().resolve(&query.hash).await;
    Json(Resolution::clone(&resolution))
}
