//! Preset list API route.

use axum::{Json, extract::Path};
use popup_demo_core::{Configuration, Layout, PresetKey, Theme};
use serde::Serialize;

use crate::error::{AppError, Result};

/// A preset with the demo it renders.
#[derive(Debug, Clone, Serialize)]
pub struct PresetInfo {
    pub code: &'static str,
    pub industry: &'static str,
    pub storefront: &'static str,
    pub layout: Layout,
    pub theme: Theme,
}

impl From<PresetKey> for PresetInfo {
    fn from(key: PresetKey) -> Self {
        let config = Configuration::from_preset(key);
        Self {
            code: key.code(),
            industry: key.industry(),
            storefront: key.storefront(),
            layout: config.industry.layout(),
            theme: config.theme(),
        }
    }
}

/// List the presets.
///
/// GET /api/presets
pub async fn index() -> Json<Vec<PresetInfo>> {
    Json(PresetKey::ALL.into_iter().map(PresetInfo::from).collect())
}

/// Look up one preset by code.
///
/// GET /api/presets/{code}
///
/// # Errors
///
/// Returns 404 for an unknown code.
pub async fn show(Path(code): Path<String>) -> Result<Json<PresetInfo>> {
    PresetKey::from_code(&code)
        .map(|key| Json(PresetInfo::from(key)))
        .ok_or_else(|| AppError::NotFound(format!("preset {code}")))
}
