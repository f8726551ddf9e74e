//! The shareable demo configuration.

use serde::{Deserialize, Serialize};

use crate::presets::{self, PresetKey};
use crate::types::{Industry, Palette, Theme};

/// Brand identity shown by the demo.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Brand {
    pub company_name: String,
    pub logo_url: String,
    pub palette: Palette,
}

/// A complete demo definition: industry, storefront, brand and toggles.
///
/// Built by the builder page, serialised once into a share link and decoded
/// once per load of the viewing route. The JSON form (camelCase) is also the
/// legacy long-form share token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Configuration {
    pub industry: Industry,
    pub storefront_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset_key: Option<PresetKey>,
    pub brand: Brand,
    pub banner: bool,
    pub debug: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            industry: Industry::default(),
            storefront_id: String::new(),
            preset_key: None,
            brand: Brand::default(),
            banner: true,
            debug: false,
        }
    }
}

impl Configuration {
    /// Start a configuration for an industry and storefront.
    #[must_use]
    pub fn new(industry: impl Into<Industry>, storefront_id: impl Into<String>) -> Self {
        Self {
            industry: industry.into(),
            storefront_id: storefront_id.into(),
            ..Self::default()
        }
    }

    /// Start a configuration from a preset: its industry and storefront.
    #[must_use]
    pub fn from_preset(key: PresetKey) -> Self {
        Self {
            industry: Industry::new(key.industry()),
            storefront_id: key.storefront().to_string(),
            preset_key: Some(key),
            ..Self::default()
        }
    }

    /// The preset this configuration points at, if any.
    ///
    /// An explicit `preset_key` wins; otherwise the storefront identifier is
    /// matched against the registry.
    #[must_use]
    pub fn effective_preset(&self) -> Option<PresetKey> {
        self.preset_key
            .or_else(|| PresetKey::for_storefront(&self.storefront_id))
    }

    /// Fill what a decoded configuration leaves implicit.
    ///
    /// - a blank industry becomes the default industry
    /// - a blank storefront is synthesised from the preset, if any
    /// - palette entries left out are filled from the industry baseline
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if self.industry.is_blank() {
            self.industry = Industry::default();
        }
        if self.storefront_id.trim().is_empty() {
            if let Some(key) = self.preset_key {
                self.storefront_id = key.storefront().to_string();
            }
        }
        if let Some(baseline) = presets::baseline_palette(&self.industry.key()) {
            self.brand.palette = baseline.merged(&self.brand.palette);
        }
        self
    }

    /// Theme the demo renders with: the industry theme plus the brand palette.
    #[must_use]
    pub fn theme(&self) -> Theme {
        presets::industry_theme(&self.industry.key()).with_overrides(&self.brand.palette)
    }
}
