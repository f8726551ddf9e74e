//! Builder settings and where they come from.
//!
//! On the viewing route with a decodable fragment, settings come from the
//! shared configuration and are locked: edits are not persisted. Everywhere
//! else they are read from (and written back to) a key-value store.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::codec;
use crate::presets::{self, PresetKey};
use crate::types::{Brand, Configuration, Industry, Layout, Palette, Theme};

/// Storage keys, one per setting.
pub mod keys {
    pub const STOREFRONT_ID: &str = "fs.storefrontId";
    pub const INDUSTRY: &str = "fs.industry";
    pub const COMPANY_NAME: &str = "fs.companyName";
    pub const LOGO_URL: &str = "fs.logoUrl";
    pub const LOGO_DATA_URL: &str = "fs.logoDataUrl";
    pub const PALETTE: &str = "fs.palette";
    pub const SHOW_BANNER: &str = "fs.showBanner";
}

/// String key-value storage (`localStorage` in the browser).
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// In-memory [`KeyValueStore`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore(BTreeMap<String, String>);

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.0.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.0.insert(key.to_string(), value.to_string());
    }
}

/// Everything the builder lets a user change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoSettings {
    pub storefront_id: String,
    pub industry: Industry,
    pub company_name: String,
    pub logo_url: String,
    /// Uploaded logo as a data URL; never part of a share link.
    pub logo_data_url: String,
    pub palette: Palette,
    pub banner: bool,
    pub debug: bool,
    preset_key: Option<PresetKey>,
    locked: bool,
}

impl Default for DemoSettings {
    fn default() -> Self {
        Self {
            storefront_id: String::new(),
            industry: Industry::default(),
            company_name: String::new(),
            logo_url: String::new(),
            logo_data_url: String::new(),
            palette: Palette::default(),
            banner: true,
            debug: false,
            preset_key: None,
            locked: false,
        }
    }
}

/// A partial edit from the builder form; absent fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsUpdate {
    pub storefront_id: Option<String>,
    pub industry: Option<String>,
    pub company_name: Option<String>,
    pub logo_url: Option<String>,
    pub logo_data_url: Option<String>,
    pub palette: Option<Palette>,
    pub banner: Option<bool>,
    pub debug: Option<bool>,
}

impl DemoSettings {
    /// Unlocked default settings pointing at `storefront_id`.
    #[must_use]
    pub fn for_storefront(storefront_id: impl Into<String>) -> Self {
        Self {
            storefront_id: storefront_id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_industry(mut self, industry: Industry) -> Self {
        self.industry = industry;
        self
    }

    /// Load settings for a page at `path` with fragment `hash`.
    #[must_use]
    pub fn open<S: KeyValueStore>(path: &str, hash: &str, store: &S) -> Self {
        if path.contains("/demo") {
            if let Some(cfg) = codec::decode(hash) {
                debug!(industry = %cfg.industry, "settings locked by share link");
                return Self::from_configuration(cfg);
            }
        }
        Self::from_store(store)
    }

    /// Locked settings reproducing a shared configuration.
    #[must_use]
    pub fn from_configuration(cfg: Configuration) -> Self {
        Self {
            storefront_id: cfg.storefront_id,
            industry: cfg.industry,
            company_name: cfg.brand.company_name,
            logo_url: cfg.brand.logo_url,
            logo_data_url: String::new(),
            palette: cfg.brand.palette,
            banner: cfg.banner,
            debug: cfg.debug,
            preset_key: cfg.preset_key,
            locked: true,
        }
    }

    /// Settings read from `store`; missing keys take their defaults.
    #[must_use]
    pub fn from_store<S: KeyValueStore>(store: &S) -> Self {
        let text = |key: &str| store.get(key).unwrap_or_default();
        let industry = store
            .get(keys::INDUSTRY)
            .filter(|v| !v.trim().is_empty())
            .map(Industry::new)
            .unwrap_or_default();
        let palette = store
            .get(keys::PALETTE)
            .and_then(|json| serde_json::from_str::<Option<Palette>>(&json).ok())
            .flatten()
            .unwrap_or_default();
        let banner = store.get(keys::SHOW_BANNER).is_none_or(|v| v == "true");

        Self {
            storefront_id: text(keys::STOREFRONT_ID),
            industry,
            company_name: text(keys::COMPANY_NAME),
            logo_url: text(keys::LOGO_URL),
            logo_data_url: text(keys::LOGO_DATA_URL),
            palette,
            banner,
            ..Self::default()
        }
    }

    /// Write every setting to `store`, unless locked by a share link.
    pub fn persist<S: KeyValueStore>(&self, store: &mut S) {
        if self.locked {
            return;
        }
        let industry = if self.industry.is_blank() {
            Industry::DEFAULT
        } else {
            self.industry.as_str()
        };
        let palette = serde_json::to_string(&self.palette).unwrap_or_else(|_| "{}".to_string());

        store.set(keys::STOREFRONT_ID, &self.storefront_id);
        store.set(keys::INDUSTRY, industry);
        store.set(keys::COMPANY_NAME, &self.company_name);
        store.set(keys::LOGO_URL, &self.logo_url);
        store.set(keys::LOGO_DATA_URL, &self.logo_data_url);
        store.set(keys::PALETTE, &palette);
        store.set(keys::SHOW_BANNER, if self.banner { "true" } else { "false" });
    }

    /// Apply a builder edit. Returns `true` if the storefront changed.
    ///
    /// Locked settings still change in memory; they are just never persisted.
    pub fn apply(&mut self, update: SettingsUpdate) -> bool {
        let SettingsUpdate {
            storefront_id,
            industry,
            company_name,
            logo_url,
            logo_data_url,
            palette,
            banner,
            debug,
        } = update;

        let storefront_changed = storefront_id
            .as_ref()
            .is_some_and(|id| id.trim() != self.storefront_id);
        if let Some(id) = storefront_id {
            self.storefront_id = id.trim().to_string();
            self.preset_key = None;
        }
        if let Some(industry) = industry {
            self.industry = Industry::new(industry);
        }
        if let Some(name) = company_name {
            self.company_name = name;
        }
        if let Some(url) = logo_url {
            self.logo_url = url;
        }
        if let Some(data) = logo_data_url {
            self.logo_data_url = data;
        }
        if let Some(palette) = palette {
            self.palette = palette;
        }
        if let Some(banner) = banner {
            self.banner = banner;
        }
        if let Some(debug) = debug {
            self.debug = debug;
        }
        storefront_changed
    }

    /// Returns `true` if the settings came from a share link.
    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.locked
    }

    /// Logo to render: an uploaded image wins over a URL.
    #[must_use]
    pub fn logo_src(&self) -> &str {
        if self.logo_data_url.is_empty() {
            &self.logo_url
        } else {
            &self.logo_data_url
        }
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        presets::industry_theme(&self.industry.key()).with_overrides(&self.palette)
    }

    #[must_use]
    pub fn layout(&self) -> Layout {
        self.industry.layout()
    }

    /// The shareable configuration for these settings.
    #[must_use]
    pub fn configuration(&self) -> Configuration {
        let preset_key = self
            .preset_key
            .or_else(|| PresetKey::for_storefront(&self.storefront_id));
        Configuration {
            industry: self.industry.clone(),
            storefront_id: self.storefront_id.clone(),
            preset_key,
            brand: Brand {
                company_name: self.company_name.clone(),
                logo_url: self.logo_url.clone(),
                palette: self.palette.clone(),
            },
            banner: self.banner,
            debug: self.debug,
        }
    }
}
