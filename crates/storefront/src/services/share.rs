//! Share links: encode a configuration into a `/demo#v3_...` URL, and resolve
//! a fragment back into the configuration, theme and layout it renders with.
//!
//! Resolutions are cached by the raw hash using `moka`; decoding is pure, so
//! entries never go stale and only capacity bounds the cache.

use std::sync::Arc;

use moka::future::Cache;
use popup_demo_core::{Configuration, Layout, Theme, codec};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

/// Error creating a share link.
#[derive(Debug, Error)]
pub enum ShareError {
    #[error("a storefront identifier or preset is required")]
    MissingStorefront,

    #[error("could not build share URL: {0}")]
    Url(#[from] url::ParseError),
}

/// A freshly created share link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareLink {
    /// Fragment including the leading `#`.
    pub hash: String,
    pub url: String,
}

/// What a share fragment renders as.
///
/// When the fragment does not decode, `found` is `false` and the rest
/// describes the default demo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub found: bool,
    pub config: Configuration,
    pub theme: Theme,
    pub layout: Layout,
}

impl Resolution {
    fn new(found: bool, config: Configuration) -> Self {
        Self {
            found,
            theme: config.theme(),
            layout: config.industry.layout(),
            config,
        }
    }
}

/// Creates and resolves share links.
#[derive(Clone)]
pub struct ShareService {
    base_url: Url,
    cache: Cache<String, Arc<Resolution>>,
}

impl ShareService {
    /// Create a service building links on `base_url`, caching up to
    /// `capacity` resolutions.
    #[must_use]
    pub fn new(base_url: Url, capacity: u64) -> Self {
        let cache = Cache::builder().max_capacity(capacity).build();
        Self { base_url, cache }
    }

    /// Encode `config` into a share link.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration names neither a storefront nor a
    /// preset, or the URL cannot be built.
    #[instrument(skip(self, config), fields(industry = %config.industry))]
    pub fn create(&self, config: &Configuration) -> Result<ShareLink, ShareError> {
        if config.storefront_id.trim().is_empty() && config.preset_key.is_none() {
            return Err(ShareError::MissingStorefront);
        }

        let url = codec::share_url(&self.base_url, config)?;
        let hash = codec::encode(config);
        debug!(len = hash.len(), "share link created");

        Ok(ShareLink {
            hash,
            url: url.to_string(),
        })
    }

    /// Resolve a share fragment (with or without the leading `#`).
    #[instrument(skip(self, hash), fields(len = hash.len()))]
    pub async fn resolve(&self, hash: &str) -> Arc<Resolution> {
        let key = hash.trim().to_string();
        self.cache
            .get_with(key.clone(), async move {
                let resolution = codec::decode(&key).map_or_else(
                    || Resolution::new(false, Configuration::default().normalized()),
                    |config| Resolution::new(true, config),
                );
                debug!(found = resolution.found, "share link resolved");
                Arc::new(resolution)
            })
            .await
    }

    /// Number of cached resolutions.
    #[must_use]
    pub fn cached(&self) -> u64 {
        self.cache.entry_count()
    }
}
