//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! | Variable | Default | Purpose |
//! |----------|---------|---------|
//! | `DEMO_HOST` | `127.0.0.1` | Bind address |
//! | `DEMO_PORT` | `3000` | Bind port |
//! | `DEMO_BASE_URL` | required | Public origin share links are built on |
//! | `DEMO_STATIC_DIR` | `crates/web/pkg` | wasm bundle served under `/pkg` |
//! | `SHARE_CACHE_CAPACITY` | `1024` | Resolved share links kept in memory |
//! | `SENTRY_DSN` | unset | Enables error tracking |
//! | `SENTRY_ENVIRONMENT` | unset | Sentry environment tag |
//! | `SENTRY_SAMPLE_RATE` | `1.0` | Error event sample rate |
//! | `SENTRY_TRACES_SAMPLE_RATE` | `0.1` | Transaction sample rate |

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;
use url::Url;

/// Error loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Public origin; share links are `<base_url>/demo#v3_...`.
    pub base_url: Url,
    pub static_dir: PathBuf,
    pub share_cache_capacity: u64,
    pub sentry_dsn: Option<String>,
    pub sentry_environment: Option<String>,
    pub sentry_sample_rate: f32,
    pub sentry_traces_sample_rate: f32,
}

impl StorefrontConfig {
    /// Load configuration from the process environment (and `.env`, if any).
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a value does not
    /// parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its
    /// value.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a value does not
    /// parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(lookup);

        let base_url = env.required("DEMO_BASE_URL")?;
        let base_url = Url::parse(&base_url)
            .map_err(|e| ConfigError::InvalidEnvVar("DEMO_BASE_URL".to_string(), e.to_string()))?;

        Ok(Self {
            host: env.parsed_or("DEMO_HOST", IpAddr::from([127, 0, 0, 1]))?,
            port: env.parsed_or("DEMO_PORT", 3000)?,
            base_url,
            static_dir: env.or_default("DEMO_STATIC_DIR", "crates/web/pkg").into(),
            share_cache_capacity: env.parsed_or("SHARE_CACHE_CAPACITY", 1024)?,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: env.parsed_or("SENTRY_SAMPLE_RATE", 1.0)?,
            sentry_traces_sample_rate: env.parsed_or("SENTRY_TRACES_SAMPLE_RATE", 0.1)?,
        })
    }

    /// Get the socket address for binding.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    /// A set, non-blank variable.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    fn parsed_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.optional(key).map_or(Ok(default), |raw| {
            raw.trim()
                .parse()
                .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("DEMO_BASE_URL", "https://demo.example.com")]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.static_dir, PathBuf::from("crates/web/pkg"));
        assert_eq!(config.share_cache_capacity, 1024);
        assert!(config.sentry_dsn.is_none());
        assert!((config.sentry_traces_sample_rate - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn test_missing_base_url() {
        let err = load(&[]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(key) if key == "DEMO_BASE_URL"));
    }

    #[test]
    fn test_invalid_values() {
        let err = load(&[("DEMO_BASE_URL", "not a url")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "DEMO_BASE_URL"));

        let err = load(&[
            ("DEMO_BASE_URL", "https://demo.example.com"),
            ("DEMO_PORT", "eighty"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "DEMO_PORT"));
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("DEMO_BASE_URL", "https://demo.example.com/app/"),
            ("DEMO_HOST", "0.0.0.0"),
            ("DEMO_PORT", "8080"),
            ("SHARE_CACHE_CAPACITY", "16"),
            ("SENTRY_DSN", "  "),
        ])
        .unwrap();
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(config.share_cache_capacity, 16);
        assert_eq!(config.base_url.path(), "/app/");
        assert!(config.sentry_dsn.is_none());
    }
}
