//! Industry key and layout selection.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Industry chosen for the demo (e.g. `gaming`, `saas`).
///
/// The raw string is kept as entered so share tokens reproduce it exactly;
/// lookups in the preset registry go through [`Industry::key`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Industry(String);

impl Industry {
    /// Industry used when nothing else is known.
    pub const DEFAULT: &'static str = "saas";

    /// Create an industry from any string.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The industry exactly as entered.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Normalised lookup key (trimmed, lower-case).
    #[must_use]
    pub fn key(&self) -> String {
        self.0.trim().to_lowercase()
    }

    /// Returns `true` if the industry string is blank.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Layout used to render this industry.
    #[must_use]
    pub fn layout(&self) -> Layout {
        Layout::for_industry(&self.key())
    }
}

impl Default for Industry {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl fmt::Display for Industry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Industry {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Industry {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Page layout a demo renders with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    Gaming,
    Mobile,
    EcommerceAv,
    #[default]
    Saas,
}

impl Layout {
    /// Pick the layout for a normalised industry key.
    ///
    /// Unknown industries render with the SaaS layout.
    #[must_use]
    pub fn for_industry(key: &str) -> Self {
        match key {
            "gaming" | "gaming store" => Self::Gaming,
            "mobile" | "mobile apps" => Self::Mobile,
            "ecommerce" | "audio" | "video" => Self::EcommerceAv,
            _ => Self::Saas,
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gaming => write!(f, "gaming"),
            Self::Mobile => write!(f, "mobile"),
            Self::EcommerceAv => write!(f, "ecommerce_av"),
            Self::Saas => write!(f, "saas"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_industry_key_normalises() {
        assert_eq!(Industry::new("  Gaming ").key(), "gaming");
        assert_eq!(Industry::new("  Gaming ").as_str(), "  Gaming ");
    }

    #[test]
    fn test_industry_default() {
        assert_eq!(Industry::default().as_str(), "saas");
        assert!(Industry::new("   ").is_blank());
    }

    #[test]
    fn test_layout_aliases() {
        assert_eq!(Industry::new("Gaming Store").layout(), Layout::Gaming);
        assert_eq!(Industry::new("mobile apps").layout(), Layout::Mobile);
        assert_eq!(Industry::new("audio").layout(), Layout::EcommerceAv);
        assert_eq!(Industry::new("video").layout(), Layout::EcommerceAv);
        assert_eq!(Industry::new("SaaS subscription").layout(), Layout::Saas);
    }

    #[test]
    fn test_layout_fallback() {
        assert_eq!(Industry::new("fintech").layout(), Layout::Saas);
        assert_eq!(Industry::new("").layout(), Layout::Saas);
    }
}
