//! Preset registry: short codes, default storefronts, palettes and themes.
//!
//! The codec uses the registry to leave redundant data out of share tokens:
//! a preset code stands in for its storefront identifier, and palette entries
//! equal to the industry baseline are not stored at all. The same tables
//! drive the rendered theme, so anything the encoder omits resolves to what
//! the viewer actually sees.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{Palette, Theme};

/// Short code for a preset storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PresetKey {
    #[serde(rename = "m")]
    Mobile,
    #[serde(rename = "g")]
    Gaming,
    #[serde(rename = "e")]
    Ecommerce,
    #[serde(rename = "s")]
    Saas,
}

impl PresetKey {
    /// All presets, in registry order.
    pub const ALL: [Self; 4] = [Self::Mobile, Self::Gaming, Self::Ecommerce, Self::Saas];

    /// The one-letter code stored in share tokens.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Mobile => "m",
            Self::Gaming => "g",
            Self::Ecommerce => "e",
            Self::Saas => "s",
        }
    }

    /// Look a preset up by its code.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.code() == code)
    }

    /// Storefront identifier the preset stands for.
    #[must_use]
    pub const fn storefront(self) -> &'static str {
        match self {
            Self::Mobile => "maguero.test.onfastspring.com/popup-mobile-demo",
            Self::Gaming => "maguero.test.onfastspring.com/popup-gaming-demo",
            Self::Ecommerce => "maguero.test.onfastspring.com/popup-ecommerce-demo",
            Self::Saas => "maguero.test.onfastspring.com/popup-saas-demo",
        }
    }

    /// Industry key the preset belongs to.
    #[must_use]
    pub const fn industry(self) -> &'static str {
        match self {
            Self::Mobile => "mobile",
            Self::Gaming => "gaming",
            Self::Ecommerce => "ecommerce",
            Self::Saas => "saas",
        }
    }

    /// Find the preset whose storefront identifier equals `storefront_id`.
    #[must_use]
    pub fn for_storefront(storefront_id: &str) -> Option<Self> {
        let wanted = storefront_id.trim();
        Self::ALL.into_iter().find(|k| k.storefront() == wanted)
    }
}

impl fmt::Display for PresetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::str::FromStr for PresetKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| format!("unknown preset: {s}"))
    }
}

// =============================================================================
// Colour tables
// =============================================================================

/// Static colour set for one industry.
struct Swatch {
    primary: &'static str,
    accent: &'static str,
    nav: &'static str,
    background: &'static str,
    text: &'static str,
}

impl Swatch {
    fn theme(&self) -> Theme {
        Theme {
            primary: self.primary.to_string(),
            accent: self.accent.to_string(),
            nav: self.nav.to_string(),
            background: self.background.to_string(),
            text: self.text.to_string(),
        }
    }
}

const GAMING: Swatch = Swatch {
    primary: "#0b1020",
    accent: "#22d3ee",
    nav: "#0b1020",
    background: "#ffffff",
    text: "#0f172a",
};

const MOBILE: Swatch = Swatch {
    primary: "#0f172a",
    accent: "#22c55e",
    nav: "#0f172a",
    background: "#ffffff",
    text: "#0f172a",
};

const RETAIL: Swatch = Swatch {
    primary: "#1f2937",
    accent: "#f59e0b",
    nav: "#1f2937",
    background: "#ffffff",
    text: "#0f172a",
};

const SAAS: Swatch = Swatch {
    primary: "#0f172a",
    accent: "#6366f1",
    nav: "#0f172a",
    background: "#ffffff",
    text: "#0f172a",
};

const FINTECH: Swatch = Swatch {
    primary: "#0b132b",
    accent: "#2ec4b6",
    nav: "#0b132b",
    background: "#ffffff",
    text: "#0f172a",
};

const DEFAULT: Swatch = Swatch {
    primary: "#0f172a",
    accent: "#22c55e",
    nav: "#0f172a",
    background: "#ffffff",
    text: "#0f172a",
};

fn swatch(industry_key: &str) -> Option<&'static Swatch> {
    match industry_key {
        "gaming" => Some(&GAMING),
        "mobile" => Some(&MOBILE),
        "ecommerce" | "retail" => Some(&RETAIL),
        "saas" => Some(&SAAS),
        "fintech" => Some(&FINTECH),
        _ => None,
    }
}

/// Baseline palette for an industry key, if the industry is known.
///
/// Palette entries equal to the baseline are left out of share tokens.
#[must_use]
pub fn baseline_palette(industry_key: &str) -> Option<Palette> {
    swatch(industry_key).map(|s| s.theme().palette())
}

/// Theme for an industry key; unknown industries get the default theme.
#[must_use]
pub fn industry_theme(industry_key: &str) -> Theme {
    swatch(industry_key).unwrap_or(&DEFAULT).theme()
}
