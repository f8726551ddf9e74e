//! Versioned, URL-safe share tokens for demo configurations.
//!
//! A share link is the viewing route with the token in its fragment:
//!
//! ```text
//! https://demo.example.com/demo#v3_N4IgliBcIOYIYFswDsYgDQgCZQGZwBsBnAU0wAcipYQBfIA
//!                               └┬┘ └──────────────── lz-string, URI-safe ───────┘
//!                              version
//! ```
//!
//! Decoding tries, in order: the `v3_` short form, a legacy lz-string
//! compressed long-form JSON, and a legacy base64 long-form JSON. Anything
//! else is "no configuration".

pub mod lz;
mod wire;

use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use thiserror::Error;
use url::Url;

use crate::types::Configuration;

/// Version tag prefixed to current tokens.
pub const VERSION_TAG: &str = "v3";

/// Route that renders a shared configuration.
pub const DEMO_ROUTE: &str = "demo";

const LEGACY_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Why a token did not decode.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("token is empty")]
    Empty,

    #[error("compressed payload is truncated or corrupt")]
    Decompress,

    #[error("payload is not a configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("token matches no known format")]
    Unrecognized,
}

/// Encode a configuration into a URL fragment (`#v3_…`).
///
/// Palette entries equal to the industry baseline and a storefront the
/// preset already implies are left out.
#[must_use]
pub fn encode(cfg: &Configuration) -> String {
    format!("#{}", token(cfg))
}

/// The fragment without its leading `#`.
#[must_use]
pub fn token(cfg: &Configuration) -> String {
    let short = wire::to_short(cfg);
    // Serialising plain structs of strings cannot fail.
    let json = serde_json::to_string(&short).unwrap_or_default();
    format!("{VERSION_TAG}_{}", lz::compress_to_uri(&json))
}

/// Decode a fragment (with or without `#`), reporting why it failed.
///
/// # Errors
///
/// Returns a [`CodecError`] when the input is empty, corrupt, or in no
/// known format.
pub fn try_decode(hash: &str) -> Result<Configuration, CodecError> {
    let raw = hash.strip_prefix('#').unwrap_or(hash);
    if raw.is_empty() {
        return Err(CodecError::Empty);
    }

    if let Some(body) = raw.strip_prefix(VERSION_TAG).and_then(|r| r.strip_prefix('_')) {
        let json = lz::decompress_from_uri(body)
            .filter(|j| !j.is_empty())
            .ok_or(CodecError::Decompress)?;
        let short = serde_json::from_str(&json)?;
        return Ok(wire::from_short(short).normalized());
    }

    decode_legacy(raw)
        .map(Configuration::normalized)
        .ok_or(CodecError::Unrecognized)
}

/// Decode a fragment; any failure means "no configuration".
#[must_use]
pub fn decode(hash: &str) -> Option<Configuration> {
    match try_decode(hash) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            tracing::debug!(error = %e, "share token did not decode");
            None
        }
    }
}

fn decode_legacy(raw: &str) -> Option<Configuration> {
    let from_lz = lz::decompress_from_uri(raw)
        .filter(|j| !j.is_empty())
        .and_then(|j| serde_json::from_str(&j).ok());
    if from_lz.is_some() {
        return from_lz;
    }

    let bytes = LEGACY_BASE64.decode(raw).ok()?;
    let json = String::from_utf8(bytes).ok()?;
    serde_json::from_str(&json).ok()
}

/// Build the full share link for `cfg` under `base`.
///
/// `base` should end with `/` so the viewing route is joined beneath it.
///
/// # Errors
///
/// Returns an error if the viewing route cannot be joined onto `base`.
pub fn share_url(base: &Url, cfg: &Configuration) -> Result<Url, url::ParseError> {
    let mut url = base.join(DEMO_ROUTE)?;
    url.set_fragment(Some(&token(cfg)));
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use base64::Engine as _;

    use super::*;
    use crate::presets::{self, PresetKey};

    fn sample() -> Configuration {
        let mut cfg = Configuration::new("gaming", "acme.test.onfastspring.com/popup");
        cfg.brand.company_name = "Acme Games".to_string();
        cfg.brand.logo_url = "https://cdn.example.com/logo.png".to_string();
        cfg.brand.palette.accent = Some("#ff0000".to_string());
        cfg.banner = false;
        cfg.debug = true;
        cfg
    }

    #[test]
    fn test_round_trip() {
        let cfg = sample();
        let hash = encode(&cfg);
        assert!(hash.starts_with("#v3_"));

        let back = decode(&hash).unwrap();
        assert_eq!(back.industry, cfg.industry);
        assert_eq!(back.storefront_id, cfg.storefront_id);
        assert_eq!(back.brand.company_name, cfg.brand.company_name);
        assert_eq!(back.brand.logo_url, cfg.brand.logo_url);
        assert_eq!(back.brand.palette.accent.as_deref(), Some("#f00"));
        assert!(!back.banner);
        assert!(back.debug);
    }

    #[test]
    fn test_default_palette_resolves_to_baseline() {
        let mut cfg = Configuration::new("saas", "acme/popup");
        cfg.brand.palette = presets::industry_theme("saas").palette();
        let back = decode(&encode(&cfg)).unwrap();
        assert_eq!(
            back.brand.palette,
            presets::baseline_palette("saas").unwrap()
        );
        assert_eq!(back.theme(), cfg.theme());
    }

    #[test]
    fn test_preset_storefront_not_stored() {
        let cfg = Configuration::new("gaming", PresetKey::Gaming.storefront());
        let hash = encode(&cfg);
        let json = lz::decompress_from_uri(hash.trim_start_matches("#v3_")).unwrap();
        assert!(json.contains(r#""ps":"g""#));
        assert!(!json.contains(r#""s":"#));

        let back = decode(&hash).unwrap();
        assert_eq!(back.storefront_id, PresetKey::Gaming.storefront());
        assert_eq!(back.preset_key, Some(PresetKey::Gaming));
    }

    #[test]
    fn test_decode_without_hash_sign() {
        let cfg = sample();
        let hash = encode(&cfg);
        assert_eq!(decode(&hash), decode(hash.trim_start_matches('#')));
    }

    #[test]
    fn test_malformed_tokens() {
        assert!(decode("").is_none());
        assert!(decode("#").is_none());
        assert!(decode("#!!not base64!!").is_none());

        let hash = encode(&sample());
        let truncated = hash.get(..hash.len() / 2).unwrap();
        assert!(decode(truncated).is_none());
    }

    #[test]
    fn test_try_decode_reports_reason() {
        assert!(matches!(try_decode(""), Err(CodecError::Empty)));
        assert!(matches!(try_decode("#v3_"), Err(CodecError::Decompress)));
        assert!(matches!(try_decode("#%%%"), Err(CodecError::Unrecognized)));
    }

    #[test]
    fn test_legacy_lz_long_form() {
        let json = r#"{"industry":"mobile","storefrontId":"a.test/popup","brand":{"companyName":"Old"}}"#;
        let cfg = decode(&lz::compress_to_uri(json)).unwrap();
        assert_eq!(cfg.industry.as_str(), "mobile");
        assert_eq!(cfg.storefront_id, "a.test/popup");
        assert_eq!(cfg.brand.company_name, "Old");
        assert!(cfg.banner);
        assert_eq!(cfg.brand.palette.accent.as_deref(), Some("#22c55e"));
    }

    #[test]
    fn test_legacy_base64_long_form() {
        let json = r#"{"industry":"saas","storefrontId":"b.test/popup","banner":false}"#;
        let raw = base64::engine::general_purpose::STANDARD.encode(json);
        let cfg = decode(&format!("#{raw}")).unwrap();
        assert_eq!(cfg.storefront_id, "b.test/popup");
        assert!(!cfg.banner);

        let unpadded = raw.trim_end_matches('=');
        assert!(decode(unpadded).is_some());
    }

    #[test]
    fn test_blank_industry_becomes_default() {
        let cfg = Configuration::new("", "acme/popup");
        let back = decode(&encode(&cfg)).unwrap();
        assert_eq!(back.industry.as_str(), "saas");
    }

    #[test]
    fn test_share_url() {
        let base = Url::parse("https://demo.example.com/").unwrap();
        let url = share_url(&base, &sample()).unwrap();
        assert_eq!(url.path(), "/demo");
        let fragment = url.fragment().unwrap();
        assert!(fragment.starts_with("v3_"));
        let back = decode(fragment).unwrap();
        assert_eq!(back.brand.company_name, "Acme Games");
        assert_eq!(back.storefront_id, "acme.test.onfastspring.com/popup");
    }
}
