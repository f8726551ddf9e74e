//! Short-key JSON form carried inside `v3` tokens.
//!
//! Field order here is the serialised key order. Empty strings and empty
//! objects are skipped so the compressed token stays small.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::cart;
use crate::presets::{self, PresetKey};
use crate::types::palette::Channel;
use crate::types::{Brand, Configuration, Industry, Palette, short_hex};

#[derive(Debug, Default, Serialize, Deserialize)]
pub(super) struct ShortConfig {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    i: String,
    #[serde(default, skip_serializing_if = "ShortBrand::is_empty")]
    b: ShortBrand,
    #[serde(default, deserialize_with = "truthy")]
    d: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    ps: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    s: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    bn: Option<Value>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ShortBrand {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    c: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    l: String,
    #[serde(default, skip_serializing_if = "ShortPalette::is_empty")]
    p: ShortPalette,
}

impl ShortBrand {
    fn is_empty(&self) -> bool {
        self.c.is_empty() && self.l.is_empty() && self.p.is_empty()
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ShortPalette {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    a: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    n: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    bg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    t: Option<String>,
}

impl ShortPalette {
    const fn is_empty(&self) -> bool {
        self.a.is_none() && self.n.is_none() && self.bg.is_none() && self.t.is_none()
    }

    fn slot(&mut self, channel: Channel) -> &mut Option<String> {
        match channel {
            Channel::Accent => &mut self.a,
            Channel::Nav => &mut self.n,
            Channel::Background => &mut self.bg,
            Channel::Text => &mut self.t,
        }
    }

    fn into_palette(self) -> Palette {
        let keep = |v: Option<String>| v.filter(|s| !s.is_empty());
        Palette {
            accent: keep(self.a),
            nav: keep(self.n),
            background: keep(self.bg),
            text: keep(self.t),
        }
    }
}

/// Accepts booleans, numbers and strings the way a JavaScript `!!value` would.
fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(|v| cart::is_truthy(&v))
}

/// Build the short form, leaving out everything the registry can restore.
pub(super) fn to_short(cfg: &Configuration) -> ShortConfig {
    let baseline = presets::baseline_palette(&cfg.industry.key());

    let mut palette = ShortPalette::default();
    for channel in Channel::ALL {
        let Some(value) = cfg.brand.palette.get(channel).map(short_hex) else {
            continue;
        };
        let is_baseline = baseline
            .as_ref()
            .and_then(|b| b.get(channel))
            .is_some_and(|d| short_hex(d) == value);
        if !is_baseline {
            *palette.slot(channel) = Some(value);
        }
    }

    let storefront = cfg.storefront_id.trim();
    let (ps, s) = match cfg.effective_preset() {
        Some(key) if storefront.is_empty() || storefront == key.storefront() => {
            (key.code().to_string(), String::new())
        }
        Some(key) => (key.code().to_string(), storefront.to_string()),
        None => (String::new(), storefront.to_string()),
    };

    ShortConfig {
        i: cfg.industry.as_str().to_string(),
        b: ShortBrand {
            c: cfg.brand.company_name.clone(),
            l: cfg.brand.logo_url.clone(),
            p: palette,
        },
        d: cfg.debug,
        ps,
        s,
        bn: (!cfg.banner).then(|| Value::from(0)),
    }
}

/// Expand the short form. The result is not yet normalised.
pub(super) fn from_short(short: ShortConfig) -> Configuration {
    let preset_key = PresetKey::from_code(&short.ps);
    let storefront_id = if short.s.is_empty() {
        preset_key
            .map(|k| k.storefront().to_string())
            .unwrap_or_default()
    } else {
        short.s
    };
    let banner = !short
        .bn
        .as_ref()
        .and_then(Value::as_f64)
        .is_some_and(|v| v == 0.0);

    Configuration {
        industry: Industry::new(short.i),
        storefront_id,
        preset_key,
        brand: Brand {
            company_name: short.b.c,
            logo_url: short.b.l,
            palette: short.b.p.into_palette(),
        },
        banner,
        debug: short.d,
    }
}
