//! Share link commands.
//!
//! # Usage
//!
//! ```bash
//! pd-cli share encode --industry gaming --storefront acme.test.onfastspring.com/popup
//! pd-cli share encode --preset m --no-banner --base-url https://demo.example.com/
//! pd-cli share decode "#v3_..."
//! ```

use clap::Args;
use popup_demo_core::{Configuration, Industry, Layout, PresetKey, Theme, codec};
use serde::Serialize;
use tracing::info;
use url::Url;

use super::{CommandError, emit};

/// Options for `share encode`.
#[derive(Debug, Default, Args)]
pub struct EncodeArgs {
    /// Industry (defaults to the preset's, else `saas`)
    #[arg(short, long)]
    pub industry: Option<String>,

    /// Storefront identifier
    #[arg(short, long)]
    pub storefront: Option<String>,

    /// Preset code (`m`, `g`, `e`, `s`)
    #[arg(short, long)]
    pub preset: Option<String>,

    /// Company name shown in the demo header
    #[arg(short, long)]
    pub company: Option<String>,

    /// Logo URL
    #[arg(short, long)]
    pub logo: Option<String>,

    /// Accent colour
    #[arg(long)]
    pub accent: Option<String>,

    /// Navigation bar colour
    #[arg(long)]
    pub nav: Option<String>,

    /// Background colour
    #[arg(long)]
    pub background: Option<String>,

    /// Text colour
    #[arg(long)]
    pub text: Option<String>,

    /// Hide the promotional banner
    #[arg(long)]
    pub no_banner: bool,

    /// Turn on debug output in the demo
    #[arg(long)]
    pub debug: bool,

    /// Base URL for the full link (defaults to `DEMO_BASE_URL`)
    #[arg(long)]
    pub base_url: Option<String>,
}

/// Build the configuration described by `args`.
///
/// # Errors
///
/// Returns an error if the preset code is unknown, or neither a storefront
/// nor a preset is given.
pub fn configuration(args: &EncodeArgs) -> Result<Configuration, CommandError> {
    let preset = args
        .preset
        .as_deref()
        .map(|code| PresetKey::from_code(code).ok_or_else(|| CommandError::UnknownPreset(code.to_string())))
        .transpose()?;

    let mut config = preset.map_or_else(Configuration::default, Configuration::from_preset);
    if let Some(industry) = &args.industry {
        config.industry = Industry::new(industry.clone());
    }
    if let Some(storefront) = &args.storefront {
        config.storefront_id = storefront.trim().to_string();
    }
    if config.storefront_id.is_empty() && config.preset_key.is_none() {
        return Err(CommandError::MissingStorefront);
    }

    let non_empty = |v: &Option<String>| v.clone().filter(|s| !s.trim().is_empty());
    config.brand.company_name = non_empty(&args.company).unwrap_or_default();
    config.brand.logo_url = non_empty(&args.logo).unwrap_or_default();
    config.brand.palette.accent = non_empty(&args.accent);
    config.brand.palette.nav = non_empty(&args.nav);
    config.brand.palette.background = non_empty(&args.background);
    config.brand.palette.text = non_empty(&args.text);
    config.banner = !args.no_banner;
    config.debug = args.debug;
    Ok(config)
}

/// Print the share fragment for `args`, and the full URL when a base URL is
/// known.
///
/// # Errors
///
/// Returns an error if the options are invalid or the base URL does not
/// parse.
pub fn encode(args: &EncodeArgs) -> Result<(), CommandError> {
    let config = configuration(args)?;
    let hash = codec::encode(&config);
    info!(industry = %config.industry, len = hash.len(), "encoded share link");
    emit(&hash)?;

    let _ = dotenvy::dotenv();
    let base = args
        .base_url
        .clone()
        .or_else(|| std::env::var("DEMO_BASE_URL").ok());
    if let Some(base) = base {
        let url = codec::share_url(&Url::parse(&base)?, &config)?;
        emit(url.as_str())?;
    }
    Ok(())
}

/// What `share decode` prints.
#[derive(Debug, Serialize)]
pub struct Decoded {
    pub config: Configuration,
    pub layout: Layout,
    pub theme: Theme,
}

/// Decode a share URL, fragment or bare token.
///
/// # Errors
///
/// Returns an error describing why the token did not decode.
pub fn decode_input(input: &str) -> Result<Decoded, CommandError> {
    let token = input.split_once('#').map_or(input, |(_, fragment)| fragment);
    let config = codec::try_decode(token.trim())?;
    Ok(Decoded {
        layout: config.industry.layout(),
        theme: config.theme(),
        config,
    })
}

/// Print the configuration a share link carries, as YAML.
///
/// # Errors
///
/// Returns an error if the link does not decode.
pub fn decode(input: &str) -> Result<(), CommandError> {
    let decoded = decode_input(input)?;
    emit(&serde_yaml::to_string(&decoded)?)
}
