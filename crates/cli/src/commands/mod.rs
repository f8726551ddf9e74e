//! Subcommand implementations.

pub mod presets;
pub mod share;
pub mod simulate;

use std::io::{self, Write};

use popup_demo_core::CodecError;
use thiserror::Error;

/// Errors a subcommand can fail with.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Unknown preset: {0}. Valid presets: m, g, e, s")]
    UnknownPreset(String),

    #[error("A storefront identifier or preset is required")]
    MissingStorefront,

    #[error("Share link did not decode: {0}")]
    Decode(#[from] CodecError),

    #[error("Invalid base URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Write command output to stdout.
fn emit(text: &str) -> Result<(), CommandError> {
    let mut out = io::stdout().lock();
    out.write_all(text.as_bytes())?;
    if !text.ends_with('\n') {
        out.write_all(b"\n")?;
    }
    Ok(())
}
