//! Preset listing.

use std::fmt::Write as _;

use popup_demo_core::{Configuration, PresetKey};

use super::{CommandError, emit};

/// One line per preset: code, industry, layout, accent and storefront.
#[must_use]
pub fn table() -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<4} {:<10} {:<13} {:<8} STOREFRONT", "CODE", "INDUSTRY", "LAYOUT", "ACCENT");
    for key in PresetKey::ALL {
        let config = Configuration::from_preset(key);
        let _ = writeln!(
            out,
            "{:<4} {:<10} {:<13} {:<8} {}",
            key.code(),
            key.industry(),
            config.industry.layout().to_string(),
            config.theme().accent,
            key.storefront()
        );
    }
    out
}

/// Print the preset table.
///
/// # Errors
///
/// Returns an error if stdout cannot be written.
pub fn list() -> Result<(), CommandError> {
    emit(&table())
}
