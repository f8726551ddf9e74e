//! JSON API routes.

pub mod presets;
pub mod share;
