//! Business logic services for the server.
//!
//! # Services
//!
//! - `share` - Share-link creation and cached resolution

pub mod share;

pub use share::{Resolution, ShareError, ShareLink, ShareService};
