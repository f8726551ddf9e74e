//! Core types for Popup Demo.
//!
//! This module provides the configuration model shared by the codec, the
//! integration facade and the persisted settings.

pub mod color;
pub mod config;
pub mod industry;
pub mod money;
pub mod palette;
pub mod status;

pub use color::{same_color, short_hex};
pub use config::{Brand, Configuration};
pub use industry::{Industry, Layout};
pub use money::{CurrencyCode, Price};
pub use palette::{Channel, Palette, Theme};
pub use status::WidgetStatus;
