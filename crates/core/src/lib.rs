//! Popup Demo Core - configuration codec and checkout-widget integration.
//!
//! This crate holds everything with real decision logic in Popup Demo:
//! - `storefront` - Server for the builder/demo pages and the share-link API
//! - `web` - Browser host that wires the integration to the DOM and the widget
//! - `cli` - Share-link tooling and checkout scenario replay
//!
//! # Architecture
//!
//! The core crate performs no I/O. The external checkout widget, the page it
//! is attached to and the key-value store are reached through traits
//! ([`CheckoutWidget`], [`Page`], [`KeyValueStore`]), so every state machine
//! here runs the same in the browser, in the CLI and in tests.
//!
//! # Modules
//!
//! - [`types`] - Configuration, palette, industry and widget status types
//! - [`presets`] - Preset storefronts, baseline palettes and industry themes
//! - [`codec`] - Versioned, URL-safe share tokens
//! - [`cart`] - Callback payload normalisation and path matching
//! - [`catalog`] - Display, price and discount helpers for catalog items
//! - [`pending`] - The single-select checkout state machine
//! - [`widget`] - The external widget API surface
//! - [`page`] - Script attachment, alerts and navigation
//! - [`bootstrap`] - Script attachment lifecycle
//! - [`integration`] - The facade the UI consumes
//! - [`settings`] - Persisted builder settings

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod bootstrap;
pub mod cart;
pub mod catalog;
pub mod codec;
pub mod integration;
pub mod page;
pub mod pending;
pub mod presets;
pub mod settings;
pub mod types;
pub mod widget;

pub use bootstrap::{Bootstrap, WidgetScript};
pub use cart::{CallbackPayload, CartCounts, CartItem, NormalizedCart, OrderReference, ProductRef};
pub use catalog::{DiscountInfo, ProductCard};
pub use codec::{CodecError, decode, encode, share_url, try_decode};
pub use integration::{
    Action, DebugSnapshot, FallbackPolicy, Integration, IntegrationError, IntegrationOptions,
    ProductRow,
};
pub use page::{HostError, MemoryPage, Page};
pub use pending::{Effect, PendingCommand, Transition};
pub use presets::PresetKey;
pub use settings::{DemoSettings, KeyValueStore, MemoryStore, SettingsUpdate};
pub use types::*;
pub use widget::{CheckoutWidget, ProductLine, RecordingWidget, WidgetCall, WidgetError, WidgetMethod};
