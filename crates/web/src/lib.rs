//! Browser host for the popup checkout demo.
//!
//! Implements the core's page, widget and key-value interfaces against the
//! DOM, `window.fastspring.builder` and `localStorage`, and exports
//! [`DemoApp`] to JavaScript. Only the event inbox and the cart action
//! arguments build off wasm32; they are what native tests exercise.
//!
//! Build with `wasm-pack build crates/web --target web --out-dir pkg`.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod actions;
pub mod inbox;

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
mod browser;

#[cfg(target_arch = "wasm32")]
pub use app::DemoApp;

pub use actions::CartAction;
pub use inbox::{HostEvent, Inbox};
