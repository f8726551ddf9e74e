//! Integration tests for the popup checkout demo.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p popup-demo-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `checkout_flow` - Cart actions and widget callbacks through the facade
//! - `share_api` - The HTTP share-link API, driven with `tower::ServiceExt::oneshot`
//!
//! This library holds the shared fixtures.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;

use popup_demo_core::{
    DemoSettings, Integration, IntegrationOptions, MemoryPage, RecordingWidget,
};
use popup_demo_storefront::{config::StorefrontConfig, state::AppState};
use serde_json::{Value, json};

/// Public origin the test server builds links on.
pub const BASE_URL: &str = "https://demo.example.com/";

/// Storefront every fixture attaches to.
pub const STOREFRONT: &str = "acme.test.onfastspring.com/popup";

/// Facade over recording doubles.
pub type TestFacade = Integration<RecordingWidget, MemoryPage>;

/// Server state with test configuration.
///
/// # Panics
///
/// Panics if the fixed test configuration does not load.
#[must_use]
pub fn test_state() -> AppState {
    let vars: HashMap<&str, &str> = HashMap::from([
        ("DEMO_BASE_URL", BASE_URL),
        ("DEMO_STATIC_DIR", "target/test-pkg"),
        ("SHARE_CACHE_CAPACITY", "8"),
    ]);
    let config = StorefrontConfig::from_lookup(|key| vars.get(key).map(ToString::to_string))
        .unwrap_or_else(|e| panic!("test configuration: {e}"));
    AppState::new(config)
}

/// A facade attached to [`STOREFRONT`] whose script has loaded and whose
/// post-ready reset has run.
#[must_use]
pub fn ready_facade(options: IntegrationOptions) -> TestFacade {
    let settings = DemoSettings::for_storefront(STOREFRONT);
    let mut facade = Integration::new(RecordingWidget::new(), MemoryPage::new(), settings, options);
    if let Err(e) = facade.attach() {
        panic!("attach: {e}");
    }
    facade.on_script_loaded();
    while facade.page_mut().take_tick() {
        facade.tick();
    }
    facade.widget_mut().take_calls();
    facade
}

/// Catalog groups with two products; `selected` lists the cart paths.
#[must_use]
pub fn catalog(selected: &[&str]) -> Value {
    let item = |path: &str, display: &str, price: u32| {
        json!({
            "path": path,
            "display": display,
            "price": format!("${price}.00"),
            "priceValue": price,
            "quantity": 1,
            "selected": selected.contains(&path),
        })
    };
    json!({
        "groups": [{ "items": [item("basic", "Basic", 10), item("pro", "Pro", 20)] }]
    })
}

/// Modern callback payload: cart `items` plus the catalog groups.
#[must_use]
pub fn payload(cart: &[&str]) -> Value {
    let mut value = catalog(cart);
    let items: Vec<Value> = cart
        .iter()
        .map(|path| json!({ "path": path, "quantity": 1 }))
        .collect();
    if let Some(obj) = value.as_object_mut() {
        obj.insert("items".to_string(), Value::Array(items));
    }
    value
}
