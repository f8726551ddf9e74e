//! Integration tests for cart actions and widget callbacks through the
//! facade, with the settings and codec the pages use.

#![allow(clippy::unwrap_used)]

use popup_demo_core::settings::keys;
use popup_demo_core::{
    Action, DemoSettings, FallbackPolicy, Integration, IntegrationError, IntegrationOptions,
    KeyValueStore, MemoryPage, MemoryStore, PendingCommand, PresetKey, ProductLine,
    RecordingWidget, WidgetCall, WidgetMethod, WidgetStatus, codec,
};
use popup_demo_integration_tests::{STOREFRONT, catalog, payload, ready_facade};

fn push(path: &str) -> WidgetCall {
    WidgetCall::Push {
        products: vec![ProductLine::new(path, 1)],
    }
}

// =============================================================================
// Single-select checkout
// =============================================================================

#[test]
fn test_buy_now_with_stale_cart() {
    let mut fs = ready_facade(IntegrationOptions::default());
    fs.on_callback(&payload(&["basic"]));
    assert_eq!(fs.cart_qty(), 1);

    fs.select_single_and_checkout("pro", true).unwrap();
    assert_eq!(fs.widget().calls(), &[WidgetCall::Reset]);

    // The old item is still there: nothing happens yet.
    fs.on_callback(&payload(&["basic"]));
    assert_eq!(fs.widget().calls().len(), 1);

    fs.on_callback(&payload(&[]));
    fs.on_callback(&payload(&["pro"]));
    assert_eq!(
        fs.widget().calls(),
        &[WidgetCall::Reset, push("pro"), WidgetCall::Checkout]
    );
    assert_eq!(fs.pending(), &PendingCommand::None);

    // Later callbacks never re-add or re-checkout.
    fs.on_callback(&payload(&["pro"]));
    fs.on_callback(&payload(&[]));
    assert_eq!(fs.widget().calls().len(), 3);
}

#[test]
fn test_second_buy_now_replaces_first() {
    let mut fs = ready_facade(IntegrationOptions::default());
    fs.select_single_and_checkout("basic", true).unwrap();
    fs.select_single_and_checkout("pro", true).unwrap();
    assert_eq!(fs.pending().path(), Some("pro"));

    fs.on_callback(&payload(&[]));
    fs.on_callback(&payload(&["pro"]));
    assert_eq!(
        fs.widget().calls(),
        &[
            WidgetCall::Reset,
            WidgetCall::Reset,
            push("pro"),
            WidgetCall::Checkout
        ]
    );
}

#[test]
fn test_reset_failure_waits_for_confirmation() {
    let mut fs = ready_facade(IntegrationOptions::default());
    fs.widget_mut().fail(WidgetMethod::Reset);

    fs.select_single_and_checkout("pro", true).unwrap();
    assert_eq!(fs.widget().calls(), &[push("pro")]);
    assert!(matches!(
        fs.pending(),
        PendingCommand::AwaitingConfirmation { checkout: true, .. }
    ));

    fs.on_callback(&payload(&["pro"]));
    assert_eq!(fs.widget().calls(), &[push("pro"), WidgetCall::Checkout]);
}

#[test]
fn test_reset_failure_immediate_policy() {
    let mut fs = ready_facade(IntegrationOptions {
        fallback: FallbackPolicy::Immediate,
        ..IntegrationOptions::default()
    });
    fs.widget_mut().fail(WidgetMethod::Reset);

    fs.select_single_and_checkout("pro", true).unwrap();
    assert_eq!(fs.widget().calls(), &[push("pro"), WidgetCall::Checkout]);
    assert!(!fs.pending().is_pending());
}

#[test]
fn test_failed_add_clears_pending_and_alerts() {
    let mut fs = ready_facade(IntegrationOptions::default());
    fs.select_single_and_checkout("pro", true).unwrap();
    fs.widget_mut().fail(WidgetMethod::Push);

    fs.on_callback(&payload(&[]));
    assert_eq!(fs.pending(), &PendingCommand::None);
    assert_eq!(fs.page().alerts().len(), 1);

    // Recovery does not resurrect the command.
    fs.widget_mut().recover(WidgetMethod::Push);
    fs.on_callback(&payload(&[]));
    assert_eq!(fs.widget().calls(), &[WidgetCall::Reset]);
}

// =============================================================================
// Add to cart
// =============================================================================

#[test]
fn test_add_to_cart_never_increments() {
    let mut fs = ready_facade(IntegrationOptions::default());
    fs.add_to_cart("pro", 3).unwrap();
    fs.on_callback(&payload(&["pro"]));
    fs.add_to_cart("pro", 3).unwrap();
    fs.add_to_cart_force("pro", 0).unwrap();

    assert_eq!(
        fs.widget().calls(),
        &[
            WidgetCall::Push {
                products: vec![ProductLine::new("pro", 3)]
            },
            WidgetCall::Update {
                path: "pro".to_string(),
                quantity: 1
            },
            push("pro"),
        ]
    );
}

#[test]
fn test_add_without_path_alerts() {
    let mut fs = ready_facade(IntegrationOptions::default());
    let err = fs.add_to_cart("  ", 1).unwrap_err();
    assert!(matches!(err, IntegrationError::NoProductPath));
    assert_eq!(fs.page().alerts(), &["No product path.".to_string()]);
    assert!(fs.widget().calls().is_empty());
}

#[test]
fn test_widget_missing() {
    let mut fs = Integration::new(
        RecordingWidget::unavailable(),
        MemoryPage::new(),
        DemoSettings::for_storefront(STOREFRONT),
        IntegrationOptions::default(),
    );
    fs.attach().unwrap();

    let err = fs.checkout().unwrap_err();
    assert!(matches!(
        err,
        IntegrationError::Widget {
            action: Action::Checkout,
            ..
        }
    ));
    // Refreshing is silent.
    assert!(fs.refresh_products().is_err());
    assert_eq!(fs.page().alerts().len(), 1);
}

// =============================================================================
// Script lifecycle and popup close
// =============================================================================

#[test]
fn test_storefront_switch_reuses_script() {
    let mut fs = ready_facade(IntegrationOptions::default());
    assert_eq!(fs.status(), WidgetStatus::Ready);

    fs.set_storefront_id("other.test.onfastspring.com/popup").unwrap();
    assert_eq!(fs.page().inserted_scripts(), 1);
    assert_eq!(fs.status(), WidgetStatus::Ready);
    assert_eq!(fs.debug_snapshot().storefront_id, "other.test.onfastspring.com/popup");
}

#[test]
fn test_order_completion() {
    let mut fs = ready_facade(IntegrationOptions::default());
    fs.on_popup_closed(&serde_json::from_value(serde_json::json!({ "id": "A&B 7" })).unwrap());
    assert_eq!(fs.widget().calls(), &[WidgetCall::Reset]);
    assert_eq!(fs.page().navigations(), &["purchase_success?orderId=A%26B+7".to_string()]);

    // Closed without an order: reset only.
    fs.on_popup_closed(&serde_json::from_value(serde_json::json!({})).unwrap());
    assert_eq!(fs.page().navigations().len(), 1);
    assert_eq!(fs.widget().calls().len(), 2);
}

#[test]
fn test_catalog_and_snapshot() {
    let mut fs = ready_facade(IntegrationOptions::default());
    fs.on_callback(&catalog(&["pro"]));

    // Legacy shape: only the selected group entries count.
    let snapshot = fs.debug_snapshot();
    assert_eq!(snapshot.cart_qty, 1);
    assert_eq!(snapshot.counts.items_count, 0);
    assert_eq!(snapshot.counts.selected_count, 1);
    let names: Vec<&str> = snapshot.products.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Basic", "Pro"]);

    fs.on_callback(&payload(&["pro"]));
    let snapshot = fs.debug_snapshot();
    assert_eq!(snapshot.counts.items_count, 1);
    assert_eq!(snapshot.counts.selected_count, 1);
}

// =============================================================================
// Settings and share links
// =============================================================================

#[test]
fn test_builder_settings_round_trip_through_share_link() {
    let mut store = MemoryStore::new();
    store.set(keys::STOREFRONT_ID, PresetKey::Gaming.storefront());
    store.set(keys::INDUSTRY, "gaming");
    store.set(keys::COMPANY_NAME, "Acme Games");
    store.set(keys::PALETTE, r##"{"accent":"#123456"}"##);
    store.set(keys::LOGO_DATA_URL, "data:image/png;base64,AAAA");

    let builder = DemoSettings::open("/", "", &store);
    assert!(!builder.is_locked());
    let hash = codec::encode(&builder.configuration());

    let viewer = DemoSettings::open("/demo", &hash, &MemoryStore::new());
    assert!(viewer.is_locked());
    assert_eq!(viewer.storefront_id, PresetKey::Gaming.storefront());
    assert_eq!(viewer.company_name, "Acme Games");
    assert_eq!(viewer.logo_src(), "");
    assert_eq!(viewer.theme().accent, "#123456");
    assert_eq!(viewer.theme().nav, builder.theme().nav);
}
