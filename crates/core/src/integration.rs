//! The facade the UI talks to.
//!
//! [`Integration`] owns the widget, the page, the settings and every piece
//! of state derived from callback payloads. UI actions and widget events all
//! come through here, one at a time, on the page's event loop.

use core::fmt;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use url::form_urlencoded;

use crate::bootstrap::{Bootstrap, WidgetScript};
use crate::cart::{CallbackPayload, CartCounts, CartItem, NormalizedCart, OrderReference, ProductRef};
use crate::catalog;
use crate::page::{HostError, Page};
pub use crate::pending::FallbackPolicy;
use crate::pending::{Effect, PendingCommand};
use crate::settings::DemoSettings;
use crate::types::{Theme, WidgetStatus};
use crate::widget::{CheckoutWidget, ProductLine, WidgetError};

/// Page the popup-closed handler navigates to.
pub const PURCHASE_SUCCESS_PATH: &str = "purchase_success";

/// A user-facing operation, named in alerts and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    AddToCart,
    AddToCartForce,
    SelectSingleAndCheckout,
    Checkout,
    RefreshProducts,
    /// Steps the pending command performs from inside the callback.
    PendingStep,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::AddToCart => "add to cart",
            Self::AddToCartForce => "add to cart (force)",
            Self::SelectSingleAndCheckout => "select and checkout",
            Self::Checkout => "checkout",
            Self::RefreshProducts => "refresh products",
            Self::PendingStep => "single-select step",
        };
        f.write_str(name)
    }
}

/// Why an action did not happen.
#[derive(Debug, Error)]
pub enum IntegrationError {
    #[error("no product path could be resolved")]
    NoProductPath,

    #[error("{action} failed: {source}")]
    Widget {
        action: Action,
        #[source]
        source: WidgetError,
    },

    #[error("page error: {0}")]
    Host(#[from] HostError),
}

impl IntegrationError {
    /// Text of the alert shown for this error, if it is shown at all.
    #[must_use]
    pub fn alert_message(&self) -> Option<String> {
        match self {
            Self::NoProductPath => Some("No product path.".to_string()),
            Self::Widget {
                action: Action::Checkout,
                ..
            } => Some(
                "The checkout widget is not ready yet. Confirm the storefront identifier and script."
                    .to_string(),
            ),
            Self::Widget {
                action: Action::RefreshProducts,
                ..
            }
            | Self::Host(_) => None,
            Self::Widget { action, .. } => Some(format!(
                "Checkout widget action failed ({action}). See the console for details."
            )),
        }
    }
}

/// Tuning knobs for [`Integration`].
#[derive(Debug, Clone, Default)]
pub struct IntegrationOptions {
    /// What single-select does when its initial reset fails.
    pub fallback: FallbackPolicy,
    /// Log a summary of every callback payload at debug level.
    pub debug: bool,
    pub script: WidgetScript,
}

/// A row of the debug product table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductRow {
    pub name: String,
    pub path: String,
}

/// Everything useful for diagnosing the integration at a glance.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugSnapshot {
    pub storefront_id: String,
    pub industry: String,
    pub status: WidgetStatus,
    pub locked_by_url: bool,
    pub cart_qty: u32,
    pub counts: CartCounts,
    pub pending: PendingCommand,
    pub products: Vec<ProductRow>,
}

/// Cart actions and widget events over a [`CheckoutWidget`] and a [`Page`].
#[derive(Debug)]
pub struct Integration<W, P> {
    widget: W,
    page: P,
    settings: DemoSettings,
    options: IntegrationOptions,
    bootstrap: Bootstrap,
    pending: PendingCommand,
    last_payload: Option<Value>,
    cart: NormalizedCart,
    counts: CartCounts,
    products: Vec<CartItem>,
}

impl<W: CheckoutWidget, P: Page> Integration<W, P> {
    /// Build the facade. Nothing touches the page until [`Self::attach`].
    #[must_use]
    pub fn new(widget: W, page: P, settings: DemoSettings, options: IntegrationOptions) -> Self {
        let bootstrap = Bootstrap::new(options.script.clone());
        Self {
            widget,
            page,
            settings,
            options,
            bootstrap,
            pending: PendingCommand::None,
            last_payload: None,
            cart: NormalizedCart::default(),
            counts: CartCounts::default(),
            products: Vec::new(),
        }
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Attach the checkout script for the current storefront.
    ///
    /// # Errors
    ///
    /// Returns an error if the page refused a write; the status is `error`.
    pub fn attach(&mut self) -> Result<(), IntegrationError> {
        let storefront = self.settings.storefront_id.clone();
        self.bootstrap
            .attach(&mut self.page, &storefront)
            .map_err(|e| {
                error!(error = %e, "checkout script attach failed");
                IntegrationError::from(e)
            })
    }

    /// Switch storefronts and re-attach the script.
    ///
    /// # Errors
    ///
    /// Returns an error if the page refused a write.
    pub fn set_storefront_id(&mut self, storefront_id: &str) -> Result<(), IntegrationError> {
        self.settings.storefront_id = storefront_id.to_string();
        self.attach()
    }

    /// The script's load event.
    pub fn on_script_loaded(&mut self) {
        self.bootstrap.on_load(&mut self.page);
    }

    /// The script's error event.
    pub fn on_script_failed(&mut self) {
        self.bootstrap.on_error();
    }

    /// Deferred work requested through [`Page::request_tick`].
    pub fn tick(&mut self) {
        if self.bootstrap.take_reset_due() {
            if let Err(e) = self.widget.reset() {
                warn!(error = %e, "post-ready reset failed");
            }
        }
    }

    // -------------------------------------------------------------------------
    // Widget events
    // -------------------------------------------------------------------------

    /// Data callback: the widget reports its cart and catalog.
    pub fn on_callback(&mut self, payload: &Value) {
        let parsed = CallbackPayload::parse(payload);
        self.cart = parsed.normalize();
        self.counts = parsed.counts();
        self.products = parsed.products();
        self.last_payload = Some(payload.clone());

        let transition = self.pending.advance(&self.cart);
        self.pending = transition.next;
        if let Some(effect) = transition.effect {
            if let Err(e) = self.perform(&effect) {
                error!(error = %e, ?effect, "pending step failed");
                self.pending = PendingCommand::None;
                self.report(IntegrationError::Widget {
                    action: Action::PendingStep,
                    source: e,
                });
            }
        }

        if self.options.debug || self.settings.debug {
            debug!(
                cart_qty = self.cart.quantity(),
                items = self.counts.items_count,
                selected = self.counts.selected_count,
                products = self.products.len(),
                pending = ?self.pending,
                "data callback"
            );
        }
    }

    /// Popup-closed callback: reset the cart and, after an order, go to the
    /// thank-you page.
    pub fn on_popup_closed(&mut self, order: &OrderReference) {
        if let Err(e) = self.widget.reset() {
            warn!(error = %e, "reset after popup close failed");
        }
        let Some(order_id) = order.order_id() else {
            return;
        };
        info!(order_id, "order completed");
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("orderId", order_id)
            .finish();
        let target = format!("{PURCHASE_SUCCESS_PATH}?{query}");
        if let Err(e) = self.page.navigate(&target) {
            error!(error = %e, url = %target, "navigation after purchase failed");
        }
    }

    // -------------------------------------------------------------------------
    // Actions
    // -------------------------------------------------------------------------

    /// Put one line of `product` in the cart without ever incrementing it.
    ///
    /// If the product is already in the cart its quantity is set to 1;
    /// otherwise it is pushed with `quantity` (at least 1).
    ///
    /// # Errors
    ///
    /// Returns an error (and alerts) if no path resolves or the widget call
    /// fails.
    pub fn add_to_cart(&mut self, product: impl Into<ProductRef>, quantity: u32) -> Result<(), IntegrationError> {
        let path = self.resolve(&product.into())?;
        let result = if self.cart.contains(&path) {
            self.widget.update(&path, 1)
        } else {
            self.widget.push(&[ProductLine::new(path, quantity.max(1))])
        };
        self.widget_result(Action::AddToCart, result)
    }

    /// Push `quantity` (at least 1) of `product`, whatever the cart holds.
    ///
    /// # Errors
    ///
    /// Returns an error (and alerts) if no path resolves or the widget call
    /// fails.
    pub fn add_to_cart_force(&mut self, product: impl Into<ProductRef>, quantity: u32) -> Result<(), IntegrationError> {
        let path = self.resolve(&product.into())?;
        let result = self.widget.push(&[ProductLine::new(path, quantity.max(1))]);
        self.widget_result(Action::AddToCartForce, result)
    }

    /// Make `product` the only cart line, then optionally check out.
    ///
    /// Replaces any command already in flight. The cart is reset now; the
    /// add and the checkout follow from later callbacks.
    ///
    /// # Errors
    ///
    /// Returns an error (and alerts) if no path resolves, or if the reset
    /// failed and the fallback could not push the product either.
    pub fn select_single_and_checkout(
        &mut self,
        product: impl Into<ProductRef>,
        checkout: bool,
    ) -> Result<(), IntegrationError> {
        let path = self.resolve(&product.into())?;
        if self.pending.is_pending() {
            debug!(replaced = ?self.pending, "single-select replaces pending command");
        }

        let start = PendingCommand::start(path.clone(), checkout);
        self.pending = start.next;
        let reset = start.effect.map_or(Ok(()), |effect| self.perform(&effect));
        let Err(e) = reset else {
            return Ok(());
        };

        warn!(error = %e, policy = ?self.options.fallback, "reset failed, falling back");
        let (next, effects) = PendingCommand::fallback(&path, checkout, self.options.fallback);
        self.pending = next;
        for effect in &effects {
            if let Err(e) = self.perform(effect) {
                self.pending = PendingCommand::None;
                return self.widget_result(Action::SelectSingleAndCheckout, Err(e));
            }
        }
        Ok(())
    }

    /// Open the checkout popup.
    ///
    /// # Errors
    ///
    /// Returns an error (and alerts) if the widget is not ready.
    pub fn checkout(&mut self) -> Result<(), IntegrationError> {
        let result = self.widget.checkout();
        self.widget_result(Action::Checkout, result)
    }

    /// Ask the widget to re-emit its catalog and cart. Failures are logged,
    /// not alerted.
    ///
    /// # Errors
    ///
    /// Returns an error if the reset call failed.
    pub fn refresh_products(&mut self) -> Result<(), IntegrationError> {
        let result = self.widget.reset();
        self.widget_result(Action::RefreshProducts, result)
    }

    fn resolve(&mut self, product: &ProductRef) -> Result<String, IntegrationError> {
        let path = product.resolve();
        if path.is_empty() {
            return Err(self.report(IntegrationError::NoProductPath));
        }
        Ok(path)
    }

    fn perform(&mut self, effect: &Effect) -> Result<(), WidgetError> {
        match effect {
            Effect::ResetCart => self.widget.reset(),
            Effect::AddProduct { path } => self.widget.push(&[ProductLine::new(path.clone(), 1)]),
            Effect::Checkout => self.widget.checkout(),
        }
    }

    fn widget_result(&mut self, action: Action, result: Result<(), WidgetError>) -> Result<(), IntegrationError> {
        result.map_err(|source| {
            error!(%action, error = %source, "widget action failed");
            self.report(IntegrationError::Widget { action, source })
        })
    }

    /// Alert the user about `err`, if it is user-facing, and hand it back.
    fn report(&mut self, err: IntegrationError) -> IntegrationError {
        if let Some(message) = err.alert_message() {
            self.page.alert(&message);
        }
        err
    }

    // -------------------------------------------------------------------------
    // State
    // -------------------------------------------------------------------------

    #[must_use]
    pub const fn status(&self) -> WidgetStatus {
        self.bootstrap.status()
    }

    /// Script load error message, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.bootstrap.error()
    }

    /// Catalog items from the latest callback.
    #[must_use]
    pub fn products(&self) -> &[CartItem] {
        &self.products
    }

    #[must_use]
    pub const fn cart(&self) -> &NormalizedCart {
        &self.cart
    }

    #[must_use]
    pub const fn cart_qty(&self) -> u32 {
        self.cart.quantity()
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        self.settings.theme()
    }

    #[must_use]
    pub const fn pending(&self) -> &PendingCommand {
        &self.pending
    }

    /// The latest raw callback payload.
    #[must_use]
    pub const fn last_payload(&self) -> Option<&Value> {
        self.last_payload.as_ref()
    }

    #[must_use]
    pub const fn settings(&self) -> &DemoSettings {
        &self.settings
    }

    pub const fn settings_mut(&mut self) -> &mut DemoSettings {
        &mut self.settings
    }

    #[must_use]
    pub const fn widget(&self) -> &W {
        &self.widget
    }

    pub const fn widget_mut(&mut self) -> &mut W {
        &mut self.widget
    }

    #[must_use]
    pub const fn page(&self) -> &P {
        &self.page
    }

    pub const fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    #[must_use]
    pub fn debug_snapshot(&self) -> DebugSnapshot {
        DebugSnapshot {
            storefront_id: self.settings.storefront_id.clone(),
            industry: self.settings.industry.to_string(),
            status: self.status(),
            locked_by_url: self.settings.is_locked(),
            cart_qty: self.cart_qty(),
            counts: self.counts,
            pending: self.pending.clone(),
            products: self
                .products
                .iter()
                .map(|p| ProductRow {
                    name: catalog::name_of(p),
                    path: p.cart_path(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::page::MemoryPage;
    use crate::widget::{RecordingWidget, WidgetCall, WidgetMethod};

    type TestIntegration = Integration<RecordingWidget, MemoryPage>;

    fn integration() -> TestIntegration {
        let settings = DemoSettings::for_storefront("acme.test.onfastspring.com/popup");
        Integration::new(
            RecordingWidget::new(),
            MemoryPage::new(),
            settings,
            IntegrationOptions::default(),
        )
    }

    fn push(path: &str, quantity: u32) -> WidgetCall {
        WidgetCall::Push {
            products: vec![ProductLine::new(path, quantity)],
        }
    }

    #[test]
    fn test_ready_triggers_deferred_reset() {
        let mut fs = integration();
        fs.attach().unwrap();
        assert_eq!(fs.status(), WidgetStatus::Loading);
        fs.on_script_loaded();
        assert_eq!(fs.status(), WidgetStatus::Ready);
        assert!(fs.widget().calls().is_empty());

        assert!(fs.page_mut().take_tick());
        fs.tick();
        assert_eq!(fs.widget().calls(), [WidgetCall::Reset]);
        fs.tick();
        assert_eq!(fs.widget().count(WidgetMethod::Reset), 1);
    }

    #[test]
    fn test_add_to_cart_is_idempotent() {
        let mut fs = integration();
        fs.add_to_cart("p", 3).unwrap();
        fs.on_callback(&json!({ "items": [{ "path": "p", "quantity": 3 }] }));
        fs.add_to_cart("p", 3).unwrap();
        assert_eq!(
            fs.widget().calls(),
            [
                push("p", 3),
                WidgetCall::Update {
                    path: "p".to_string(),
                    quantity: 1
                }
            ]
        );
    }

    #[test]
    fn test_add_to_cart_force_always_pushes() {
        let mut fs = integration();
        fs.on_callback(&json!({ "items": [{ "path": "p" }] }));
        fs.add_to_cart_force("p", 0).unwrap();
        fs.add_to_cart_force(ProductRef::from_value(&json!({ "sku": "p" })), 2).unwrap();
        assert_eq!(fs.widget().calls(), [push("p", 1), push("p", 2)]);
    }

    #[test]
    fn test_no_path_alerts_without_calls() {
        let mut fs = integration();
        let err = fs.add_to_cart("  ", 1).unwrap_err();
        assert!(matches!(err, IntegrationError::NoProductPath));
        assert!(fs.select_single_and_checkout(ProductRef::from_value(&json!({})), true).is_err());
        assert!(fs.widget().calls().is_empty());
        assert_eq!(fs.page().alerts(), ["No product path.", "No product path."]);
        assert!(!fs.pending().is_pending());
    }

    #[test]
    fn test_unavailable_widget_alerts() {
        let mut fs = integration();
        fs.widget_mut().set_available(false);
        assert!(fs.add_to_cart("p", 1).is_err());
        assert!(fs.checkout().is_err());
        assert!(fs.refresh_products().is_err());
        let alerts = fs.page().alerts();
        assert_eq!(alerts.len(), 2);
        assert!(alerts.first().unwrap().contains("add to cart"));
        assert!(alerts.get(1).unwrap().contains("not ready"));
    }

    #[test]
    fn test_single_select_protocol() {
        let mut fs = integration();
        fs.select_single_and_checkout("prod-x", true).unwrap();
        fs.on_callback(&json!({ "items": [{ "path": "old" }] }));
        fs.on_callback(&json!({ "items": [] }));
        fs.on_callback(&json!({ "items": [] }));
        fs.on_callback(&json!({ "items": [{ "path": "prod-x", "quantity": 1 }] }));
        fs.on_callback(&json!({ "items": [{ "path": "prod-x", "quantity": 1 }] }));

        assert_eq!(
            fs.widget().calls(),
            [WidgetCall::Reset, push("prod-x", 1), WidgetCall::Checkout]
        );
        assert!(!fs.pending().is_pending());
    }

    #[test]
    fn test_new_select_replaces_pending() {
        let mut fs = integration();
        fs.select_single_and_checkout("a", true).unwrap();
        fs.select_single_and_checkout("b", false).unwrap();
        assert_eq!(fs.pending().path(), Some("b"));
        fs.on_callback(&json!({ "items": [] }));
        fs.on_callback(&json!({ "items": [{ "path": "b" }] }));
        assert_eq!(
            fs.widget().calls(),
            [WidgetCall::Reset, WidgetCall::Reset, push("b", 1)]
        );
    }

    #[test]
    fn test_reset_failure_waits_for_confirmation() {
        let mut fs = integration();
        fs.widget_mut().fail(WidgetMethod::Reset);
        fs.select_single_and_checkout("p", true).unwrap();
        assert_eq!(fs.widget().calls(), [push("p", 1)]);
        assert_eq!(fs.widget().count(WidgetMethod::Checkout), 0);

        fs.on_callback(&json!({ "items": [{ "path": "p" }] }));
        assert_eq!(fs.widget().calls(), [push("p", 1), WidgetCall::Checkout]);
        assert!(fs.page().alerts().is_empty());
    }

    #[test]
    fn test_reset_failure_immediate_policy() {
        let mut fs = Integration::new(
            RecordingWidget::new(),
            MemoryPage::new(),
            DemoSettings::default(),
            IntegrationOptions {
                fallback: FallbackPolicy::Immediate,
                ..IntegrationOptions::default()
            },
        );
        fs.widget_mut().fail(WidgetMethod::Reset);
        fs.select_single_and_checkout("p", true).unwrap();
        assert_eq!(fs.widget().calls(), [push("p", 1), WidgetCall::Checkout]);
        assert!(!fs.pending().is_pending());
    }

    #[test]
    fn test_failed_pending_add_clears_slot() {
        let mut fs = integration();
        fs.select_single_and_checkout("p", true).unwrap();
        fs.widget_mut().fail(WidgetMethod::Push);
        fs.on_callback(&json!({ "items": [] }));
        assert!(!fs.pending().is_pending());
        assert_eq!(fs.page().alerts().len(), 1);
    }

    #[test]
    fn test_popup_closed() {
        let mut fs = integration();
        fs.on_popup_closed(&OrderReference::default());
        assert!(fs.page().navigations().is_empty());

        fs.on_popup_closed(&OrderReference::new("ORD 1&2"));
        assert_eq!(fs.widget().count(WidgetMethod::Reset), 2);
        assert_eq!(fs.page().navigations(), ["purchase_success?orderId=ORD+1%262"]);
    }

    #[test]
    fn test_products_and_snapshot() {
        let mut fs = integration();
        fs.on_callback(&json!({
            "groups": [
                { "items": [{ "path": "a", "display": "Alpha", "selected": true, "quantity": 2 }] },
                { "items": [{ "path": "b" }] }
            ]
        }));
        assert_eq!(fs.products().len(), 2);
        assert_eq!(fs.cart_qty(), 2);

        let snap = fs.debug_snapshot();
        assert_eq!(snap.counts.selected_count, 2);
        assert_eq!(snap.counts.items_count, 0);
        assert_eq!(
            snap.products.first(),
            Some(&ProductRow {
                name: "Alpha".to_string(),
                path: "a".to_string()
            })
        );

        fs.on_callback(&json!({ "items": [] }));
        assert!(fs.products().is_empty());
    }

    #[test]
    fn test_storefront_change_reattaches() {
        let mut fs = integration();
        fs.attach().unwrap();
        fs.on_script_failed();
        assert_eq!(fs.status(), WidgetStatus::Error);
        assert!(fs.error().is_some());

        fs.set_storefront_id("other.test.onfastspring.com/popup").unwrap();
        assert_eq!(fs.status(), WidgetStatus::Loading);
        assert_eq!(fs.error(), None);
        assert_eq!(fs.page().inserted_scripts(), 1);
    }
}
