//! `wasm-bindgen` exports: [`DemoApp`] wraps the integration facade for the
//! builder and demo pages.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use js_sys::Function;
use popup_demo_core::{
    DemoSettings, Integration, IntegrationError, IntegrationOptions, ProductCard, SettingsUpdate,
    codec,
};
use serde::Serialize;
use tracing::warn;
use wasm_bindgen::prelude::*;

use crate::actions::CartAction;
use crate::browser::{BrowserPage, LocalStore, SblWidget, to_json};
use crate::inbox::{HostEvent, Inbox};

type Facade = Integration<SblWidget, BrowserPage>;

struct Shared {
    facade: RefCell<Facade>,
    inbox: RefCell<Inbox>,
    store: RefCell<LocalStore>,
    on_change: RefCell<Option<Function>>,
}

impl Shared {
    fn dispatch(&self, event: HostEvent) {
        self.inbox.borrow_mut().push(event);
        self.drain();
    }

    /// Handle queued events, unless the facade is busy; whoever holds it
    /// drains once done.
    fn drain(&self) {
        let Ok(mut facade) = self.facade.try_borrow_mut() else {
            return;
        };
        let mut changed = false;
        loop {
            let next = self.inbox.borrow_mut().pop();
            let Some(event) = next else {
                break;
            };
            changed |= event.changes_view();
            event.apply(&mut facade);
        }
        drop(facade);
        if changed {
            self.notify();
        }
    }

    fn notify(&self) {
        let callback = self.on_change.borrow().clone();
        if let Some(callback) = callback {
            if let Err(e) = callback.call0(&JsValue::NULL) {
                warn!(error = %crate::browser::describe(&e), "change listener threw");
            }
        }
    }

    /// Run a UI action, then handle whatever the widget reported meanwhile.
    fn run<R>(&self, action: impl FnOnce(&mut Facade) -> R) -> Option<R> {
        let result = {
            let mut facade = self.facade.try_borrow_mut().ok()?;
            action(&mut facade)
        };
        self.drain();
        self.notify();
        Some(result)
    }

    fn view<R: Default>(&self, read: impl FnOnce(&Facade) -> R) -> R {
        self.facade
            .try_borrow()
            .map(|facade| read(&facade))
            .unwrap_or_default()
    }
}

fn json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

fn succeeded(result: Option<Result<(), IntegrationError>>) -> bool {
    matches!(result, Some(Ok(())))
}

/// The demo, as seen from JavaScript.
#[wasm_bindgen]
pub struct DemoApp {
    shared: Rc<Shared>,
}

impl DemoApp {
    fn cart_action(&self, action: CartAction) -> bool {
        succeeded(self.shared.run(|f| action.run(f)))
    }
}

#[wasm_bindgen]
impl DemoApp {
    /// Load settings for the page at `path` with fragment `hash`, install
    /// the widget callbacks and attach the checkout script.
    #[wasm_bindgen(constructor)]
    pub fn new(path: &str, hash: &str) -> Self {
        console_error_panic_hook::set_once();

        let settings = DemoSettings::open(path, hash, &LocalStore);
        let options = IntegrationOptions {
            debug: settings.debug,
            ..IntegrationOptions::default()
        };

        let shared = Rc::new_cyclic(|weak: &Weak<Shared>| {
            let weak = weak.clone();
            let sink = Rc::new(move |event: HostEvent| {
                if let Some(shared) = weak.upgrade() {
                    shared.dispatch(event);
                }
            });
            Shared {
                facade: RefCell::new(Integration::new(
                    SblWidget,
                    BrowserPage::new(sink),
                    settings,
                    options,
                )),
                inbox: RefCell::new(Inbox::new()),
                store: RefCell::new(LocalStore),
                on_change: RefCell::new(None),
            }
        });

        if let Some(Err(e)) = shared.run(Facade::attach) {
            warn!(error = %e, "checkout script not attached");
        }
        Self { shared }
    }

    /// Call `callback` after every state change.
    #[wasm_bindgen(js_name = onChange)]
    pub fn on_change(&self, callback: Function) {
        *self.shared.on_change.borrow_mut() = Some(callback);
    }

    // -------------------------------------------------------------------------
    // Actions
    // -------------------------------------------------------------------------

    /// Put `product` (a path or a catalog item) in the cart without ever
    /// incrementing it; `qty` defaults to 1.
    #[wasm_bindgen(js_name = addToCart)]
    pub fn add_to_cart(&self, product: &JsValue, qty: Option<u32>) -> bool {
        self.cart_action(CartAction::add(&to_json(product), qty))
    }

    /// Push `qty` (default 1) of `product` whatever the cart holds.
    #[wasm_bindgen(js_name = addToCartForce)]
    pub fn add_to_cart_force(&self, product: &JsValue, qty: Option<u32>) -> bool {
        self.cart_action(CartAction::add_force(&to_json(product), qty))
    }

    /// Make `product` the only cart line; check out afterwards unless
    /// `do_checkout` is `false`.
    #[wasm_bindgen(js_name = selectSingleAndCheckout)]
    pub fn select_single_and_checkout(&self, product: &JsValue, do_checkout: Option<bool>) -> bool {
        self.cart_action(CartAction::select_single(&to_json(product), do_checkout))
    }

    pub fn checkout(&self) -> bool {
        succeeded(self.shared.run(Facade::checkout))
    }

    #[wasm_bindgen(js_name = refreshProducts)]
    pub fn refresh_products(&self) -> bool {
        succeeded(self.shared.run(Facade::refresh_products))
    }

    #[wasm_bindgen(js_name = setStorefrontId)]
    pub fn set_storefront_id(&self, storefront_id: &str) -> bool {
        let store = &self.shared.store;
        succeeded(self.shared.run(|f| {
            f.set_storefront_id(storefront_id)?;
            f.settings().persist(&mut *store.borrow_mut());
            Ok(())
        }))
    }

    /// Apply a JSON settings edit, persist it and re-attach on a new
    /// storefront.
    ///
    /// # Errors
    ///
    /// Throws if `update` is not a valid settings object.
    #[wasm_bindgen(js_name = saveSettings)]
    pub fn save_settings(&self, update: &str) -> Result<bool, JsValue> {
        let update: SettingsUpdate =
            serde_json::from_str(update).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let store = &self.shared.store;
        Ok(succeeded(self.shared.run(|f| {
            let storefront_changed = f.settings_mut().apply(update);
            f.settings().persist(&mut *store.borrow_mut());
            if storefront_changed {
                f.attach()?;
            }
            Ok(())
        })))
    }

    // -------------------------------------------------------------------------
    // State
    // -------------------------------------------------------------------------

    pub fn status(&self) -> String {
        self.shared.view(|f| f.status().to_string())
    }

    pub fn error(&self) -> Option<String> {
        self.shared.view(|f| f.error().map(ToString::to_string))
    }

    #[wasm_bindgen(js_name = isLocked)]
    pub fn is_locked(&self) -> bool {
        self.shared.view(|f| f.settings().is_locked())
    }

    pub fn layout(&self) -> String {
        self.shared.view(|f| f.settings().layout().to_string())
    }

    #[wasm_bindgen(js_name = logoSrc)]
    pub fn logo_src(&self) -> String {
        self.shared.view(|f| f.settings().logo_src().to_string())
    }

    #[wasm_bindgen(js_name = cartQty)]
    pub fn cart_qty(&self) -> u32 {
        self.shared.view(Facade::cart_qty)
    }

    /// Fragment that reproduces the current settings on `/demo`.
    #[wasm_bindgen(js_name = shareHash)]
    pub fn share_hash(&self) -> String {
        self.shared
            .view(|f| codec::encode(&f.settings().configuration()))
    }

    #[wasm_bindgen(js_name = settingsJson)]
    pub fn settings_json(&self) -> String {
        self.shared.view(|f| json(f.settings()))
    }

    #[wasm_bindgen(js_name = themeJson)]
    pub fn theme_json(&self) -> String {
        self.shared.view(|f| json(&f.theme()))
    }

    #[wasm_bindgen(js_name = productsJson)]
    pub fn products_json(&self) -> String {
        self.shared.view(|f| {
            let cards: Vec<ProductCard> = f.products().iter().map(ProductCard::from_item).collect();
            json(&cards)
        })
    }

    /// The product to feature, preferring the deepest discount.
    #[wasm_bindgen(js_name = featuredJson)]
    pub fn featured_json(&self) -> String {
        self.shared
            .view(|f| json(&ProductCard::featured(f.products(), true)))
    }

    #[wasm_bindgen(js_name = debugSnapshotJson)]
    pub fn debug_snapshot_json(&self) -> String {
        self.shared.view(|f| json(&f.debug_snapshot()))
    }
}
