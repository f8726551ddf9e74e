//! DOM, widget and `localStorage` implementations of the core interfaces.

use std::rc::Rc;

use js_sys::{Array, Function, JSON, Reflect};
use popup_demo_core::{
    CheckoutWidget, HostError, KeyValueStore, OrderReference, Page, ProductLine, WidgetError,
    WidgetMethod,
};
use serde_json::{Value, json};
use tracing::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlScriptElement, Window};

use crate::inbox::HostEvent;

/// Where the page delivers [`HostEvent`]s.
pub type EventSink = Rc<dyn Fn(HostEvent)>;

/// Best-effort text for a thrown JavaScript value.
pub fn describe(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{value:?}"))
}

fn js_error(operation: &'static str) -> impl Fn(JsValue) -> HostError {
    move |value| HostError::Js {
        operation,
        message: describe(&value),
    }
}

/// A JavaScript value as JSON; anything that does not serialise is `null`.
pub fn to_json(value: &JsValue) -> Value {
    JSON::stringify(value)
        .ok()
        .and_then(|s| s.as_string())
        .and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or(Value::Null)
}

fn to_js(value: &Value) -> Result<JsValue, JsValue> {
    JSON::parse(&value.to_string())
}

fn window() -> Result<Window, HostError> {
    web_sys::window().ok_or(HostError::NoDocument)
}

fn document() -> Result<Document, HostError> {
    window()?.document().ok_or(HostError::NoDocument)
}

/// Read `obj[key]`, treating `undefined` and `null` as absent.
fn property(obj: &JsValue, key: &str) -> Option<JsValue> {
    Reflect::get(obj, &JsValue::from_str(key))
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
}

// =============================================================================
// Page
// =============================================================================

/// The real page: script element in `document.head`, globals on `window`.
pub struct BrowserPage {
    sink: EventSink,
    data_callback: Option<Closure<dyn FnMut(JsValue)>>,
    popup_closed: Option<Closure<dyn FnMut(JsValue)>>,
    script_events: Vec<Closure<dyn FnMut()>>,
}

impl BrowserPage {
    pub fn new(sink: EventSink) -> Self {
        Self {
            sink,
            data_callback: None,
            popup_closed: None,
            script_events: Vec::new(),
        }
    }

    fn script(id: &str) -> Result<Element, HostError> {
        document()?
            .get_element_by_id(id)
            .ok_or_else(|| HostError::ScriptMissing(id.to_string()))
    }

    fn forward(&self, event: fn() -> HostEvent) -> Closure<dyn FnMut()> {
        let sink = Rc::clone(&self.sink);
        Closure::new(move || sink(event()))
    }
}

impl Page for BrowserPage {
    fn script_exists(&self, id: &str) -> bool {
        Self::script(id).is_ok()
    }

    fn insert_script(&mut self, id: &str, src: &str) -> Result<(), HostError> {
        let document = document()?;
        let script: HtmlScriptElement = document
            .create_element("script")
            .map_err(js_error("createElement"))?
            .dyn_into()
            .map_err(|_| HostError::Js {
                operation: "createElement",
                message: "not a script element".to_string(),
            })?;
        script.set_id(id);
        script.set_src(src);
        script.set_async(true);

        let on_load = self.forward(|| HostEvent::ScriptLoaded);
        let on_error = self.forward(|| HostEvent::ScriptFailed);
        script.set_onload(Some(on_load.as_ref().unchecked_ref()));
        script.set_onerror(Some(on_error.as_ref().unchecked_ref()));
        self.script_events.push(on_load);
        self.script_events.push(on_error);

        document
            .head()
            .ok_or(HostError::NoDocument)?
            .append_child(&script)
            .map_err(js_error("appendChild"))?;
        Ok(())
    }

    fn set_script_attribute(&mut self, id: &str, name: &str, value: &str) -> Result<(), HostError> {
        Self::script(id)?
            .set_attribute(name, value)
            .map_err(js_error("setAttribute"))
    }

    fn script_loaded(&self, id: &str) -> bool {
        Self::script(id)
            .ok()
            .and_then(|s| s.get_attribute("data-loaded"))
            .is_some_and(|v| v == "true")
    }

    fn mark_script_loaded(&mut self, id: &str) -> Result<(), HostError> {
        self.set_script_attribute(id, "data-loaded", "true")
    }

    fn widget_present(&self) -> bool {
        property(&js_sys::global(), "fastspring")
            .and_then(|fs| property(&fs, "builder"))
            .is_some()
    }

    fn install_callbacks(&mut self, data_callback: &str, popup_closed: &str) -> Result<(), HostError> {
        let window = window()?;

        let sink = Rc::clone(&self.sink);
        let on_data = Closure::<dyn FnMut(JsValue)>::new(move |payload: JsValue| {
            sink(HostEvent::Data(to_json(&payload)));
        });
        let sink = Rc::clone(&self.sink);
        let on_closed = Closure::<dyn FnMut(JsValue)>::new(move |order: JsValue| {
            sink(HostEvent::PopupClosed(OrderReference::from_value(&to_json(&order))));
        });

        Reflect::set(&window, &JsValue::from_str(data_callback), on_data.as_ref())
            .map_err(js_error("install data callback"))?;
        Reflect::set(&window, &JsValue::from_str(popup_closed), on_closed.as_ref())
            .map_err(js_error("install popup-closed callback"))?;

        // The globals now point at the new closures; the old ones can go.
        self.data_callback = Some(on_data);
        self.popup_closed = Some(on_closed);
        Ok(())
    }

    fn request_tick(&mut self) {
        let sink = Rc::clone(&self.sink);
        let tick = Closure::once_into_js(move || sink(HostEvent::Tick));
        let scheduled = window().ok().map(|w| {
            w.set_timeout_with_callback_and_timeout_and_arguments_0(tick.unchecked_ref(), 0)
        });
        if !matches!(scheduled, Some(Ok(_))) {
            warn!("could not schedule tick");
        }
    }

    fn alert(&mut self, message: &str) {
        if let Ok(window) = window() {
            let _ = window.alert_with_message(message);
        }
    }

    fn navigate(&mut self, url: &str) -> Result<(), HostError> {
        window()?
            .location()
            .replace(url)
            .map_err(js_error("location.replace"))
    }
}

// =============================================================================
// Widget
// =============================================================================

/// `window.fastspring.builder`.
#[derive(Debug, Default)]
pub struct SblWidget;

impl SblWidget {
    fn call(method: WidgetMethod, args: &Array) -> Result<(), WidgetError> {
        let unavailable = WidgetError::Unavailable { method };
        let builder = property(&js_sys::global(), "fastspring")
            .and_then(|fs| property(&fs, "builder"))
            .ok_or_else(|| unavailable.clone())?;
        let function: Function = property(&builder, &method.to_string())
            .and_then(|f| f.dyn_into().ok())
            .ok_or(unavailable)?;

        function
            .apply(&builder, args)
            .map(drop)
            .map_err(|e| WidgetError::Failed {
                method,
                message: describe(&e),
            })
    }
}

impl CheckoutWidget for SblWidget {
    fn push(&mut self, products: &[ProductLine]) -> Result<(), WidgetError> {
        let payload = to_js(&json!({ "products": products })).map_err(|e| WidgetError::Failed {
            method: WidgetMethod::Push,
            message: describe(&e),
        })?;
        Self::call(WidgetMethod::Push, &Array::of1(&payload))
    }

    fn update(&mut self, path: &str, quantity: u32) -> Result<(), WidgetError> {
        Self::call(
            WidgetMethod::Update,
            &Array::of2(&JsValue::from_str(path), &JsValue::from(quantity)),
        )
    }

    fn reset(&mut self) -> Result<(), WidgetError> {
        Self::call(WidgetMethod::Reset, &Array::new())
    }

    fn checkout(&mut self) -> Result<(), WidgetError> {
        Self::call(WidgetMethod::Checkout, &Array::new())
    }
}

// =============================================================================
// Storage
// =============================================================================

/// `window.localStorage`; reads and writes are no-ops when storage is blocked.
#[derive(Debug, Default)]
pub struct LocalStore;

impl LocalStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    fn set(&mut self, key: &str, value: &str) {
        if let Some(storage) = Self::storage() {
            if storage.set_item(key, value).is_err() {
                warn!(key, "localStorage write failed");
            }
        }
    }
}
