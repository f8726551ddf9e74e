//! Callback payload normalisation.
//!
//! The checkout widget reports cart state in one of two shapes:
//!
//! ```text
//! modern:  { "items":  [ { "path": "a", "quantity": 2, ... } ] }
//! legacy:  { "groups": [ { "items": [ { "path": "a", "quantity": 2, "selected": true } ] } ] }
//! ```
//!
//! [`CallbackPayload::parse`] resolves the shape once; everything downstream
//! works on a [`NormalizedCart`]. Parsing never fails: missing or mistyped
//! fields read as empty.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Keys that identify an item in the cart, in priority order.
const CART_PATH_KEYS: [&str; 4] = ["path", "product", "sku", "id"];

/// Keys that identify a product for cart actions, in priority order.
const PRODUCT_PATH_KEYS: [&str; 5] = ["path", "product", "sku", "id", "code"];

/// `true` for values a JavaScript `if (value)` would accept.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// A non-empty string or a non-zero number, as a string.
fn coerce_str(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if is_truthy(value) => Some(n.to_string()),
        _ => None,
    }
}

/// A numeric field, accepting numbers and numeric strings.
pub(crate) fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .filter(|f| f.is_finite())
}

// =============================================================================
// Items
// =============================================================================

/// One item as the widget reported it.
///
/// The widget sends many more fields than the cart logic reads (pricing,
/// images, discounts); all of them are kept for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartItem(Map<String, Value>);

impl CartItem {
    /// Wrap a raw value; anything that is not an object becomes an empty item.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => Self(map.clone()),
            _ => Self::default(),
        }
    }

    /// Item with just a path and quantity.
    #[must_use]
    pub fn with_path(path: &str, quantity: u32) -> Self {
        let mut map = Map::new();
        map.insert("path".to_string(), Value::from(path));
        map.insert("quantity".to_string(), Value::from(quantity));
        Self(map)
    }

    /// Raw field access.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// First non-empty string (or non-zero number) among `keys`.
    #[must_use]
    pub fn first_str(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|k| self.get(k).and_then(coerce_str))
    }

    /// Identifier used to match the item against a product path.
    #[must_use]
    pub fn cart_path(&self) -> String {
        self.first_str(&CART_PATH_KEYS)
            .map(|p| p.trim().to_string())
            .unwrap_or_default()
    }

    /// Identifier used when issuing widget calls for this item.
    #[must_use]
    pub fn product_path(&self) -> String {
        self.first_str(&PRODUCT_PATH_KEYS)
            .map(|p| p.trim().to_string())
            .unwrap_or_default()
    }

    /// Quantity; zero, missing or unparsable quantities count as one.
    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.get("quantity")
            .and_then(coerce_f64)
            .filter(|q| *q >= 1.0)
            .map_or(1, |q| {
                // Saturates at u32::MAX.
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let whole = q.floor() as u32;
                whole
            })
    }

    /// Whether a legacy group entry is in the cart.
    #[must_use]
    pub fn is_selected(&self) -> bool {
        self.get("selected").is_some_and(is_truthy)
    }

    /// Returns `true` if this item is the product at `path` (both trimmed).
    #[must_use]
    pub fn matches_path(&self, path: &str) -> bool {
        self.cart_path() == path.trim()
    }
}

/// Returns `true` if `item` is the product at `path`.
///
/// The item's identifier is the first of `path`, `product`, `sku`, `id` that
/// is present; both sides are trimmed.
#[must_use]
pub fn item_matches_path(item: &CartItem, path: &str) -> bool {
    item.matches_path(path)
}

// =============================================================================
// Payload
// =============================================================================

/// A catalog group of the legacy shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Group {
    pub items: Vec<CartItem>,
}

/// A callback payload with its shape resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum CallbackPayload {
    /// Flat item list. Catalog groups may ride along.
    Items { items: Vec<CartItem>, groups: Vec<Group> },
    /// Grouped catalog where cart membership is the `selected` flag.
    Groups { groups: Vec<Group> },
}

impl Default for CallbackPayload {
    fn default() -> Self {
        Self::Groups { groups: Vec::new() }
    }
}

fn items_of(value: Option<&Value>) -> Option<Vec<CartItem>> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().map(CartItem::from_value).collect())
}

impl CallbackPayload {
    /// Resolve the payload shape. An `items` array wins over `groups`.
    #[must_use]
    pub fn parse(value: &Value) -> Self {
        let groups = value
            .get("groups")
            .and_then(Value::as_array)
            .map(|groups| {
                groups
                    .iter()
                    .map(|g| Group {
                        items: items_of(g.get("items")).unwrap_or_default(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        match items_of(value.get("items")) {
            Some(items) => Self::Items { items, groups },
            None => Self::Groups { groups },
        }
    }

    fn groups(&self) -> &[Group] {
        match self {
            Self::Items { groups, .. } | Self::Groups { groups } => groups,
        }
    }

    /// Items currently in the cart, whatever the shape.
    #[must_use]
    pub fn cart_items(&self) -> Vec<CartItem> {
        match self {
            Self::Items { items, .. } => items.clone(),
            Self::Groups { groups } => groups
                .iter()
                .flat_map(|g| g.items.iter())
                .filter(|it| it.is_selected())
                .cloned()
                .collect(),
        }
    }

    /// Every catalog item of every group, selected or not.
    #[must_use]
    pub fn products(&self) -> Vec<CartItem> {
        self.groups()
            .iter()
            .flat_map(|g| g.items.iter().cloned())
            .collect()
    }

    /// The cart view used by actions and the pending controller.
    #[must_use]
    pub fn normalize(&self) -> NormalizedCart {
        NormalizedCart::new(self.cart_items())
    }

    /// Quantities per source, for diagnostics.
    #[must_use]
    pub fn counts(&self) -> CartCounts {
        let items_count = match self {
            Self::Items { items, .. } => items
                .iter()
                .map(CartItem::quantity)
                .fold(0, u32::saturating_add),
            Self::Groups { .. } => 0,
        };
        let selected_count = self
            .groups()
            .iter()
            .flat_map(|g| g.items.iter())
            .filter(|it| it.is_selected())
            .map(CartItem::quantity)
            .fold(0, u32::saturating_add);
        CartCounts {
            items_count,
            selected_count,
        }
    }
}

/// Items currently in the cart, for a raw payload.
#[must_use]
pub fn cart_items(payload: &Value) -> Vec<CartItem> {
    CallbackPayload::parse(payload).cart_items()
}

/// Total cart quantity, for a raw payload.
#[must_use]
pub fn cart_qty(payload: &Value) -> u32 {
    CallbackPayload::parse(payload).normalize().quantity()
}

/// Quantity totals from each part of a payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartCounts {
    /// Sum over the flat `items` list.
    pub items_count: u32,
    /// Sum over selected group entries.
    pub selected_count: u32,
}

/// The cart as one shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizedCart {
    items: Vec<CartItem>,
    quantity: u32,
}

impl NormalizedCart {
    #[must_use]
    pub fn new(items: Vec<CartItem>) -> Self {
        let quantity = items
            .iter()
            .map(CartItem::quantity)
            .fold(0_u32, u32::saturating_add);
        Self { items, quantity }
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Summed quantity of every item.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn find(&self, path: &str) -> Option<&CartItem> {
        self.items.iter().find(|it| it.matches_path(path))
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.find(path).is_some()
    }
}

// =============================================================================
// Action arguments
// =============================================================================

/// What a cart action was asked to act on: a path or a catalog item.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductRef {
    Path(String),
    Item(CartItem),
}

impl ProductRef {
    /// Resolve to a product path: the string itself, or the item's first
    /// `path`, `product`, `sku`, `id`, `code`. Trimmed; empty if none found.
    #[must_use]
    pub fn resolve(&self) -> String {
        match self {
            Self::Path(path) => path.trim().to_string(),
            Self::Item(item) => item.product_path(),
        }
    }

    /// Interpret a raw value: strings are paths, objects are items.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(s) => Self::Path(s.clone()),
            Value::Number(_) => Self::Path(coerce_str(value).unwrap_or_default()),
            other => Self::Item(CartItem::from_value(other)),
        }
    }
}

impl From<&str> for ProductRef {
    fn from(path: &str) -> Self {
        Self::Path(path.to_string())
    }
}

impl From<String> for ProductRef {
    fn from(path: String) -> Self {
        Self::Path(path)
    }
}

impl From<CartItem> for ProductRef {
    fn from(item: CartItem) -> Self {
        Self::Item(item)
    }
}

impl From<&CartItem> for ProductRef {
    fn from(item: &CartItem) -> Self {
        Self::Item(item.clone())
    }
}

/// Argument of the popup-closed callback.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl OrderReference {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
        }
    }

    /// Read the order id from a raw value, if it carries a usable one.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        Self {
            id: value.get("id").and_then(coerce_str),
        }
    }

    /// The order id, ignoring an empty one.
    #[must_use]
    pub fn order_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }
}
