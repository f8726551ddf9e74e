//! Display helpers for catalog items: names, images, prices and discounts.

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::Serialize;
use serde_json::Value;

use crate::cart::{CartItem, coerce_f64, is_truthy};
use crate::types::{CurrencyCode, Price};

/// Display name; falls back to `"Product"`.
#[must_use]
pub fn name_of(item: &CartItem) -> String {
    item.first_str(&["display", "name", "product", "path"])
        .unwrap_or_else(|| "Product".to_string())
}

/// Image URL, or empty.
#[must_use]
pub fn image_of(item: &CartItem) -> String {
    item.first_str(&["image", "imageUrl", "imageURL"])
        .or_else(|| {
            item.get("images")
                .and_then(Value::as_array)
                .and_then(|images| images.first())
                .and_then(Value::as_str)
                .map(ToString::to_string)
        })
        .unwrap_or_default()
}

/// Formatted price text as sent by the widget, or empty.
#[must_use]
pub fn price_text(item: &CartItem) -> String {
    item.first_str(&["unitPrice", "price", "priceTotal"])
        .unwrap_or_default()
}

fn to_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            let text = n.to_string();
            text.parse::<Decimal>()
                .ok()
                .or_else(|| Decimal::from_scientific(&text).ok())
                .or_else(|| n.as_f64().and_then(Decimal::from_f64))
        }
        _ => None,
    }
}

/// Current numeric price, from the first numeric price field present.
#[must_use]
pub fn price_value(item: &CartItem) -> Option<Decimal> {
    ["unitPriceValue", "priceValue", "priceTotalValue"]
        .iter()
        .find_map(|k| item.get(k).filter(|v| !v.is_null()))
        .and_then(to_decimal)
}

fn currency_of(item: &CartItem) -> CurrencyCode {
    let sample = item
        .first_str(&["price", "unitPrice"])
        .unwrap_or_default();
    CurrencyCode::sniff(&sample)
}

fn number_at(value: Option<&Value>) -> f64 {
    value.and_then(coerce_f64).unwrap_or(0.0)
}

/// Discount state of a catalog item.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountInfo {
    pub on_sale: bool,
    pub percent: Decimal,
    pub percent_text: String,
    pub current_value: Option<Decimal>,
    pub current_text: String,
    pub original_value: Option<Decimal>,
    pub original_text: String,
    /// The widget already applied the discount to the numeric price.
    pub applied_now: bool,
}

/// Work out whether `item` is discounted and what it costs before and after.
///
/// An applied discount (`discountPercentValue`, `discount.data.percentValue`)
/// means the numeric price is already reduced; an offered one (first positive
/// `discountSet[].percentValue`) means the reduced price is derived here.
#[must_use]
pub fn discount_info(item: &CartItem) -> DiscountInfo {
    let applied_percent = item.get("discountPercentValue");
    let nested_percent = item
        .get("discount")
        .and_then(|d| d.get("data"))
        .and_then(|d| d.get("percentValue"));

    let pct_applied = Some(number_at(applied_percent))
        .filter(|p| *p != 0.0)
        .unwrap_or_else(|| number_at(nested_percent));
    let pct_offered = item
        .get("discountSet")
        .and_then(Value::as_array)
        .and_then(|set| {
            set.iter()
                .map(|d| number_at(d.get("percentValue")))
                .find(|p| *p > 0.0)
        })
        .unwrap_or(0.0);

    let applied_now = number_at(item.get("unitDiscountValue")) > 0.0
        || number_at(applied_percent) > 0.0
        || nested_percent.is_some_and(is_truthy);

    let pct = if applied_now { pct_applied } else { pct_offered };
    let percent = Decimal::from_f64(pct).unwrap_or_default().normalize();
    let on_sale = percent > Decimal::ZERO;

    let now = price_value(item);
    let factor = Decimal::ONE - percent / Decimal::ONE_HUNDRED;
    let (current_value, original_value) = match now {
        Some(now) if on_sale && applied_now => (Some(now), now.checked_div(factor)),
        Some(now) if on_sale => (Some(now * factor), Some(now)),
        _ => (None, None),
    };

    let currency = currency_of(item);
    let money = |v: Decimal| Price::new(v, currency).to_string();

    DiscountInfo {
        on_sale,
        percent,
        percent_text: if on_sale {
            format!("{percent}%")
        } else {
            String::new()
        },
        current_value,
        current_text: current_value.map_or_else(|| price_text(item), money),
        original_value,
        original_text: original_value.map(money).unwrap_or_default(),
        applied_now,
    }
}

/// The item to feature on a landing banner.
///
/// With `prefer_discounted`, the item with the largest discount wins; ties go
/// to the earlier item. Otherwise, or when nothing is on sale, the first item.
#[must_use]
pub fn pick_featured(items: &[CartItem], prefer_discounted: bool) -> Option<(&CartItem, DiscountInfo)> {
    if prefer_discounted {
        let best = items
            .iter()
            .map(|it| (it, discount_info(it)))
            .filter(|(_, d)| d.on_sale)
            .reduce(|best, next| if next.1.percent > best.1.percent { next } else { best });
        if best.is_some() {
            return best;
        }
    }
    items.first().map(|it| (it, discount_info(it)))
}

/// What a product tile shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCard {
    pub name: String,
    pub path: String,
    pub image: String,
    pub price: String,
    pub discount: DiscountInfo,
}

impl ProductCard {
    #[must_use]
    pub fn from_item(item: &CartItem) -> Self {
        Self::with_discount(item, discount_info(item))
    }

    fn with_discount(item: &CartItem, discount: DiscountInfo) -> Self {
        Self {
            name: name_of(item),
            path: item.product_path(),
            image: image_of(item),
            price: price_text(item),
            discount,
        }
    }

    /// Card for the featured item of `items`; see [`pick_featured`].
    #[must_use]
    pub fn featured(items: &[CartItem], prefer_discounted: bool) -> Option<Self> {
        pick_featured(items, prefer_discounted).map(|(item, discount)| Self::with_discount(item, discount))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn item(value: &Value) -> CartItem {
        CartItem::from_value(value)
    }

    #[test]
    fn test_name_and_image() {
        let it = item(&json!({ "path": "p", "name": "Pro Plan", "images": ["a.png", "b.png"] }));
        assert_eq!(name_of(&it), "Pro Plan");
        assert_eq!(image_of(&it), "a.png");
        assert_eq!(name_of(&item(&json!({}))), "Product");
        assert_eq!(image_of(&item(&json!({}))), "");
    }

    #[test]
    fn test_price_value() {
        let it = item(&json!({ "unitPriceValue": 19.99, "price": "$19.99" }));
        assert_eq!(price_value(&it), Some(Decimal::new(1999, 2)));
        assert_eq!(price_text(&it), "$19.99");
        assert_eq!(price_value(&item(&json!({ "priceValue": "12" }))), None);
    }

    #[test]
    fn test_applied_discount() {
        let it = item(&json!({
            "priceValue": 40,
            "price": "€40.00",
            "discountPercentValue": 20,
        }));
        let d = discount_info(&it);
        assert!(d.on_sale);
        assert!(d.applied_now);
        assert_eq!(d.percent_text, "20%");
        assert_eq!(d.current_value, Some(Decimal::from(40)));
        assert_eq!(d.original_value, Some(Decimal::from(50)));
        assert_eq!(d.original_text, "€50.00");
    }

    #[test]
    fn test_offered_discount() {
        let it = item(&json!({
            "priceValue": 50,
            "price": "$50.00",
            "discountSet": [{ "percentValue": 0 }, { "percentValue": "10" }],
        }));
        let d = discount_info(&it);
        assert!(d.on_sale);
        assert!(!d.applied_now);
        assert_eq!(d.current_value, Some(Decimal::from(45)));
        assert_eq!(d.current_text, "$45.00");
        assert_eq!(d.original_text, "$50.00");
    }

    #[test]
    fn test_full_discount_does_not_divide_by_zero() {
        let it = item(&json!({ "priceValue": 0, "discountPercentValue": 100 }));
        let d = discount_info(&it);
        assert!(d.on_sale);
        assert_eq!(d.original_value, None);
        assert_eq!(d.original_text, "");
    }

    #[test]
    fn test_no_discount() {
        let it = item(&json!({ "priceValue": 10, "price": "£10.00" }));
        let d = discount_info(&it);
        assert!(!d.on_sale);
        assert_eq!(d.current_text, "£10.00");
        assert_eq!(d.percent_text, "");
    }

    #[test]
    fn test_pick_featured() {
        let items = vec![
            item(&json!({ "path": "a", "priceValue": 10 })),
            item(&json!({ "path": "b", "priceValue": 10, "discountSet": [{ "percentValue": 10 }] })),
            item(&json!({ "path": "c", "priceValue": 10, "discountPercentValue": 30 })),
        ];
        let (best, disc) = pick_featured(&items, true).unwrap();
        assert_eq!(best.cart_path(), "c");
        assert_eq!(disc.percent, Decimal::from(30));

        let (first, _) = pick_featured(&items, false).unwrap();
        assert_eq!(first.cart_path(), "a");
        assert!(pick_featured(&[], true).is_none());
    }

    #[test]
    fn test_product_card() {
        let items = vec![
            item(&json!({ "path": "basic", "display": "Basic", "price": "$10.00" })),
            item(&json!({
                "path": "pro",
                "display": "Pro",
                "priceValue": 20,
                "price": "$20.00",
                "discountSet": [{ "percentValue": 25 }]
            })),
        ];
        let card = ProductCard::from_item(items.first().unwrap());
        assert_eq!(card.name, "Basic");
        assert_eq!(card.path, "basic");
        assert_eq!(card.price, "$10.00");
        assert!(!card.discount.on_sale);

        let featured = ProductCard::featured(&items, true).unwrap();
        assert_eq!(featured.path, "pro");
        assert!(featured.discount.on_sale);
        assert_eq!(ProductCard::featured(&items, false).unwrap().path, "basic");
        assert!(ProductCard::featured(&[], true).is_none());
    }
}
