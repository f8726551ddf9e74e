//! Page route handlers.
//!
//! The pages are shells: the builder and the demo are driven by the wasm
//! bundle under `/pkg`, which reads settings from `localStorage` or the share
//! fragment in the browser.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::Query, response::IntoResponse};
use popup_demo_core::{PresetKey, WidgetScript};
use serde::Deserialize;
use tracing::instrument;

/// A preset offered by the builder.
#[derive(Debug, Clone)]
pub struct PresetOption {
    pub code: &'static str,
    pub industry: &'static str,
    pub storefront: &'static str,
}

impl From<PresetKey> for PresetOption {
    fn from(key: PresetKey) -> Self {
        Self {
            code: key.code(),
            industry: key.industry(),
            storefront: key.storefront(),
        }
    }
}

/// Builder page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/builder.html")]
pub struct BuilderTemplate {
    pub presets: Vec<PresetOption>,
    pub widget_src: &'static str,
}

/// Demo page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/demo.html")]
pub struct DemoTemplate {
    pub widget_src: &'static str,
}

/// Purchase success page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/purchase_success.html")]
pub struct PurchaseSuccessTemplate {
    pub order_id: Option<String>,
}

/// Query parameters for the purchase success page.
#[derive(Debug, Deserialize)]
pub struct PurchaseSuccessQuery {
    #[serde(rename = "orderId")]
    pub order_id: Option<String>,
}

/// Display the builder.
#[instrument]
pub async fn builder() -> impl IntoResponse {
    BuilderTemplate {
        presets: PresetKey::ALL.into_iter().map(PresetOption::from).collect(),
        widget_src: WidgetScript::DEFAULT_SRC,
    }
}

/// Display the demo shell.
#[instrument]
pub async fn demo() -> impl IntoResponse {
    DemoTemplate {
        widget_src: WidgetScript::DEFAULT_SRC,
    }
}

/// Display the thank-you page after checkout.
#[instrument(skip(query))]
pub async fn purchase_success(Query(query): Query<PurchaseSuccessQuery>) -> impl IntoResponse {
    PurchaseSuccessTemplate {
        order_id: query.order_id.filter(|id| !id.trim().is_empty()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_lists_presets() {
        let html = BuilderTemplate {
            presets: PresetKey::ALL.into_iter().map(PresetOption::from).collect(),
            widget_src: WidgetScript::DEFAULT_SRC,
        }
        .render()
        .unwrap();
        for key in PresetKey::ALL {
            assert!(html.contains(key.storefront()));
        }
    }

    #[test]
    fn test_purchase_success_shows_order() {
        let html = PurchaseSuccessTemplate {
            order_id: Some("ORD-<1>".to_string()),
        }
        .render()
        .unwrap();
        assert!(html.contains("ORD-&#60;1&#62;") || html.contains("ORD-&lt;1&gt;"));

        let html = PurchaseSuccessTemplate { order_id: None }.render().unwrap();
        assert!(!html.contains("Order reference"));
    }
}
