//! Integration tests for the HTTP routes, driven through the router with
//! `tower::ServiceExt::oneshot`.

#![allow(clippy::unwrap_used)]

use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
    response::Response,
};
use popup_demo_core::{Configuration, PresetKey, codec};
use popup_demo_integration_tests::{BASE_URL, STOREFRONT, test_state};
use serde_json::{Value, json};
use tower::ServiceExt;
use url::Url;

async fn send(request: Request<Body>) -> Response {
    popup_demo_storefront::app(test_state())
        .oneshot(request)
        .await
        .unwrap()
}

async fn get(uri: &str) -> Response {
    send(Request::get(uri).body(Body::empty()).unwrap()).await
}

async fn post_json(uri: &str, body: &Value) -> Response {
    send(
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: Response) -> Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

fn resolve_uri(hash: &str) -> String {
    let url = Url::parse_with_params("http://localhost/api/share/resolve", &[("hash", hash)]).unwrap();
    format!("{}?{}", url.path(), url.query().unwrap_or_default())
}

// =============================================================================
// Health and request ids
// =============================================================================

#[tokio::test]
async fn test_health() {
    let response = get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let response = send(
        Request::get("/health")
            .header("x-request-id", "req-42")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.headers().get("x-request-id").unwrap(), "req-42");

    let generated = get("/health").await;
    assert!(generated.headers().contains_key("x-request-id"));
}

// =============================================================================
// Share API
// =============================================================================

#[tokio::test]
async fn test_create_share_link() {
    let response = post_json(
        "/api/share",
        &json!({
            "industry": "gaming",
            "storefrontId": STOREFRONT,
            "brand": { "companyName": "Acme", "palette": { "accent": "#123456" } }
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let link = body_json(response).await;
    let hash = link["hash"].as_str().unwrap();
    let url = link["url"].as_str().unwrap();
    assert!(hash.starts_with("#v3_"));
    assert_eq!(url, format!("{BASE_URL}demo{hash}"));

    let config = codec::decode(hash).unwrap();
    assert_eq!(config.storefront_id, STOREFRONT);
    assert_eq!(config.brand.company_name, "Acme");
}

#[tokio::test]
async fn test_create_share_link_requires_storefront() {
    let response = post_json("/api/share", &json!({ "industry": "saas", "storefrontId": "  " })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains("storefront"));

    // A preset alone is enough.
    let response = post_json("/api/share", &json!({ "presetKey": "s" })).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_resolve_share_link() {
    let config = Configuration::from_preset(PresetKey::Mobile);
    let hash = codec::encode(&config);

    let response = get(&resolve_uri(&hash)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let resolution = body_json(response).await;
    assert_eq!(resolution["found"], true);
    assert_eq!(resolution["layout"], "mobile");
    assert_eq!(
        resolution["config"]["storefrontId"],
        PresetKey::Mobile.storefront()
    );
    assert_eq!(resolution["theme"], serde_json::to_value(config.theme()).unwrap());
}

#[tokio::test]
async fn test_resolve_unknown_link_falls_back() {
    let resolution = body_json(get(&resolve_uri("#v3_%%%")).await).await;
    assert_eq!(resolution["found"], false);
    assert_eq!(resolution["layout"], "saas");

    let empty = body_json(get("/api/share/resolve").await).await;
    assert_eq!(empty["found"], false);
}

#[tokio::test]
async fn test_presets() {
    let response = get("/api/presets").await;
    assert_eq!(response.status(), StatusCode::OK);

    let presets = body_json(response).await;
    let codes: Vec<&str> = presets
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["code"].as_str().unwrap())
        .collect();
    assert_eq!(codes, ["m", "g", "e", "s"]);
}

#[tokio::test]
async fn test_preset_lookup() {
    let gaming = body_json(get("/api/presets/g").await).await;
    assert_eq!(gaming["storefront"], PresetKey::Gaming.storefront());
    assert_eq!(gaming["layout"], "gaming");

    assert_eq!(get("/api/presets/z").await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_share_request() {
    let response = send(
        Request::post("/api/share")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.starts_with("Bad request"));
}

// =============================================================================
// Pages
// =============================================================================

#[tokio::test]
async fn test_builder_page() {
    let response = get("/").await;
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers().get(header::CONTENT_TYPE).unwrap();
    assert!(content_type.to_str().unwrap().starts_with("text/html"));
    assert!(body_text(response).await.contains("popup_demo_web.js"));
}

#[tokio::test]
async fn test_purchase_success_shows_order() {
    let response = get("/purchase_success?orderId=ORD-1001").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("ORD-1001"));

    let without = body_text(get("/purchase_success").await).await;
    assert!(!without.contains("Order reference"));
}

#[tokio::test]
async fn test_unknown_route() {
    assert_eq!(get("/nope").await.status(), StatusCode::NOT_FOUND);
}
