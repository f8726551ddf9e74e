//! Request correlation ids.
//!
//! A proxy-supplied `x-request-id` is kept when it is short printable ASCII;
//! anything else is replaced by a fresh UUID v4. The id lands in the current
//! span, on the Sentry scope and in the response headers.

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Span;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

const MAX_UPSTREAM_LEN: usize = 128;

/// The upstream id, if it is usable as-is.
fn upstream_id(headers: &HeaderMap) -> Option<&str> {
    let id = headers.get(REQUEST_ID_HEADER)?.to_str().ok()?.trim();
    let usable = !id.is_empty()
        && id.len() <= MAX_UPSTREAM_LEN
        && id.bytes().all(|b| b.is_ascii_graphic());
    usable.then_some(id)
}

/// Tag the request with a correlation id and echo it back.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let id = upstream_id(request.headers())
        .map_or_else(|| Uuid::new_v4().to_string(), ToString::to_string);

    Span::current().record("request_id", id.as_str());
    sentry::configure_scope(|scope| scope.set_tag("request_id", &id));

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
