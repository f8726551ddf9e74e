//! HTTP middleware.
//!
//! Layer order, outermost first: Sentry (binary only), `TraceLayer`,
//! request id.

pub mod request_id;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
