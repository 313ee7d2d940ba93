//! Request correlation.
//!
//! # Responsibilities
//! - Name the request-id header shared by every layer
//! - Build the outer per-request span carrying that id
//!
//! # Design Decisions
//! - The id is assigned by `SetRequestIdLayer` before any span opens, so
//!   both the outer span and the handler span can read it from the headers
//! - Client-supplied ids are kept as they are

use axum::body::Body;
use axum::http::{HeaderMap, HeaderName, Request};
use tracing::Span;

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// The request id, or `"unknown"` if none was assigned.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(&X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Span for one HTTP request, used by the trace layer.
pub fn make_request_span(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id(request.headers()),
    )
}
