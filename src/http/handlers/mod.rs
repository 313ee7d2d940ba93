//! API handlers for the catalog resources.
//!
//! Every handler follows the same order: extract, validate, call the store,
//! log the business event, respond. Failures are [`ApiError`]s and never
//! escape as panics; a panic that does happen becomes a 500 JSON body.
//!
//! # Route layers (outermost first)
//! ```text
//! instrument → CatchPanic → Timeout (408) → handler
//! ```

pub mod bikes;
pub mod categories;

use std::any::Any;
use std::time::Duration;

use axum::{
    http::Method,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, timeout::TimeoutLayer};

use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::observability::instrument;

/// Stable handler name for a matched route, used for span names and logs.
pub fn handler_name(method: &Method, route: &str) -> &'static str {
    match (method.as_str(), route) {
        ("GET", "/categories") => "get_categories",
        ("POST", "/categories") => "create_category",
        ("GET", "/categories/{id}") => "get_category",
        ("PUT", "/categories/{id}") => "update_category",
        ("DELETE", "/categories/{id}") => "delete_category",
        ("GET", "/bikes") => "get_bikes",
        ("POST", "/bikes") => "create_bike",
        ("GET", "/bikes/{id}") => "get_bike",
        ("PUT", "/bikes/{id}") => "update_bike",
        ("DELETE", "/bikes/{id}") => "delete_bike",
        _ => "unknown",
    }
}

/// The resource routes, instrumented. A handler running past
/// `request_timeout` is answered with 408 and still measured.
#[allow(deprecated)]
pub fn routes(state: AppState, request_timeout: Duration) -> Router {
    let metrics = state.metrics.clone();

    Router::new()
        .route(
            "/categories",
            get(categories::get_categories).post(categories::create_category),
        )
        .route(
            "/categories/{id}",
            get(categories::get_category)
                .put(categories::update_category)
                .delete(categories::delete_category),
        )
        .route("/bikes", get(bikes::get_bikes).post(bikes::create_bike))
        .route(
            "/bikes/{id}",
            get(bikes::get_bike)
                .put(bikes::update_bike)
                .delete(bikes::delete_bike),
        )
        .route_layer(TimeoutLayer::new(request_timeout))
        .route_layer(CatchPanicLayer::custom(panic_response))
        .route_layer(middleware::from_fn_with_state(metrics, instrument))
        .with_state(state)
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("non-string panic payload");
    tracing::error!(panic = detail, "Handler panicked");
    ApiError::internal().into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_every_route() {
        assert_eq!(handler_name(&Method::GET, "/categories"), "get_categories");
        assert_eq!(handler_name(&Method::POST, "/bikes"), "create_bike");
        assert_eq!(handler_name(&Method::PUT, "/bikes/{id}"), "update_bike");
        assert_eq!(
            handler_name(&Method::DELETE, "/categories/{id}"),
            "delete_category"
        );
    }

    #[test]
    fn unknown_combinations() {
        assert_eq!(handler_name(&Method::PATCH, "/bikes/{id}"), "unknown");
        assert_eq!(handler_name(&Method::GET, "/metrics"), "unknown");
    }

    #[tokio::test]
    async fn panic_becomes_internal_error() {
        let response = panic_response(Box::new("boom"));
        assert_eq!(
            response.status(),
            axum::http::StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
