//! Per-handler instrumentation middleware.
//!
//! Wraps each API handler: opens a span named after the handler, times the
//! call, measures the response body and counts the request. Handler errors,
//! panics and timeouts all arrive here as responses from the layers beneath.
//! A call dropped mid-flight is still recorded, as 499 with an empty body.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::HttpBody,
    extract::{MatchedPath, Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use tracing::{Instrument, Span};

use crate::http::handlers::handler_name;
use crate::http::request::request_id;
use crate::observability::metrics::MetricsRegistry;

/// Logged and counted for a call whose future was dropped before it
/// produced a response (client went away).
const CLIENT_CLOSED_REQUEST: u16 = 499;

pub async fn instrument(
    State(metrics): State<Arc<MetricsRegistry>>,
    request: Request,
    next: Next,
) -> Response {
    let handler = request
        .extensions()
        .get::<MatchedPath>()
        .map_or("unmatched", |path| handler_name(request.method(), path.as_str()));

    let span = tracing::info_span!(
        "handler",
        otel.name = handler,
        handler = handler,
        request_id = %request_id(request.headers()),
        http.status_code = tracing::field::Empty,
    );

    let measurement = Measurement {
        metrics,
        span: span.clone(),
        handler,
        start: Instant::now(),
        recorded: false,
    };
    let response = next.run(request).instrument(span).await;
    measurement.finish(response.status().as_u16(), body_len(&response));

    response
}

/// One in-flight handler call. Records exactly once: on `finish`, or on drop
/// if the call never completed.
struct Measurement {
    metrics: Arc<MetricsRegistry>,
    span: Span,
    handler: &'static str,
    start: Instant,
    recorded: bool,
}

impl Measurement {
    fn finish(mut self, status: u16, response_bytes: u64) {
        self.record(status, response_bytes);
    }

    fn record(&mut self, status: u16, response_bytes: u64) {
        self.recorded = true;
        let latency = self.start.elapsed();
        self.metrics.record_request(latency, response_bytes);

        let handler = self.handler;
        self.span.record("http.status_code", status);
        self.span.in_scope(|| {
            tracing::info!(
                handler,
                status,
                latency_ms = latency.as_secs_f64() * 1000.0,
                response_bytes,
                "Endpoint {handler} executed in {:.2} seconds",
                latency.as_secs_f64(),
            );
        });
    }
}

impl Drop for Measurement {
    fn drop(&mut self) {
        if !self.recorded {
            self.record(CLIENT_CLOSED_REQUEST, 0);
        }
    }
}

/// Exact body length when the body knows it, else the declared Content-Length.
fn body_len(response: &Response) -> u64 {
    response.body().size_hint().exact().unwrap_or_else(|| {
        response
            .headers()
            .get(header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use axum::{body::Body, http, http::StatusCode, middleware, routing::get, Router};
    use tower::ServiceExt;

    fn sample(metrics: &MetricsRegistry, name: &str) -> f64 {
        metrics
            .render()
            .lines()
            .find_map(|l| l.strip_prefix(name)?.strip_prefix(' ')?.parse().ok())
            .unwrap_or(0.0)
    }

    fn get_request(uri: &str) -> http::Request<Body> {
        http::Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn passes_response_through_and_counts_once() {
        let metrics = Arc::new(MetricsRegistry::new().unwrap());
        let app = Router::new()
            .route("/categories", get(|| async { (StatusCode::IM_A_TEAPOT, "short and stout") }))
            .route_layer(middleware::from_fn_with_state(metrics.clone(), instrument));

        let response = app
            .oneshot(get_request("/categories"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
        assert_eq!(body_len(&response), "short and stout".len() as u64);
        assert_eq!(sample(&metrics, "bikeshop_requests_total"), 1.0);
        assert_eq!(sample(&metrics, "bikeshop_response_size_bytes_sum"), 15.0);
    }

    #[tokio::test]
    async fn abandoned_calls_are_still_counted() {
        let metrics = Arc::new(MetricsRegistry::new().unwrap());
        let app = Router::new()
            .route(
                "/categories",
                get(|| std::future::pending::<&'static str>()),
            )
            .route_layer(middleware::from_fn_with_state(metrics.clone(), instrument));

        let call = app.oneshot(get_request("/categories"));
        let abandoned = tokio::time::timeout(Duration::from_millis(20), call).await;

        assert!(abandoned.is_err());
        assert_eq!(sample(&metrics, "bikeshop_requests_total"), 1.0);
        assert_eq!(sample(&metrics, "bikeshop_response_size_bytes_sum"), 0.0);
    }

    #[tokio::test]
    #[allow(deprecated)]
    async fn timed_out_calls_are_measured_as_408() {
        let metrics = Arc::new(MetricsRegistry::new().unwrap());
        let app = Router::new()
            .route(
                "/categories",
                get(|| std::future::pending::<&'static str>()),
            )
            .route_layer(tower_http::timeout::TimeoutLayer::new(Duration::from_millis(20)))
            .route_layer(middleware::from_fn_with_state(metrics.clone(), instrument));

        let response = app.oneshot(get_request("/categories")).await.unwrap();

        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(sample(&metrics, "bikeshop_requests_total"), 1.0);
    }

    #[tokio::test]
    async fn unmatched_paths_are_not_measured() {
        let metrics = Arc::new(MetricsRegistry::new().unwrap());
        let app = Router::new()
            .route("/categories", get(|| async { "ok" }))
            .route_layer(middleware::from_fn_with_state(metrics.clone(), instrument));

        let response = app
            .oneshot(get_request("/nowhere"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(sample(&metrics, "bikeshop_requests_total"), 0.0);
    }
}
