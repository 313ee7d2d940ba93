//! Metrics collection and exposition.
//!
//! # Metrics
//! - `bikeshop_requests_total` (counter): handled API requests, errors included
//! - `bikeshop_request_latency_seconds` (histogram): handler latency
//! - `bikeshop_response_size_bytes` (histogram): response body size
//!
//! # Design Decisions
//! - No global recorder: the registry is built once and handed to whoever needs it
//! - Metric handles are resolved at construction; recording is atomic updates
//! - Histogram buckets are explicit so `/metrics` emits real Prometheus histograms

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
};
use metrics::{Counter, Histogram, Key, Level, Metadata, Recorder};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};

pub const REQUESTS_TOTAL: &str = "bikeshop_requests_total";
pub const REQUEST_LATENCY: &str = "bikeshop_request_latency_seconds";
pub const RESPONSE_SIZE: &str = "bikeshop_response_size_bytes";

/// Content type of the Prometheus text exposition format.
pub const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

const LATENCY_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.075, 0.1, 0.25, 0.5, 0.75, 1.0, 2.5, 5.0, 7.5, 10.0,
];

const SIZE_BUCKETS: &[f64] = &[
    64.0, 256.0, 1024.0, 4096.0, 16384.0, 65536.0, 262144.0, 1048576.0,
];

/// Process-wide request metrics, shared through `AppState`.
#[derive(Clone)]
pub struct MetricsRegistry {
    handle: PrometheusHandle,
    requests: Counter,
    latency: Histogram,
    response_size: Histogram,
}

impl MetricsRegistry {
    pub fn new() -> Result<Self, BuildError> {
        let recorder = PrometheusBuilder::new()
            .set_buckets_for_metric(Matcher::Full(REQUEST_LATENCY.to_string()), LATENCY_BUCKETS)?
            .set_buckets_for_metric(Matcher::Full(RESPONSE_SIZE.to_string()), SIZE_BUCKETS)?
            .build_recorder();

        recorder.describe_counter(REQUESTS_TOTAL.into(), None, "Total number of requests".into());
        recorder.describe_histogram(
            REQUEST_LATENCY.into(),
            None,
            "Request latency in seconds".into(),
        );
        recorder.describe_histogram(RESPONSE_SIZE.into(), None, "Response size in bytes".into());

        let metadata = Metadata::new(module_path!(), Level::INFO, Some(module_path!()));
        let requests = recorder.register_counter(&Key::from_static_name(REQUESTS_TOTAL), &metadata);
        let latency = recorder.register_histogram(&Key::from_static_name(REQUEST_LATENCY), &metadata);
        let response_size =
            recorder.register_histogram(&Key::from_static_name(RESPONSE_SIZE), &metadata);

        Ok(Self {
            handle: recorder.handle(),
            requests,
            latency,
            response_size,
        })
    }

    /// Record one handled request.
    pub fn record_request(&self, latency: Duration, response_bytes: u64) {
        self.latency.record(latency.as_secs_f64());
        self.response_size.record(response_bytes as f64);
        self.requests.increment(1);
    }

    /// Current values in Prometheus text format.
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// `GET /metrics`.
pub async fn metrics_endpoint(State(metrics): State<Arc<MetricsRegistry>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)],
        metrics.render(),
    )
}
