//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Every API handler call passes through:
//!     → instrument.rs (span + latency/size/count + completion log)
//!
//! which feeds:
//!     → logging.rs (structured log events, stdout)
//!     → metrics.rs (counter and histograms, scraped from /metrics)
//!     → otel.rs (spans batched to an OTLP collector, optional)
//! ```
//!
//! # Design Decisions
//! - Structured logging for machine parsing
//! - Request ID (x-request-id) on every request span
//! - Metrics are cheap (atomic increments)
//! - Span export is optional to reduce overhead when not needed

pub mod instrument;
pub mod logging;
pub mod metrics;
pub mod otel;

use opentelemetry_sdk::trace::SdkTracerProvider;
use thiserror::Error;

use crate::config::ObservabilityConfig;

pub use self::instrument::instrument;
pub use self::metrics::MetricsRegistry;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error(transparent)]
    Logging(#[from] logging::LoggingError),
    #[error("failed to build OTLP exporter: {0}")]
    Exporter(#[from] opentelemetry_otlp::ExporterBuildError),
}

/// Keeps the trace pipeline alive; call [`Telemetry::shutdown`] before exit so
/// batched spans are flushed.
#[must_use]
pub struct Telemetry {
    tracer_provider: Option<SdkTracerProvider>,
}

impl Telemetry {
    pub fn shutdown(self) {
        if let Some(provider) = self.tracer_provider {
            otel::shutdown(provider);
        }
    }
}

/// Install logging and, when enabled, OTLP span export.
pub fn init(config: &ObservabilityConfig) -> Result<Telemetry, TelemetryError> {
    let tracer_provider = if config.tracing_enabled {
        let provider = otel::tracer_provider(config)?;
        opentelemetry::global::set_tracer_provider(provider.clone());
        Some(provider)
    } else {
        None
    };

    let tracer = tracer_provider
        .as_ref()
        .map(|provider| otel::tracer(provider, config));
    logging::init_subscriber(config, tracer)?;

    if config.tracing_enabled {
        tracing::info!(
            endpoint = %config.otlp_endpoint,
            service = %config.service_name,
            "Span export enabled"
        );
    }

    Ok(Telemetry { tracer_provider })
}
