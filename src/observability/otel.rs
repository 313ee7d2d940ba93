//! Distributed tracing export.
//!
//! # Responsibilities
//! - Build the OTLP/HTTP span exporter
//! - Batch spans client-side before they leave the process
//! - Tag every span with `service.name`
//!
//! # Design Decisions
//! - Optional: disabled by default, switched on by `observability.tracing_enabled`
//! - Export is fire-and-forget; collector outages only show up in our own logs
//! - Built before the async runtime starts, since the exporter uses a blocking
//!   HTTP client on the batch processor's own thread

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_otlp::{ExporterBuildError, SpanExporter, WithExportConfig};
use opentelemetry_sdk::trace::{SdkTracerProvider, Tracer};
use opentelemetry_sdk::Resource;

use crate::config::ObservabilityConfig;

/// Tracer provider exporting to the configured collector in batches.
pub fn tracer_provider(config: &ObservabilityConfig) -> Result<SdkTracerProvider, ExporterBuildError> {
    let exporter = SpanExporter::builder()
        .with_http()
        .with_endpoint(config.otlp_endpoint.clone())
        .build()?;

    let resource = Resource::builder()
        .with_service_name(config.service_name.clone())
        .build();

    Ok(SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(resource)
        .build())
}

pub fn tracer(provider: &SdkTracerProvider, config: &ObservabilityConfig) -> Tracer {
    provider.tracer(config.service_name.clone())
}

/// Flush pending spans and stop the exporter.
pub fn shutdown(provider: SdkTracerProvider) {
    if let Err(e) = provider.shutdown() {
        tracing::warn!(error = %e, "Trace exporter did not shut down cleanly");
    }
}
