//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the API, metrics and docs routes
//! - Wire up middleware (request ID, tracing, timeout, body limit)
//! - Serve on a bound listener until shutdown is signalled
//!
//! # Layer order (outermost first)
//! ```text
//! SetRequestId → Trace → PropagateRequestId → BodyLimit → routes
//! ```
//!
//! The request timeout is a route layer of the API handlers, beneath the
//! instrumentation, so timed-out calls are measured like any other.

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::ServiceConfig;
use crate::http::{docs, handlers, request};
use crate::observability::metrics::{metrics_endpoint, MetricsRegistry};
use crate::store::Store;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub metrics: Arc<MetricsRegistry>,
}

/// HTTP server for the catalog API.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(config: &ServiceConfig, state: AppState) -> Self {
        Self {
            router: Self::build_router(config, state),
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        let metrics = Router::new()
            .route("/metrics", get(metrics_endpoint))
            .with_state(state.metrics.clone());

        Router::new()
            .merge(handlers::routes(
                state,
                Duration::from_secs(config.timeouts.request_secs),
            ))
            .merge(metrics)
            .merge(docs::routes(&config.docs))
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(
                        request::X_REQUEST_ID,
                        MakeRequestUuid,
                    ))
                    .layer(TraceLayer::new_for_http().make_span_with(request::make_request_span))
                    .layer(PropagateRequestIdLayer::new(request::X_REQUEST_ID))
                    .layer(DefaultBodyLimit::disable())
                    .layer(RequestBodyLimitLayer::new(config.security.max_body_size)),
            )
    }

    /// The fully layered router, for driving requests without a socket.
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Serve on `listener` until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Draining in-flight requests");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
