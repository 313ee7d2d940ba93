//! Startup orchestration.
//!
//! Opens the store, builds the metrics registry, binds the listener and
//! serves until a shutdown signal, then closes the store.

use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::ServiceConfig;
use crate::http::{AppState, HttpServer};
use crate::lifecycle::{signals, Shutdown};
use crate::observability::MetricsRegistry;
use crate::store::{Store, StoreError};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to open database: {0}")]
    Store(#[from] StoreError),
    #[error("failed to build metrics registry: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Run the service until SIGINT/SIGTERM.
pub async fn run(config: ServiceConfig) -> Result<(), StartupError> {
    let shutdown = Shutdown::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        signals::wait_for_signal().await;
        trigger.trigger();
    });

    serve(config, shutdown).await
}

/// Run the service until `shutdown` is triggered.
pub async fn serve(config: ServiceConfig, shutdown: Shutdown) -> Result<(), StartupError> {
    let stop = shutdown.subscribe();
    let store = Store::connect(&config.database).await?;
    let metrics = Arc::new(MetricsRegistry::new()?);

    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .map_err(|source| StartupError::Bind {
            address: config.listener.bind_address.clone(),
            source,
        })?;
    tracing::info!(
        address = %listener.local_addr()?,
        swagger = %config.docs.swagger_path,
        "Listening for connections"
    );

    let state = AppState {
        store: store.clone(),
        metrics,
    };
    let result = HttpServer::new(&config, state)
        .run(listener, stop)
        .await;

    store.close().await;
    tracing::info!("Database closed");
    result.map_err(StartupError::from)
}
