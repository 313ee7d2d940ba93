//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use bikeshop::{observability::MetricsRegistry, AppState, HttpServer, ServiceConfig, Store};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

#[derive(Clone)]
pub struct TestApp {
    pub router: Router,
    pub metrics: Arc<MetricsRegistry>,
}

impl TestApp {
    /// Fully layered app over a fresh in-memory database.
    pub async fn new() -> Self {
        Self::with_config(ServiceConfig::default()).await
    }

    pub async fn with_config(config: ServiceConfig) -> Self {
        let store = Store::in_memory().await.unwrap();
        Self::with_store(config, store).await
    }

    /// App over the database file named by `config.database`.
    pub async fn file_backed(config: ServiceConfig) -> Self {
        let store = Store::connect(&config.database).await.unwrap();
        Self::with_store(config, store).await
    }

    pub async fn with_store(config: ServiceConfig, store: Store) -> Self {
        let metrics = Arc::new(MetricsRegistry::new().unwrap());
        let state = AppState {
            store,
            metrics: metrics.clone(),
        };
        let router = HttpServer::new(&config, state).into_router();
        Self { router, metrics }
    }

    pub async fn request(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Send an optional JSON body, return the status and parsed body
    /// (`Value::Null` when empty).
    pub async fn json(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.request(request).await;
        let status = response.status();
        (status, read_json(response).await)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.json(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.json(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.json(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.json(Method::DELETE, uri, None).await
    }

    /// Current value of an unlabelled sample on the metrics page.
    pub fn sample(&self, name: &str) -> f64 {
        self.metrics
            .render()
            .lines()
            .find_map(|l| l.strip_prefix(name)?.strip_prefix(' ')?.parse().ok())
            .unwrap_or(0.0)
    }
}

/// Default config with the database in a fresh temporary directory.
/// Keep the directory alive for as long as the app runs.
pub fn file_config() -> (ServiceConfig, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let mut config = ServiceConfig::default();
    config.database.path = dir.path().join("shop.db").to_string_lossy().into_owned();
    (config, dir)
}

pub async fn read_body(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap()
        .to_vec()
}

pub async fn read_json(response: Response) -> Value {
    let bytes = read_body(response).await;
    if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    }
}
