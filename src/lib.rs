//! Bikeshop catalog service.
//!
//! A CRUD API for bike categories and the bikes in them, persisted in SQLite
//! and served with Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http::server (request id, trace, timeout, body limit)
//!                         │
//!                         ▼
//!                     http::handlers ──▶ observability::instrument
//!                         │                 (span, metrics, completion log)
//!                         ▼
//!                     model (payload validation)
//!                         │
//!                         ▼
//!                     store (SQLite via sqlx)
//!
//!     Cross-cutting: config, observability (logs, metrics, OTLP spans),
//!     lifecycle (startup, signals, shutdown), http::docs (OpenAPI, Swagger UI)
//! ```

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod model;
pub mod observability;
pub mod store;

pub use config::ServiceConfig;
pub use http::{AppState, HttpServer};
pub use lifecycle::Shutdown;
pub use store::Store;
