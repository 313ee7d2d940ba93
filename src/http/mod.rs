//! HTTP layer.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (middleware stack: request id, trace, timeout, body limit)
//!     → handlers/ (instrumented, extract → validate → store → respond)
//!         via extract.rs (JSON and path extractors with JSON rejections)
//!     → error.rs (ApiError → status code + JSON body)
//!
//! Outside the instrumented set:
//!     /metrics → Prometheus text
//!     /, swagger, /static → docs.rs
//! ```

pub mod docs;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod request;
pub mod server;

pub use error::{ApiError, ApiErrorBody, ApiResult};
pub use server::{AppState, HttpServer};
