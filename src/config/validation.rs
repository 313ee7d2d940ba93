//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, pool size >= 1)
//! - Reject doc paths that would shadow API routes
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ServiceConfig;

/// Paths the swagger UI may not be mounted under.
const RESERVED_PREFIXES: &[&str] = &["/static", "/metrics", "/categories", "/bikes"];

/// A single semantic problem in a configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    /// Dotted path of the offending key, e.g. `database.path`.
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if config.database.path.trim().is_empty() {
        errors.push(ValidationError::new("database.path", "must not be empty"));
    }
    if config.database.max_connections == 0 {
        errors.push(ValidationError::new(
            "database.max_connections",
            "must be at least 1",
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new(
            "timeouts.request_secs",
            "must be greater than 0",
        ));
    }
    if config.security.max_body_size == 0 {
        errors.push(ValidationError::new(
            "security.max_body_size",
            "must be greater than 0",
        ));
    }

    let obs = &config.observability;
    if !matches!(obs.log_format.as_str(), "pretty" | "json") {
        errors.push(ValidationError::new(
            "observability.log_format",
            format!("expected 'pretty' or 'json', got '{}'", obs.log_format),
        ));
    }
    if obs.tracing_enabled && obs.otlp_endpoint.trim().is_empty() {
        errors.push(ValidationError::new(
            "observability.otlp_endpoint",
            "required when tracing is enabled",
        ));
    }

    let swagger = config.docs.swagger_path.as_str();
    if !swagger.starts_with('/') || swagger.len() < 2 {
        errors.push(ValidationError::new(
            "docs.swagger_path",
            "must be an absolute path other than '/'",
        ));
    } else if let Some(taken) = RESERVED_PREFIXES
        .iter()
        .find(|p| swagger == **p || swagger.starts_with(&format!("{p}/")))
    {
        errors.push(ValidationError::new(
            "docs.swagger_path",
            format!("must not live under {taken}"),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
