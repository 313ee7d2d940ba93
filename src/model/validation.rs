//! Field-level input validation shared by both entities.

use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// One rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    /// Name of the JSON field.
    pub field: String,
    /// Why the value was rejected.
    pub message: String,
}

/// Every field problem found in one payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("invalid input: {}", describe(.errors))]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

fn describe(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{} {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }

    /// `Ok(value)` when nothing was recorded.
    pub fn finish<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

/// Records a problem if `name` is blank or longer than `max_chars`.
pub(crate) fn check_name(errors: &mut ValidationErrors, field: &str, name: &str, max_chars: usize) {
    if name.trim().is_empty() {
        errors.push(field, "must not be empty");
    } else if name.chars().count() > max_chars {
        errors.push(field, format!("must be at most {max_chars} characters"));
    }
}

/// Unwraps a required field, recording it as missing when absent.
pub(crate) fn require<T>(errors: &mut ValidationErrors, field: &str, value: Option<T>) -> Option<T> {
    if value.is_none() {
        errors.push(field, "is required");
    }
    value
}
