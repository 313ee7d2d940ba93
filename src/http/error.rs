//! API error type and HTTP response mapping.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::model::{FieldError, ValidationErrors};
use crate::store::StoreError;

pub type ApiResult<T> = Result<T, ApiError>;

/// JSON body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiErrorBody {
    /// Stable machine-readable error code.
    #[schema(example = "NOT_FOUND")]
    pub code: String,
    /// Human-readable message, safe for clients.
    pub message: String,
    /// Resource the error refers to (`category` or `bike`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    /// Rejected fields, for validation failures.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<FieldError>,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
    resource: Option<&'static str>,
    details: Vec<FieldError>,
}

impl ApiError {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            resource: None,
            details: Vec::new(),
        }
    }

    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, code, message)
    }

    pub fn not_found(resource: &'static str, id: i64) -> Self {
        Self {
            resource: Some(resource),
            ..Self::new(
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{resource} {id} not found"),
            )
        }
    }

    pub fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL",
            "internal server error",
        )
    }

    pub const fn status(&self) -> StatusCode {
        self.status
    }

    pub const fn code(&self) -> &'static str {
        self.code
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            code: self.code.to_string(),
            message: self.message,
            resource: self.resource.map(str::to_string),
            details: self.details,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::CategoryNotFound(id) => Self::not_found("category", id),
            StoreError::BikeNotFound(id) => Self::not_found("bike", id),
            StoreError::CategoryInUse { id, bikes } => Self {
                resource: Some("category"),
                ..Self::new(
                    StatusCode::CONFLICT,
                    "CATEGORY_IN_USE",
                    format!("category {id} still has {bikes} bike(s); delete or move them first"),
                )
            },
            StoreError::Database(e) => {
                tracing::error!(error = %e, "Database failure");
                Self::internal()
            }
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        Self {
            details: errors.into_errors(),
            ..Self::bad_request("VALIDATION_FAILED", "request body failed validation")
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => {
                Self::bad_request("INVALID_JSON", rejection.body_text())
            }
            JsonRejection::MissingJsonContentType(_) => Self::new(
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "UNSUPPORTED_MEDIA_TYPE",
                rejection.body_text(),
            ),
            other => Self::new(other.status(), "INVALID_BODY", other.body_text()),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::bad_request("INVALID_PATH", rejection.body_text())
    }
}
