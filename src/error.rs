// HTTP API Error Types
use axum::{response::IntoResponse, http::StatusCode, Json};
use serde_json::{json, Value};
use std::collections::HashMap;

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    ValidationFailed {
        message: String,
        field_errors: Option<HashMap<String, String>>,
    },

    // 404 Not Found
    NotFound(String),

    // 405 Method Not Allowed
    MethodNotAllowed(String),

    // 500 Internal Server Error
    InternalServerError(String),

    // 500 with a synthetic body: no response was obtainable from the backend
    UpstreamUnavailable {
        message: String,
        detail: Option<String>,
    },
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::ValidationFailed { .. } => 400,
            ApiError::NotFound(_) => 404,
            ApiError::MethodNotAllowed(_) => 405,
            ApiError::InternalServerError(_) => 500,
            ApiError::UpstreamUnavailable { .. } => 500,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::ValidationFailed { message, .. } => message,
            ApiError::NotFound(msg) => msg,
            ApiError::MethodNotAllowed(msg) => msg,
            ApiError::InternalServerError(msg) => msg,
            ApiError::UpstreamUnavailable { message, .. } => message,
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        match self {
            ApiError::ValidationFailed { message, field_errors } => {
                let mut response = json!({
                    "error": true,
                    "message": message,
                    "code": "VALIDATION_FAILED"
                });

                if let Some(field_errors) = field_errors {
                    response["field_errors"] = json!(field_errors);
                }

                response
            }
            ApiError::UpstreamUnavailable { message, detail } => {
                let mut response = json!({
                    "error": true,
                    "message": message,
                    "code": "UPSTREAM_UNAVAILABLE"
                });

                if let Some(detail) = detail {
                    response["detail"] = json!(detail);
                }

                response
            }
            _ => {
                json!({
                    "error": true,
                    "message": self.message(),
                    "code": self.error_code()
                })
            }
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::ValidationFailed { .. } => "VALIDATION_FAILED",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::MethodNotAllowed(_) => "METHOD_NOT_ALLOWED",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
            ApiError::UpstreamUnavailable { .. } => "UPSTREAM_UNAVAILABLE",
        }
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn validation_failed(
        message: impl Into<String>,
        field_errors: Option<HashMap<String, String>>,
    ) -> Self {
        ApiError::ValidationFailed {
            message: message.into(),
            field_errors,
        }
    }

    /// Validation failure naming a single missing parameter
    pub fn missing_field(field: impl Into<String>) -> Self {
        let field = field.into();
        let mut field_errors = HashMap::new();
        field_errors.insert(field.clone(), "This field is required".to_string());
        ApiError::ValidationFailed {
            message: format!("Missing required parameter: {}", field),
            field_errors: Some(field_errors),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn method_not_allowed(message: impl Into<String>) -> Self {
        ApiError::MethodNotAllowed(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn upstream_unavailable(message: impl Into<String>, detail: Option<String>) -> Self {
        ApiError::UpstreamUnavailable {
            message: message.into(),
            detail,
        }
    }
}

// Convert backend client failures to ApiError
impl From<crate::backend::BackendError> for ApiError {
    fn from(err: crate::backend::BackendError) -> Self {
        match err {
            crate::backend::BackendError::Transport(detail) => {
                tracing::error!("Backend transport failure: {}", detail);
                ApiError::upstream_unavailable("Backend service unreachable", Some(detail))
            }
            crate::backend::BackendError::Status { status, .. } => {
                // Structured upstream errors are relayed verbatim by the proxy layer;
                // reaching this conversion means a non-relaying caller hit one.
                tracing::error!("Backend returned error status {}", status);
                ApiError::internal_server_error("Backend request failed")
            }
            crate::backend::BackendError::Decode(detail) => {
                tracing::error!("Backend payload malformed: {}", detail);
                ApiError::internal_server_error("Backend returned an unreadable response")
            }
            crate::backend::BackendError::InvalidBaseUrl(detail) => {
                tracing::error!("Backend base URL misconfigured: {}", detail);
                ApiError::internal_server_error("Backend address misconfigured")
            }
        }
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}
