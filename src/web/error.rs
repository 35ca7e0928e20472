//! API error handling for the dashboard API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::collections::HashMap;

use crate::RevdashError;

/// API error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Bad request (400).
    BadRequest,
    /// Not found (404).
    NotFound,
    /// Validation error (422) - for field-level validation errors.
    ValidationError,
    /// Unprocessable entity (422).
    UnprocessableEntity,
    /// Internal server error (500).
    InternalError,
    /// Upstream service failure (502).
    BadGateway,
}

impl ErrorCode {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::BadRequest => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::UnprocessableEntity => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::BadGateway => StatusCode::BAD_GATEWAY,
        }
    }
}

/// API error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Error details.
    pub error: ErrorDetail,
}

/// Error detail.
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    /// Error code.
    pub code: ErrorCode,
    /// Human-readable message.
    pub message: String,
    /// Field-level validation error details (only present for validation errors).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Vec<String>>>,
}

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    code: ErrorCode,
    message: String,
    details: Option<HashMap<String, Vec<String>>>,
}

impl ApiError {
    /// Create a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Create a new API error with field-level details.
    pub fn with_details(
        code: ErrorCode,
        message: impl Into<String>,
        details: HashMap<String, Vec<String>>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            details: Some(details),
        }
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Create a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    /// Create a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Create an unprocessable entity error.
    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::UnprocessableEntity, message)
    }

    /// Create an internal server error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Create an upstream failure error.
    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadGateway, message)
    }

    /// Create a validation error with field-level details.
    pub fn validation(details: HashMap<String, Vec<String>>) -> Self {
        Self::with_details(ErrorCode::ValidationError, "Validation failed", details)
    }

    /// Create a validation error from validator::ValidationErrors.
    pub fn from_validation_errors(errors: validator::ValidationErrors) -> Self {
        let mut details: HashMap<String, Vec<String>> = HashMap::new();

        for (field, field_errors) in errors.field_errors() {
            let messages: Vec<String> = field_errors
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value for {}", field))
                })
                .collect();
            details.insert(field.to_string(), messages);
        }

        Self::validation(details)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.code.status_code();
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
                details: self.details,
            },
        };
        (status, Json(body)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<RevdashError> for ApiError {
    fn from(err: RevdashError) -> Self {
        match &err {
            RevdashError::NotFound(_) => ApiError::not_found(err.to_string()),
            RevdashError::Validation(msg) => ApiError::unprocessable(msg.clone()),
            RevdashError::ExternalService(msg) => {
                tracing::error!("Upstream error: {}", msg);
                ApiError::bad_gateway(msg.clone())
            }
            _ => {
                tracing::error!("Internal error: {}", err);
                ApiError::internal("An internal error occurred")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_status() {
        assert_eq!(ErrorCode::BadRequest.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorCode::ValidationError.status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ErrorCode::InternalError.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(ErrorCode::BadGateway.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_from_revdash_error() {
        let err: ApiError = RevdashError::Validation("bad role".into()).into();
        assert_eq!(err.code(), ErrorCode::UnprocessableEntity);
        assert_eq!(err.message, "bad role");

        let err: ApiError = RevdashError::Database("disk I/O error".into()).into();
        assert_eq!(err.code(), ErrorCode::InternalError);
        assert_eq!(err.message, "An internal error occurred");

        let err: ApiError = RevdashError::ExternalService("timed out".into()).into();
        assert_eq!(err.code(), ErrorCode::BadGateway);

        let err: ApiError = RevdashError::NotFound("room".into()).into();
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.message, "room not found");
    }

    #[test]
    fn test_validation_error() {
        let mut details = HashMap::new();
        details.insert("content".to_string(), vec!["Must not be empty".to_string()]);

        let err = ApiError::validation(details);
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "Validation failed");
        assert_eq!(
            err.details.unwrap().get("content").unwrap(),
            &vec!["Must not be empty".to_string()]
        );
    }
}
