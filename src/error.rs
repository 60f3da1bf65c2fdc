// Crate-wide API error type
// Handlers without a module-specific error return Result<T, ApiError>

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, error, warn};

/// Errors surfaced by the analytics and restaurant endpoints
///
/// Each variant maps to one HTTP status; database and internal details are
/// logged and replaced by a generic message in the response body.
#[derive(Debug)]
pub enum ApiError {
    /// Maps to HTTP 400 Bad Request
    ValidationError(validator::ValidationErrors),

    /// Maps to HTTP 403 Forbidden
    Forbidden(String),

    /// Maps to HTTP 404 Not Found
    NotFound { resource: String, id: String },

    /// Maps to HTTP 409 Conflict
    Conflict { message: String },

    /// Maps to HTTP 500 Internal Server Error
    DatabaseError(sqlx::Error),

    /// Maps to HTTP 500 Internal Server Error
    InternalError(String),
}

/// JSON body for every `ApiError` response
#[derive(Serialize)]
pub struct ErrorResponse {
    /// Machine-readable error code (e.g. "VALIDATION_ERROR", "NOT_FOUND")
    pub error_code: String,

    /// Human-readable message; also exposed as `error` for clients that only read that key
    pub error: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,

    /// RFC 3339 timestamp of when the error occurred
    pub timestamp: String,
}

impl ErrorResponse {
    fn new(error_code: &str, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.to_string(),
            error: message.into(),
            details: None,
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_response) = self.to_error_response();
        (status, Json(error_response)).into_response()
    }
}

impl ApiError {
    /// Convert to status code and body, logging at a level matching severity
    fn to_error_response(&self) -> (StatusCode, ErrorResponse) {
        let status = self.status_code();
        let body = match self {
            ApiError::ValidationError(errors) => {
                debug!("Validation error: {:?}", errors);
                ErrorResponse {
                    details: Some(
                        serde_json::to_value(errors).unwrap_or(serde_json::json!({})),
                    ),
                    ..ErrorResponse::new("VALIDATION_ERROR", "Request validation failed")
                }
            }
            ApiError::Forbidden(message) => {
                warn!("Forbidden access attempt: {}", message);
                ErrorResponse::new("FORBIDDEN", message.clone())
            }
            ApiError::NotFound { resource, id } => {
                debug!("Resource not found: {} with id {}", resource, id);
                ErrorResponse::new("NOT_FOUND", format!("{} not found", resource))
            }
            ApiError::Conflict { message } => {
                warn!("Conflict error: {}", message);
                ErrorResponse::new("CONFLICT", message.clone())
            }
            ApiError::DatabaseError(db_error) => {
                error!("Database error: {:?}", db_error);
                ErrorResponse::new("DATABASE_ERROR", "A database error occurred")
            }
            ApiError::InternalError(internal_msg) => {
                error!("Internal error: {}", internal_msg);
                ErrorResponse::new("INTERNAL_ERROR", "An internal server error occurred")
            }
        };
        (status, body)
    }

    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(error: sqlx::Error) -> Self {
        ApiError::DatabaseError(error)
    }
}

impl From<crate::storage::StorageError> for ApiError {
    fn from(error: crate::storage::StorageError) -> Self {
        match error {
            crate::storage::StorageError::Conflict(_) => ApiError::Conflict {
                message: error.to_string(),
            },
            other => ApiError::InternalError(other.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::ValidationError(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::NotFound {
                resource: "Restaurant".to_string(),
                id: "x".to_string()
            }
            .status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Conflict {
                message: "taken".to_string()
            }
            .status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::DatabaseError(sqlx::Error::RowNotFound).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_storage_conflict_maps_to_conflict() {
        let error: ApiError = crate::storage::StorageError::Conflict(uuid::Uuid::nil()).into();
        assert_eq!(error.status_code(), StatusCode::CONFLICT);

        let error: ApiError = crate::storage::StorageError::Backend("down".to_string()).into();
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_database_details_are_hidden() {
        let (status, body) =
            ApiError::InternalError("connection refused on 10.0.0.3".to_string()).to_error_response();

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error_code, "INTERNAL_ERROR");
        assert!(!body.error.contains("10.0.0.3"));
    }

    #[test]
    fn test_validation_details_included() {
        let errors = validator::ValidationErrors::new();
        let (status, body) = ApiError::ValidationError(errors).to_error_response();

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.details.is_some());
    }
}
