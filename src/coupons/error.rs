use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Error types for coupon operations
#[derive(Debug, thiserror::Error)]
pub enum CouponError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Coupon not found")]
    NotFound,

    #[error("Coupon code '{0}' already exists")]
    DuplicateCode(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<sqlx::Error> for CouponError {
    fn from(err: sqlx::Error) -> Self {
        CouponError::DatabaseError(err.to_string())
    }
}

impl CouponError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            CouponError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CouponError::NotFound => StatusCode::NOT_FOUND,
            CouponError::DuplicateCode(_) => StatusCode::CONFLICT,
            CouponError::ValidationError(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for CouponError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_message = match self {
            CouponError::DatabaseError(msg) => {
                tracing::error!("Coupon database error: {}", msg);
                "A database error occurred".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "error": error_message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(CouponError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            CouponError::DuplicateCode("WELCOME".to_string()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            CouponError::ValidationError("bad".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            CouponError::from(sqlx::Error::PoolClosed).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
