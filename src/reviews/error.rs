use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Error types for review operations
#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Review not found")]
    NotFound,

    #[error("Order not found")]
    OrderNotFound,

    #[error("Only the order's customer or restaurant staff may review it")]
    Forbidden,

    #[error("Only delivered orders can be reviewed")]
    OrderNotDelivered,

    #[error("This order already has a {0} review")]
    DuplicateReview(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<sqlx::Error> for ReviewError {
    fn from(err: sqlx::Error) -> Self {
        ReviewError::DatabaseError(err.to_string())
    }
}

impl ReviewError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ReviewError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ReviewError::NotFound | ReviewError::OrderNotFound => StatusCode::NOT_FOUND,
            ReviewError::Forbidden => StatusCode::FORBIDDEN,
            ReviewError::OrderNotDelivered | ReviewError::DuplicateReview(_) => {
                StatusCode::CONFLICT
            }
            ReviewError::ValidationError(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ReviewError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_message = match self {
            ReviewError::DatabaseError(msg) => {
                tracing::error!("Review database error: {}", msg);
                "A database error occurred".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "error": error_message }))).into_response()
    }
}
