use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Notification not found")]
    NotFound,

    #[error("Notifications belong to their recipient")]
    Forbidden,

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<sqlx::Error> for NotificationError {
    fn from(err: sqlx::Error) -> Self {
        NotificationError::DatabaseError(err.to_string())
    }
}

impl NotificationError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            NotificationError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            NotificationError::NotFound => StatusCode::NOT_FOUND,
            NotificationError::Forbidden => StatusCode::FORBIDDEN,
            NotificationError::ValidationError(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for NotificationError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_message = match self {
            NotificationError::DatabaseError(msg) => {
                tracing::error!("Notification database error: {}", msg);
                "A database error occurred".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "error": error_message }))).into_response()
    }
}
