use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Error types for menu operations
#[derive(Debug, thiserror::Error)]
pub enum MenuError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Category not found")]
    CategoryNotFound,

    #[error("Food item not found")]
    ItemNotFound,

    #[error("Category '{0}' already exists")]
    DuplicateCategory(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<sqlx::Error> for MenuError {
    fn from(err: sqlx::Error) -> Self {
        MenuError::DatabaseError(err.to_string())
    }
}

impl MenuError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            MenuError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            MenuError::CategoryNotFound | MenuError::ItemNotFound => StatusCode::NOT_FOUND,
            MenuError::DuplicateCategory(_) => StatusCode::CONFLICT,
            MenuError::ValidationError(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for MenuError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_message = match self {
            MenuError::DatabaseError(msg) => {
                tracing::error!("Menu database error: {}", msg);
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
        assert_eq!(MenuError::ItemNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(MenuError::CategoryNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            MenuError::DuplicateCategory("Starters".to_string()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            MenuError::from(sqlx::Error::PoolTimedOut).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_database_detail_not_leaked() {
        let response = MenuError::DatabaseError("relation food_items does not exist".to_string())
            .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
