// Authentication and authorization error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// Authentication and authorization error types
#[derive(Debug, Error)]
pub enum AuthError {
    // Authentication errors
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token has expired")]
    ExpiredToken,
    #[error("Missing authentication token")]
    MissingToken,
    #[error("Token generation error: {0}")]
    TokenGenerationError(String),

    // Authorization errors
    /// User's role is not in the set the route allows
    #[error("Insufficient permissions: requires one of [{allowed}], user has role '{actual}'")]
    InsufficientPermissions { allowed: String, actual: String },
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            AuthError::InvalidToken => {
                warn!("Invalid token attempt");
                "Could not validate credentials".to_string()
            }
            AuthError::ExpiredToken => {
                warn!("Expired token attempt");
                "Token has expired".to_string()
            }
            AuthError::MissingToken => {
                warn!("Missing token in request");
                "Missing authentication token".to_string()
            }
            AuthError::TokenGenerationError(msg) => {
                error!("Token generation error: {}", msg);
                "Internal server error".to_string()
            }
            AuthError::InsufficientPermissions { .. } => "Not authorized".to_string(),
        };

        let mut response = (status, Json(json!({ "error": message }))).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                axum::http::header::WWW_AUTHENTICATE,
                axum::http::HeaderValue::from_static("Bearer"),
            );
        }
        response
    }
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::ExpiredToken => StatusCode::UNAUTHORIZED,
            AuthError::MissingToken => StatusCode::UNAUTHORIZED,
            AuthError::TokenGenerationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::InsufficientPermissions { .. } => StatusCode::FORBIDDEN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AuthError::MissingToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::ExpiredToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AuthError::InsufficientPermissions {
                allowed: "admin".to_string(),
                actual: "customer".to_string(),
            }
            .status_code(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(AuthError::ExpiredToken.to_string(), "Token has expired");
        assert_eq!(
            AuthError::InsufficientPermissions {
                allowed: "admin, restaurant_owner".to_string(),
                actual: "customer".to_string(),
            }
            .to_string(),
            "Insufficient permissions: requires one of [admin, restaurant_owner], user has role 'customer'"
        );
    }

    #[test]
    fn test_unauthorized_response_carries_challenge() {
        let response = AuthError::InvalidToken.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(axum::http::header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }
}
