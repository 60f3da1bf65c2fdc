use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde_json::json;

use crate::orders::PaymentMethod;

/// Error types for order operations
#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Order not found")]
    NotFound,

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("Invalid status transition: {0}")]
    InvalidTransition(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Order subtotal {subtotal} is below the minimum order amount {minimum}")]
    BelowMinimum { minimum: Decimal, subtotal: Decimal },

    #[error("Coupon '{0}' is not applicable to this order")]
    CouponNotApplicable(String),

    #[error("Coupon '{0}' is no longer redeemable")]
    CouponExhausted(String),

    #[error("{0}")]
    AmountOutOfRange(String),

    #[error("Restaurant '{0}' is not accepting orders")]
    RestaurantClosed(String),

    #[error("Restaurant does not accept {0:?} payments")]
    PaymentMethodNotAccepted(PaymentMethod),

    #[error("Order number collision")]
    DuplicateOrderNumber,
}

impl From<sqlx::Error> for OrderError {
    fn from(err: sqlx::Error) -> Self {
        OrderError::DatabaseError(err.to_string())
    }
}

impl OrderError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            OrderError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            OrderError::DuplicateOrderNumber => StatusCode::INTERNAL_SERVER_ERROR,
            OrderError::NotFound => StatusCode::NOT_FOUND,
            OrderError::InvalidQuantity(_)
            | OrderError::InvalidTransition(_)
            | OrderError::ValidationError(_)
            | OrderError::BelowMinimum { .. }
            | OrderError::CouponNotApplicable(_)
            | OrderError::AmountOutOfRange(_)
            | OrderError::PaymentMethodNotAccepted(_) => StatusCode::BAD_REQUEST,
            OrderError::RestaurantClosed(_) => StatusCode::CONFLICT,
            OrderError::CouponExhausted(_) => StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for OrderError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_message = match self {
            OrderError::DatabaseError(msg) => {
                tracing::error!("Order database error: {}", msg);
                "A database error occurred".to_string()
            }
            OrderError::DuplicateOrderNumber => {
                tracing::error!("Could not allocate a unique order number");
                "An internal server error occurred".to_string()
            }
            OrderError::InvalidTransition(msg) => msg,
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_status_codes() {
        assert_eq!(OrderError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            OrderError::CouponExhausted("ONCE".to_string()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            OrderError::BelowMinimum {
                minimum: dec!(100),
                subtotal: dec!(80)
            }
            .status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_amount_out_of_range_is_bad_request() {
        let err = OrderError::AmountOutOfRange("Order total exceeds 99999999.99".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_below_minimum_message() {
        let err = OrderError::BelowMinimum {
            minimum: dec!(100.00),
            subtotal: dec!(80.50),
        };
        assert_eq!(
            err.to_string(),
            "Order subtotal 80.50 is below the minimum order amount 100.00"
        );
    }
}
