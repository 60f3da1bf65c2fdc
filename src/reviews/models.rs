use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::orders::OrderStatus;

/// What a review rates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReviewType {
    /// The food and the restaurant; also recorded as the order's rating
    Restaurant,
    /// The delivery partner
    Delivery,
}

impl ReviewType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewType::Restaurant => "restaurant",
            ReviewType::Delivery => "delivery",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Review {
    pub id: Uuid,
    pub order_id: Uuid,
    pub customer_id: Uuid,
    pub restaurant_id: Uuid,
    pub delivery_partner_id: Option<Uuid>,
    #[schema(example = 4)]
    pub rating: i32,
    pub review_text: Option<String>,
    pub review_type: ReviewType,
    /// The restaurant's reply
    pub response: Option<String>,
    pub responded_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

/// Request body for POST /api/restaurant/reviews
///
/// Customer, restaurant and delivery partner are taken from the order.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateReviewRequest {
    pub order_id: Uuid,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,
    #[validate(length(max = 1000, message = "Review must not exceed 1000 characters"))]
    pub review_text: Option<String>,
    pub review_type: ReviewType,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RespondToReviewRequest {
    #[validate(length(min = 1, max = 1000, message = "Response must be 1-1000 characters"))]
    pub response: String,
}

/// The order fields a review is checked against
#[derive(Debug, Clone, FromRow)]
pub struct ReviewableOrder {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub restaurant_id: Uuid,
    pub delivery_partner_id: Option<Uuid>,
    pub order_status: OrderStatus,
}

/// A checked review ready to insert
#[derive(Debug, Clone, PartialEq)]
pub struct NewReview {
    pub order_id: Uuid,
    pub customer_id: Uuid,
    pub restaurant_id: Uuid,
    pub delivery_partner_id: Option<Uuid>,
    pub rating: i32,
    pub review_text: Option<String>,
    pub review_type: ReviewType,
    pub created_at: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_range() {
        let mut request = CreateReviewRequest {
            order_id: Uuid::new_v4(),
            rating: 5,
            review_text: Some("Crisp dosa, hot sambar".to_string()),
            review_type: ReviewType::Restaurant,
        };
        assert!(request.validate().is_ok());

        request.rating = 0;
        assert!(request.validate().is_err());
        request.rating = 6;
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_review_text_length() {
        let request = CreateReviewRequest {
            order_id: Uuid::new_v4(),
            rating: 3,
            review_text: Some("a".repeat(1001)),
            review_type: ReviewType::Delivery,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_empty_response_rejected() {
        let request = RespondToReviewRequest {
            response: String::new(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_review_type_wire_format() {
        let parsed: ReviewType = serde_json::from_str("\"delivery\"").unwrap();
        assert_eq!(parsed, ReviewType::Delivery);
        assert_eq!(ReviewType::Restaurant.as_str(), "restaurant");
    }
}
