use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::validation::{validate_coupon_code, validate_positive_price};

/// Order status enum representing the lifecycle of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    ReadyForPickup,
    PickedUp,
    Delivered,
    Cancelled,
    Refunded,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 8] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::ReadyForPickup,
        OrderStatus::PickedUp,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
        OrderStatus::Refunded,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::ReadyForPickup => "ready_for_pickup",
            OrderStatus::PickedUp => "picked_up",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Refunded => "refunded",
        }
    }

    /// Delivered, cancelled and refunded orders no longer move through the kitchen
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Delivered | OrderStatus::Cancelled | OrderStatus::Refunded
        )
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payment status enum representing the payment state of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Refunded,
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Pending
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    Upi,
    Wallet,
}

/// Domain model representing an order in the database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Order {
    pub id: Uuid,
    #[schema(example = "UK20240615042317")]
    pub order_number: String,
    pub customer_id: Uuid,
    pub restaurant_id: Uuid,
    pub delivery_partner_id: Option<Uuid>,
    pub delivery_address_id: Option<Uuid>,
    pub coupon_id: Option<Uuid>,
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub delivery_fee: Decimal,
    pub discount_amount: Decimal,
    pub total_amount: Decimal,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub order_status: OrderStatus,
    pub special_instructions: Option<String>,
    pub cancellation_reason: Option<String>,
    /// Customer rating, 1 to 5
    pub rating: Option<i32>,
    pub review: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Domain model representing a line within an order
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub food_item_id: Uuid,
    pub variant_id: Option<Uuid>,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
    pub special_instructions: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Request DTO for one order line
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct OrderLineRequest {
    pub food_item_id: Uuid,
    pub variant_id: Option<Uuid>,
    #[validate(range(min = 1, max = 1000, message = "Quantity must be between 1 and 1000"))]
    pub quantity: i32,
    #[validate(custom = "validate_positive_price")]
    #[schema(example = "149.00")]
    pub unit_price: Decimal,
    pub special_instructions: Option<String>,
}

/// Request DTO for creating a new order
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateOrderRequest {
    pub customer_id: Uuid,
    pub restaurant_id: Uuid,
    #[validate(length(min = 1, message = "Order must contain at least one item"))]
    pub items: Vec<OrderLineRequest>,
    #[validate(custom = "validate_coupon_code")]
    pub coupon_code: Option<String>,
    pub payment_method: PaymentMethod,
    pub delivery_address_id: Option<Uuid>,
    pub special_instructions: Option<String>,
}

/// Request DTO for updating order status
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignDeliveryRequest {
    pub delivery_partner_id: Uuid,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CancelOrderRequest {
    #[validate(length(min = 1, max = 500, message = "Reason must be 1-500 characters"))]
    pub reason: String,
}

/// Response DTO for an order with its lines
#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Fully priced order ready to persist
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub order_number: String,
    pub customer_id: Uuid,
    pub restaurant_id: Uuid,
    pub delivery_address_id: Option<Uuid>,
    pub coupon_id: Option<Uuid>,
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub delivery_fee: Decimal,
    pub discount_amount: Decimal,
    pub total_amount: Decimal,
    pub payment_method: PaymentMethod,
    pub special_instructions: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub food_item_id: Uuid,
    pub variant_id: Option<Uuid>,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
    pub special_instructions: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_status_wire_names() {
        for status in OrderStatus::ALL {
            let json = serde_json::to_value(status).unwrap();
            assert_eq!(json, serde_json::Value::String(status.as_str().to_string()));
        }
        assert_eq!(
            serde_json::from_str::<OrderStatus>("\"ready_for_pickup\"").unwrap(),
            OrderStatus::ReadyForPickup
        );
    }

    #[test]
    fn test_terminal_statuses() {
        let terminal: Vec<_> = OrderStatus::ALL.iter().filter(|s| s.is_terminal()).collect();
        assert_eq!(
            terminal,
            vec![&OrderStatus::Delivered, &OrderStatus::Cancelled, &OrderStatus::Refunded]
        );
    }

    #[test]
    fn test_create_request_validation() {
        let line = OrderLineRequest {
            food_item_id: Uuid::new_v4(),
            variant_id: None,
            quantity: 2,
            unit_price: dec!(120),
            special_instructions: None,
        };
        let mut request = CreateOrderRequest {
            customer_id: Uuid::new_v4(),
            restaurant_id: Uuid::new_v4(),
            items: vec![line.clone()],
            coupon_code: Some("WELCOME50".to_string()),
            payment_method: PaymentMethod::Upi,
            delivery_address_id: None,
            special_instructions: None,
        };
        assert!(request.validate().is_ok());

        request.coupon_code = Some("x".to_string());
        assert!(request.validate().is_err());

        request.coupon_code = None;
        request.items.clear();
        assert!(request.validate().is_err());

        let mut bad_line = line.clone();
        bad_line.quantity = 0;
        assert!(bad_line.validate().is_err());

        let mut huge_price = line;
        huge_price.unit_price = Decimal::MAX;
        assert!(huge_price.validate().is_err());
        huge_price.unit_price = dec!(99999999.99);
        assert!(huge_price.validate().is_ok());
    }
}
