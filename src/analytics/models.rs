use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// The order fields analytics needs
#[derive(Debug, Clone, FromRow)]
pub struct OrderRecord {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub customer_id: Uuid,
    pub total_amount: Decimal,
    pub rating: Option<i32>,
    pub created_at: NaiveDateTime,
}

/// The order-item fields analytics needs
#[derive(Debug, Clone, FromRow)]
pub struct OrderItemRecord {
    pub order_id: Uuid,
    pub food_item_id: Uuid,
    pub quantity: i32,
    pub total_price: Decimal,
}

/// A food item ranked by quantity sold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TopItem {
    pub food_item_id: Uuid,
    /// Total quantity sold in the window
    pub orders: i64,
    pub revenue: Decimal,
}

/// Restaurant performance over one period; computed on request, never stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AnalyticsReport {
    /// The period as requested
    #[schema(example = "today")]
    pub period: String,
    pub revenue: Decimal,
    pub orders: i64,
    pub avg_order_value: Decimal,
    pub customers: i64,
    /// Mean customer rating, 0 when nothing was rated
    pub rating: Decimal,
    pub total_ratings: i64,
    pub top_items: Vec<TopItem>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct AnalyticsQuery {
    /// today, week, month or year; anything else reports today
    pub period: Option<String>,
}
