use chrono::NaiveDateTime;
use sqlx::PgPool;
use uuid::Uuid;

use crate::analytics::{OrderItemRecord, OrderRecord};

/// Read-only access to the order data analytics summarises
#[derive(Clone)]
pub struct AnalyticsRepository {
    pool: PgPool,
}

impl AnalyticsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Orders of a restaurant created at or after `since`
    pub async fn fetch_orders(
        &self,
        restaurant_id: Uuid,
        since: NaiveDateTime,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        sqlx::query_as::<_, OrderRecord>(
            r#"
            SELECT id, restaurant_id, customer_id, total_amount, rating, created_at
            FROM orders
            WHERE restaurant_id = $1 AND created_at >= $2
            ORDER BY created_at
            "#,
        )
        .bind(restaurant_id)
        .bind(since)
        .fetch_all(&self.pool)
        .await
    }

    /// Items of those same orders, in insertion order
    pub async fn fetch_items(
        &self,
        restaurant_id: Uuid,
        since: NaiveDateTime,
    ) -> Result<Vec<OrderItemRecord>, sqlx::Error> {
        sqlx::query_as::<_, OrderItemRecord>(
            r#"
            SELECT oi.order_id, oi.food_item_id, oi.quantity, oi.total_price
            FROM order_items oi
            JOIN orders o ON o.id = oi.order_id
            WHERE o.restaurant_id = $1 AND o.created_at >= $2
            ORDER BY o.created_at, oi.created_at, oi.id
            "#,
        )
        .bind(restaurant_id)
        .bind(since)
        .fetch_all(&self.pool)
        .await
    }
}
