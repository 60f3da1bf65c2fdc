use chrono::NaiveDateTime;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use crate::coupons::CouponRepository;
use crate::db::is_unique_violation;
use crate::orders::error::OrderError;
use crate::orders::{NewOrder, NewOrderItem, Order, OrderItem, OrderStatus};

const ORDER_COLUMNS: &str = "id, order_number, customer_id, restaurant_id, delivery_partner_id, \
     delivery_address_id, coupon_id, subtotal, tax_amount, delivery_fee, discount_amount, \
     total_amount, payment_method, payment_status, order_status, special_instructions, \
     cancellation_reason, rating, review, created_at, updated_at";

const ORDER_ITEM_COLUMNS: &str = "id, order_id, food_item_id, variant_id, quantity, unit_price, \
     total_price, special_instructions, created_at";

/// A coupon redemption that must succeed for the order to be written
#[derive(Debug, Clone)]
pub struct CouponRedemption {
    pub coupon_id: Uuid,
    pub code: String,
}

/// Repository for order operations
#[derive(Clone)]
pub struct OrdersRepository {
    pool: PgPool,
}

impl OrdersRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new order with items in a transaction
    ///
    /// When `redemption` is set the coupon's usage counter is bumped in the
    /// same transaction; an exhausted coupon rolls the whole order back.
    pub async fn create(
        &self,
        order: &NewOrder,
        items: &[NewOrderItem],
        redemption: Option<&CouponRedemption>,
    ) -> Result<Order, OrderError> {
        let mut tx = self.pool.begin().await?;

        if let Some(redemption) = redemption {
            if !CouponRepository::try_redeem(&mut *tx, redemption.coupon_id, order.created_at).await? {
                return Err(OrderError::CouponExhausted(redemption.code.clone()));
            }
        }

        let inserted = sqlx::query_as::<_, Order>(&format!(
            r#"
            INSERT INTO orders (order_number, customer_id, restaurant_id, delivery_address_id,
                                coupon_id, subtotal, tax_amount, delivery_fee, discount_amount,
                                total_amount, payment_method, special_instructions,
                                created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $13)
            RETURNING {}
            "#,
            ORDER_COLUMNS
        ))
        .bind(&order.order_number)
        .bind(order.customer_id)
        .bind(order.restaurant_id)
        .bind(order.delivery_address_id)
        .bind(order.coupon_id)
        .bind(order.subtotal)
        .bind(order.tax_amount)
        .bind(order.delivery_fee)
        .bind(order.discount_amount)
        .bind(order.total_amount)
        .bind(order.payment_method)
        .bind(&order.special_instructions)
        .bind(order.created_at)
        .fetch_one(&mut *tx)
        .await;

        let created = match inserted {
            Ok(created) => created,
            Err(e) if is_unique_violation(&e) => return Err(OrderError::DuplicateOrderNumber),
            Err(e) => return Err(e.into()),
        };

        for item in items {
            sqlx::query(
                r#"
                INSERT INTO order_items (order_id, food_item_id, variant_id, quantity,
                                         unit_price, total_price, special_instructions, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(created.id)
            .bind(item.food_item_id)
            .bind(item.variant_id)
            .bind(item.quantity)
            .bind(item.unit_price)
            .bind(item.total_price)
            .bind(&item.special_instructions)
            .bind(order.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(created)
    }

    pub async fn find_by_id(&self, order_id: Uuid) -> Result<Option<Order>, OrderError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {} FROM orders WHERE id = $1",
            ORDER_COLUMNS
        ))
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// Orders of one restaurant, newest first
    pub async fn find_by_restaurant(&self, restaurant_id: Uuid) -> Result<Vec<Order>, OrderError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {} FROM orders WHERE restaurant_id = $1 ORDER BY created_at DESC",
            ORDER_COLUMNS
        ))
        .bind(restaurant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    /// Set the order status; refunding an order also marks its payment refunded
    pub async fn update_status(
        &self,
        order_id: Uuid,
        new_status: OrderStatus,
        now: NaiveDateTime,
    ) -> Result<Order, OrderError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            r#"
            UPDATE orders
            SET order_status = $1,
                payment_status = CASE WHEN $1 = 'refunded' THEN 'refunded' ELSE payment_status END,
                updated_at = $2
            WHERE id = $3
            RETURNING {}
            "#,
            ORDER_COLUMNS
        ))
        .bind(new_status)
        .bind(now)
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(OrderError::NotFound)?;

        Ok(order)
    }

    pub async fn assign_delivery_partner(
        &self,
        order_id: Uuid,
        delivery_partner_id: Uuid,
        now: NaiveDateTime,
    ) -> Result<Order, OrderError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "UPDATE orders SET delivery_partner_id = $1, updated_at = $2 WHERE id = $3 RETURNING {}",
            ORDER_COLUMNS
        ))
        .bind(delivery_partner_id)
        .bind(now)
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(OrderError::NotFound)?;

        Ok(order)
    }

    pub async fn cancel(
        &self,
        order_id: Uuid,
        reason: &str,
        now: NaiveDateTime,
    ) -> Result<Order, OrderError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            r#"
            UPDATE orders
            SET order_status = 'cancelled', cancellation_reason = $1, updated_at = $2
            WHERE id = $3
            RETURNING {}
            "#,
            ORDER_COLUMNS
        ))
        .bind(reason)
        .bind(now)
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(OrderError::NotFound)?;

        Ok(order)
    }
}

/// Repository for order items operations
#[derive(Clone)]
pub struct OrderItemsRepository {
    pool: PgPool,
}

impl OrderItemsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find all items for a given order
    pub async fn find_by_order_id(&self, order_id: Uuid) -> Result<Vec<OrderItem>, OrderError> {
        let items = sqlx::query_as::<_, OrderItem>(&format!(
            "SELECT {} FROM order_items WHERE order_id = $1 ORDER BY created_at, id",
            ORDER_ITEM_COLUMNS
        ))
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Items for several orders in one query, grouped by order id
    pub async fn find_by_order_ids(
        &self,
        order_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<OrderItem>>, OrderError> {
        if order_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let items = sqlx::query_as::<_, OrderItem>(&format!(
            "SELECT {} FROM order_items WHERE order_id = ANY($1) ORDER BY created_at, id",
            ORDER_ITEM_COLUMNS
        ))
        .bind(order_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: HashMap<Uuid, Vec<OrderItem>> = HashMap::new();
        for item in items {
            grouped.entry(item.order_id).or_default().push(item);
        }
        Ok(grouped)
    }
}
