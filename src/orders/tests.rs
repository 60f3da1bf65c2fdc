// Order placement against PostgreSQL: coupon redemption and persisted totals.
// Run with `cargo test -- --ignored` and DATABASE_URL pointing at a server.

use std::sync::Arc;

use axum::http::StatusCode;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use rust_decimal_macros::dec;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::coupons::{Coupon, CouponRepository, CreateCouponRequest};
use crate::orders::*;
use crate::restaurants::Restaurant;
use crate::storage::InMemoryStorage;

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 15)
        .unwrap()
        .and_hms_opt(13, 0, 0)
        .unwrap()
}

fn service(pool: &PgPool) -> OrderService {
    OrderService::new(
        OrdersRepository::new(pool.clone()),
        OrderItemsRepository::new(pool.clone()),
        CouponRepository::new(pool.clone()),
        Arc::new(InMemoryStorage::<Restaurant>::new()),
        PricingPolicy {
            tax_percentage: dec!(18),
            delivery_fee: dec!(50),
            min_order_amount: dec!(100),
        },
    )
}

async fn coupon(pool: &PgPool, definition: serde_json::Value) -> Coupon {
    let mut body = json!({
        "title": "Test coupon",
        "valid_from": now() - Duration::days(1),
        "valid_until": now() + Duration::days(1)
    });
    for (key, value) in definition.as_object().unwrap() {
        body[key] = value.clone();
    }
    let request: CreateCouponRequest = serde_json::from_value(body).unwrap();
    CouponRepository::new(pool.clone()).create(&request).await.unwrap()
}

/// One line of 2 x 250 = 500 subtotal
fn order_request(coupon_code: Option<&str>) -> CreateOrderRequest {
    serde_json::from_value(json!({
        "customer_id": Uuid::new_v4(),
        "restaurant_id": Uuid::new_v4(),
        "items": [{"food_item_id": Uuid::new_v4(), "quantity": 2, "unit_price": "250.00"}],
        "coupon_code": coupon_code,
        "payment_method": "upi"
    }))
    .unwrap()
}

async fn used_count(pool: &PgPool, coupon_id: Uuid) -> i32 {
    let (count,): (i32,) = sqlx::query_as("SELECT used_count FROM coupons WHERE id = $1")
        .bind(coupon_id)
        .fetch_one(pool)
        .await
        .unwrap();
    count
}

async fn order_count(pool: &PgPool) -> i64 {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders")
        .fetch_one(pool)
        .await
        .unwrap();
    count
}

#[sqlx::test]
#[ignore = "needs PostgreSQL at DATABASE_URL"]
async fn test_single_use_coupon_redeemed_once(pool: PgPool) {
    let once = coupon(
        &pool,
        json!({"code": "ONCE", "coupon_type": "fixed_amount", "discount_value": "100", "usage_limit": 1}),
    )
    .await;
    let service = service(&pool);

    let first = service
        .create_order(order_request(Some("ONCE")), now())
        .await
        .unwrap();
    assert_eq!(first.order.coupon_id, Some(once.id));
    assert_eq!(first.order.discount_amount, dec!(100));
    assert_eq!(first.order.total_amount, dec!(540));

    let second = service
        .create_order(order_request(Some("ONCE")), now())
        .await
        .unwrap_err();
    assert!(matches!(second, OrderError::CouponExhausted(ref code) if code == "ONCE"));
    assert_eq!(second.status_code(), StatusCode::CONFLICT);

    assert_eq!(used_count(&pool, once.id).await, 1);
    assert_eq!(order_count(&pool).await, 1);
}

#[sqlx::test]
#[ignore = "needs PostgreSQL at DATABASE_URL"]
async fn test_concurrent_orders_share_last_use(pool: PgPool) {
    let once = coupon(
        &pool,
        json!({"code": "LAST1", "coupon_type": "percentage", "discount_value": "10", "usage_limit": 1}),
    )
    .await;
    let service = service(&pool);

    let (a, b) = tokio::join!(
        service.create_order(order_request(Some("LAST1")), now()),
        service.create_order(order_request(Some("LAST1")), now()),
    );

    assert_eq!([a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(), 1);
    assert_eq!(used_count(&pool, once.id).await, 1);
    assert_eq!(order_count(&pool).await, 1);
}

#[sqlx::test]
#[ignore = "needs PostgreSQL at DATABASE_URL"]
async fn test_inapplicable_code_rejected_without_writes(pool: PgPool) {
    let big_spender = coupon(
        &pool,
        json!({"code": "BIG1000", "coupon_type": "fixed_amount", "discount_value": "150", "min_order_amount": "1000"}),
    )
    .await;

    let err = service(&pool)
        .create_order(order_request(Some("BIG1000")), now())
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::CouponNotApplicable(_)));
    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

    let unknown = service(&pool)
        .create_order(order_request(Some("NOSUCHCODE")), now())
        .await
        .unwrap_err();
    assert_eq!(unknown.status_code(), StatusCode::BAD_REQUEST);

    assert_eq!(used_count(&pool, big_spender.id).await, 0);
    assert_eq!(order_count(&pool).await, 0);
}

#[sqlx::test]
#[ignore = "needs PostgreSQL at DATABASE_URL"]
async fn test_free_delivery_persists_zero_fee(pool: PgPool) {
    let free = coupon(
        &pool,
        json!({"code": "FREEDEL", "coupon_type": "free_delivery", "discount_value": "0"}),
    )
    .await;

    let created = service(&pool)
        .create_order(order_request(Some("FREEDEL")), now())
        .await
        .unwrap();

    let stored = OrdersRepository::new(pool.clone())
        .find_by_id(created.order.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.delivery_fee, dec!(0));
    assert_eq!(stored.discount_amount, dec!(0));
    assert_eq!(stored.tax_amount, dec!(90));
    assert_eq!(stored.total_amount, dec!(590));
    assert_eq!(stored.coupon_id, Some(free.id));
    assert_eq!(used_count(&pool, free.id).await, 1);
}

#[sqlx::test]
#[ignore = "needs PostgreSQL at DATABASE_URL"]
async fn test_order_without_coupon_keeps_fee(pool: PgPool) {
    let created = service(&pool)
        .create_order(order_request(None), now())
        .await
        .unwrap();

    assert_eq!(created.order.delivery_fee, dec!(50));
    assert_eq!(created.order.total_amount, dec!(640));
    assert_eq!(created.items.len(), 1);
    assert_eq!(created.items[0].total_price, dec!(500));
}

#[sqlx::test]
#[ignore = "needs PostgreSQL at DATABASE_URL"]
async fn test_redeem_rechecks_active_flag_and_window(pool: PgPool) {
    let repo = CouponRepository::new(pool.clone());
    let deactivated = coupon(
        &pool,
        json!({"code": "PAUSED", "coupon_type": "fixed_amount", "discount_value": "20"}),
    )
    .await;
    repo.deactivate(deactivated.id).await.unwrap();
    let unlimited = coupon(
        &pool,
        json!({"code": "ALWAYS", "coupon_type": "fixed_amount", "discount_value": "20"}),
    )
    .await;

    let mut conn = pool.acquire().await.unwrap();
    assert!(!CouponRepository::try_redeem(&mut conn, deactivated.id, now())
        .await
        .unwrap());
    assert!(!CouponRepository::try_redeem(&mut conn, unlimited.id, now() + Duration::days(2))
        .await
        .unwrap());
    assert!(CouponRepository::try_redeem(&mut conn, unlimited.id, now())
        .await
        .unwrap());
    drop(conn);

    assert_eq!(used_count(&pool, deactivated.id).await, 0);
    assert_eq!(used_count(&pool, unlimited.id).await, 1);
}

#[sqlx::test]
#[ignore = "needs PostgreSQL at DATABASE_URL"]
async fn test_coupon_deactivated_after_evaluation_rolls_back(pool: PgPool) {
    let promo = coupon(
        &pool,
        json!({"code": "FLASH", "coupon_type": "fixed_amount", "discount_value": "50"}),
    )
    .await;
    CouponRepository::new(pool.clone())
        .deactivate(promo.id)
        .await
        .unwrap();

    let order = NewOrder {
        order_number: generate_order_number(now()),
        customer_id: Uuid::new_v4(),
        restaurant_id: Uuid::new_v4(),
        delivery_address_id: None,
        coupon_id: Some(promo.id),
        subtotal: dec!(500),
        tax_amount: dec!(90),
        delivery_fee: dec!(50),
        discount_amount: dec!(50),
        total_amount: dec!(590),
        payment_method: PaymentMethod::Card,
        special_instructions: None,
        created_at: now(),
    };
    let redemption = CouponRedemption {
        coupon_id: promo.id,
        code: promo.code.clone(),
    };

    let result = OrdersRepository::new(pool.clone())
        .create(&order, &[], Some(&redemption))
        .await;

    assert!(matches!(result, Err(OrderError::CouponExhausted(_))));
    assert_eq!(order_count(&pool).await, 0);
}
