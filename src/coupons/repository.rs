use chrono::NaiveDateTime;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::coupons::{Coupon, CouponError, CreateCouponRequest};
use crate::db::is_unique_violation;

const COUPON_COLUMNS: &str = "id, code, title, description, coupon_type, discount_value, \
     min_order_amount, max_discount_amount, usage_limit, used_count, valid_from, valid_until, \
     is_active, created_at";

/// Repository for coupon operations
#[derive(Clone)]
pub struct CouponRepository {
    pool: PgPool,
}

impl CouponRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List coupons, newest first
    pub async fn list(&self, active_only: bool) -> Result<Vec<Coupon>, CouponError> {
        let sql = if active_only {
            format!(
                "SELECT {} FROM coupons WHERE is_active = TRUE ORDER BY created_at DESC",
                COUPON_COLUMNS
            )
        } else {
            format!("SELECT {} FROM coupons ORDER BY created_at DESC", COUPON_COLUMNS)
        };

        let coupons = sqlx::query_as::<_, Coupon>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(coupons)
    }

    /// Exact, case-sensitive lookup by code
    pub async fn find_by_code(&self, code: &str) -> Result<Option<Coupon>, CouponError> {
        let coupon = sqlx::query_as::<_, Coupon>(&format!(
            "SELECT {} FROM coupons WHERE code = $1",
            COUPON_COLUMNS
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(coupon)
    }

    pub async fn create(&self, request: &CreateCouponRequest) -> Result<Coupon, CouponError> {
        let result = sqlx::query_as::<_, Coupon>(&format!(
            r#"
            INSERT INTO coupons (code, title, description, coupon_type, discount_value,
                                 min_order_amount, max_discount_amount, usage_limit,
                                 valid_from, valid_until, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {}
            "#,
            COUPON_COLUMNS
        ))
        .bind(&request.code)
        .bind(&request.title)
        .bind(&request.description)
        .bind(request.coupon_type)
        .bind(request.discount_value)
        .bind(request.min_order_amount)
        .bind(request.max_discount_amount)
        .bind(request.usage_limit)
        .bind(request.valid_from)
        .bind(request.valid_until)
        .bind(request.is_active)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(coupon) => Ok(coupon),
            Err(e) if is_unique_violation(&e) => Err(CouponError::DuplicateCode(request.code.clone())),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn deactivate(&self, coupon_id: Uuid) -> Result<Coupon, CouponError> {
        let coupon = sqlx::query_as::<_, Coupon>(&format!(
            "UPDATE coupons SET is_active = FALSE WHERE id = $1 RETURNING {}",
            COUPON_COLUMNS
        ))
        .bind(coupon_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(CouponError::NotFound)?;

        Ok(coupon)
    }

    /// Deactivate every active coupon whose window ended before `now`
    pub async fn deactivate_expired(&self, now: NaiveDateTime) -> Result<u64, CouponError> {
        let result = sqlx::query(
            "UPDATE coupons SET is_active = FALSE WHERE valid_until < $1 AND is_active = TRUE",
        )
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Count one redemption of `coupon_id` if it is still redeemable at `now`.
    ///
    /// Runs on the caller's connection so it commits or rolls back with the
    /// order that redeems it. Usage limit, active flag and validity window
    /// are re-checked in the same statement as the increment, so a coupon
    /// deactivated or used up after evaluation is not counted.
    pub async fn try_redeem(
        conn: &mut PgConnection,
        coupon_id: Uuid,
        now: NaiveDateTime,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE coupons
            SET used_count = used_count + 1
            WHERE id = $1
              AND is_active = TRUE
              AND $2 BETWEEN valid_from AND valid_until
              AND (usage_limit IS NULL OR used_count < usage_limit)
            "#,
        )
        .bind(coupon_id)
        .bind(now)
        .execute(conn)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
