use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::coupons::{
    Coupon, CouponError, CouponEvaluation, CouponEvaluator, CouponRepository, CreateCouponRequest,
};

/// Service for coupon business logic
#[derive(Clone)]
pub struct CouponService {
    repo: CouponRepository,
}

impl CouponService {
    pub fn new(repo: CouponRepository) -> Self {
        Self { repo }
    }

    pub async fn list_coupons(&self, active_only: bool) -> Result<Vec<Coupon>, CouponError> {
        let coupons = self.repo.list(active_only).await?;
        tracing::debug!("Retrieved {} coupons (active_only={})", coupons.len(), active_only);
        Ok(coupons)
    }

    pub async fn create_coupon(&self, request: CreateCouponRequest) -> Result<Coupon, CouponError> {
        let coupon = self.repo.create(&request).await.map_err(|e| {
            if let CouponError::DuplicateCode(ref code) = e {
                tracing::warn!("Attempt to create duplicate coupon code: {}", code);
            }
            e
        })?;

        tracing::info!(
            "Created {} coupon {} ({})",
            coupon.coupon_type,
            coupon.code,
            coupon.id
        );
        Ok(coupon)
    }

    pub async fn deactivate_coupon(&self, coupon_id: Uuid) -> Result<Coupon, CouponError> {
        let coupon = self.repo.deactivate(coupon_id).await?;
        tracing::info!("Deactivated coupon {} ({})", coupon.code, coupon.id);
        Ok(coupon)
    }

    /// Look up `code` and evaluate it against `order_subtotal` at `now`.
    ///
    /// Read-only: previewing a coupon never counts as a use.
    pub async fn evaluate_code(
        &self,
        code: &str,
        order_subtotal: Decimal,
        now: NaiveDateTime,
    ) -> Result<CouponEvaluation, CouponError> {
        let coupon = self.repo.find_by_code(code).await?;
        let evaluation = CouponEvaluator::evaluate(coupon.as_ref(), order_subtotal, now);

        tracing::debug!(
            "Evaluated coupon code {}: applicable={}, discount={}",
            code,
            evaluation.applicable,
            evaluation.discount
        );
        Ok(evaluation)
    }

    /// Deactivate coupons whose validity window has ended
    pub async fn expire_coupons(&self, now: NaiveDateTime) -> Result<u64, CouponError> {
        self.repo.deactivate_expired(now).await
    }
}
