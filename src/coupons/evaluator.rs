use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use crate::coupons::{Coupon, CouponType};

/// Outcome of checking one coupon against one order
///
/// A missing code and a coupon that fails its rules produce the same value,
/// so callers cannot tell an expired code from an unknown one.
#[derive(Debug, Clone, PartialEq)]
pub struct CouponEvaluation {
    pub applicable: bool,
    /// Monetary discount against the item subtotal, never negative
    pub discount: Decimal,
    /// The evaluated coupon, only when applicable
    pub coupon: Option<Coupon>,
}

impl CouponEvaluation {
    pub fn not_applicable() -> Self {
        Self {
            applicable: false,
            discount: Decimal::ZERO,
            coupon: None,
        }
    }

    /// True for an applicable free-delivery coupon
    pub fn waives_delivery_fee(&self) -> bool {
        self.applicable
            && self
                .coupon
                .as_ref()
                .map_or(false, |c| c.coupon_type == CouponType::FreeDelivery)
    }
}

/// Pure coupon rules: applicability window, minimum order and discount math.
///
/// Has no side effects. In particular it never touches `used_count`;
/// redemption happens in the order repository.
pub struct CouponEvaluator;

impl CouponEvaluator {
    /// A coupon applies at `now` to `order_subtotal` when it is active,
    /// `valid_from <= now <= valid_until`, and the subtotal meets the minimum.
    pub fn is_applicable(coupon: &Coupon, order_subtotal: Decimal, now: NaiveDateTime) -> bool {
        coupon.is_active
            && coupon.valid_from <= now
            && now <= coupon.valid_until
            && order_subtotal >= coupon.min_order_amount
    }

    pub fn evaluate(
        coupon: Option<&Coupon>,
        order_subtotal: Decimal,
        now: NaiveDateTime,
    ) -> CouponEvaluation {
        let coupon = match coupon {
            Some(c) if Self::is_applicable(c, order_subtotal, now) => c,
            _ => return CouponEvaluation::not_applicable(),
        };

        CouponEvaluation {
            applicable: true,
            discount: Self::discount_for(coupon, order_subtotal),
            coupon: Some(coupon.clone()),
        }
    }

    fn discount_for(coupon: &Coupon, order_subtotal: Decimal) -> Decimal {
        let raw = match coupon.coupon_type {
            CouponType::Percentage => Self::percentage_of(order_subtotal, coupon.discount_value),
            CouponType::FixedAmount => coupon.discount_value,
            CouponType::FreeDelivery => return Decimal::ZERO,
        };

        let capped = match coupon.max_discount_amount {
            Some(cap) => raw.min(cap),
            None => raw,
        };
        capped.max(Decimal::ZERO)
    }

    /// `amount * percent / 100` without overflowing near `Decimal::MAX`
    fn percentage_of(amount: Decimal, percent: Decimal) -> Decimal {
        amount
            .checked_mul(percent)
            .map(|product| product / Decimal::ONE_HUNDRED)
            .or_else(|| (amount / Decimal::ONE_HUNDRED).checked_mul(percent))
            .unwrap_or(Decimal::MAX)
    }
}
