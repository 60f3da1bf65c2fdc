use rust_decimal::{Decimal, RoundingStrategy};

use crate::coupons::CouponEvaluation;
use crate::orders::OrderError;
use crate::validation::MAX_MONEY_AMOUNT;

/// Monetary breakdown of one order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub delivery_fee: Decimal,
    pub discount_amount: Decimal,
    pub total_amount: Decimal,
}

/// Service for calculating order prices and totals
///
/// All arithmetic is checked; an overflow surfaces as
/// `OrderError::AmountOutOfRange` instead of a panic.
pub struct PriceCalculator;

impl PriceCalculator {
    /// Line total: quantity * unit price
    pub fn calculate_subtotal(quantity: i32, unit_price: Decimal) -> Result<Decimal, OrderError> {
        Decimal::from(quantity)
            .checked_mul(unit_price)
            .ok_or_else(|| out_of_range("line total"))
    }

    /// Sum of line totals
    pub fn calculate_total(subtotals: &[Decimal]) -> Result<Decimal, OrderError> {
        subtotals
            .iter()
            .try_fold(Decimal::ZERO, |acc, line| acc.checked_add(*line))
            .ok_or_else(|| out_of_range("subtotal"))
    }

    /// Tax on the subtotal; `tax_percentage` of 18 means 18%
    pub fn calculate_tax(subtotal: Decimal, tax_percentage: Decimal) -> Result<Decimal, OrderError> {
        subtotal
            .checked_mul(tax_percentage)
            .map(|product| Self::to_money(product / Decimal::ONE_HUNDRED))
            .ok_or_else(|| out_of_range("tax"))
    }

    /// `subtotal + tax + fee - discount`, floored at zero
    pub fn calculate_total_amount(
        subtotal: Decimal,
        tax_amount: Decimal,
        delivery_fee: Decimal,
        discount_amount: Decimal,
    ) -> Result<Decimal, OrderError> {
        subtotal
            .checked_add(tax_amount)
            .and_then(|sum| sum.checked_add(delivery_fee))
            .and_then(|sum| sum.checked_sub(discount_amount))
            .map(|total| total.max(Decimal::ZERO))
            .ok_or_else(|| out_of_range("total"))
    }

    /// Combine subtotal, tax, delivery fee and an evaluated coupon.
    ///
    /// A free-delivery coupon zeroes the delivery fee here; the evaluator
    /// itself only ever reports a discount against the subtotal. Every
    /// resulting amount must fit a `NUMERIC(10, 2)` column.
    pub fn assemble_totals(
        subtotal: Decimal,
        tax_percentage: Decimal,
        delivery_fee: Decimal,
        coupon: &CouponEvaluation,
    ) -> Result<OrderTotals, OrderError> {
        let tax_amount = Self::calculate_tax(subtotal, tax_percentage)?;
        let delivery_fee = if coupon.waives_delivery_fee() {
            Decimal::ZERO
        } else {
            delivery_fee
        };
        let discount_amount = Self::to_money(coupon.discount).min(MAX_MONEY_AMOUNT);

        let totals = OrderTotals {
            subtotal,
            tax_amount,
            delivery_fee,
            discount_amount,
            total_amount: Self::calculate_total_amount(
                subtotal,
                tax_amount,
                delivery_fee,
                discount_amount,
            )?,
        };

        for (name, amount) in [
            ("subtotal", totals.subtotal),
            ("tax", totals.tax_amount),
            ("delivery fee", totals.delivery_fee),
            ("total", totals.total_amount),
        ] {
            if amount > MAX_MONEY_AMOUNT {
                return Err(out_of_range(name));
            }
        }
        Ok(totals)
    }

    /// Round to the 2 decimal places stored in NUMERIC(10, 2) columns
    fn to_money(amount: Decimal) -> Decimal {
        amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }
}

fn out_of_range(what: &str) -> OrderError {
    OrderError::AmountOutOfRange(format!("Order {} exceeds {}", what, MAX_MONEY_AMOUNT))
}
