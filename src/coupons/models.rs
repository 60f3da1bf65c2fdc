use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::validation::{validate_coupon_code, validate_money_amount};

/// How a coupon's discount is derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CouponType {
    /// `discount_value` percent of the subtotal
    Percentage,
    /// `discount_value` in currency
    FixedAmount,
    /// No monetary discount; the delivery fee is waived instead
    FreeDelivery,
}

impl CouponType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CouponType::Percentage => "percentage",
            CouponType::FixedAmount => "fixed_amount",
            CouponType::FreeDelivery => "free_delivery",
        }
    }
}

impl std::fmt::Display for CouponType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A discount code as stored in the `coupons` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Coupon {
    pub id: Uuid,
    /// Unique, case-sensitive
    #[schema(example = "WELCOME50")]
    pub code: String,
    #[schema(example = "50% off your first order")]
    pub title: String,
    pub description: Option<String>,
    pub coupon_type: CouponType,
    #[schema(example = "50.00")]
    pub discount_value: Decimal,
    #[schema(example = "199.00")]
    pub min_order_amount: Decimal,
    #[schema(example = "100.00")]
    pub max_discount_amount: Option<Decimal>,
    pub usage_limit: Option<i32>,
    pub used_count: i32,
    /// Inclusive start of the validity window
    pub valid_from: NaiveDateTime,
    /// Inclusive end of the validity window
    pub valid_until: NaiveDateTime,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

fn default_true() -> bool {
    true
}

/// Request body for POST /api/restaurant/coupons
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_coupon_rules"))]
pub struct CreateCouponRequest {
    #[validate(custom = "validate_coupon_code")]
    #[schema(example = "WELCOME50")]
    pub code: String,
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,
    pub description: Option<String>,
    pub coupon_type: CouponType,
    #[validate(custom = "validate_money_amount")]
    pub discount_value: Decimal,
    #[serde(default)]
    #[validate(custom = "validate_money_amount")]
    pub min_order_amount: Decimal,
    #[validate(custom = "validate_money_amount")]
    pub max_discount_amount: Option<Decimal>,
    #[validate(range(min = 1, message = "Usage limit must be at least 1"))]
    pub usage_limit: Option<i32>,
    pub valid_from: NaiveDateTime,
    pub valid_until: NaiveDateTime,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn validate_coupon_rules(request: &CreateCouponRequest) -> Result<(), ValidationError> {
    if request.coupon_type == CouponType::Percentage && request.discount_value > Decimal::ONE_HUNDRED {
        return Err(ValidationError::new("percentage_above_100"));
    }
    if request.valid_from > request.valid_until {
        return Err(ValidationError::new("valid_from_after_valid_until"));
    }
    // a zero cap would silently discount nothing; omit the cap instead
    if request.max_discount_amount == Some(Decimal::ZERO) {
        return Err(ValidationError::new("zero_discount_cap"));
    }
    Ok(())
}

/// Request body for POST /api/restaurant/coupons/apply
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ApplyCouponRequest {
    #[schema(example = "WELCOME50")]
    pub code: String,
    /// Pre-discount item subtotal the coupon is checked against
    #[validate(custom = "validate_money_amount")]
    #[schema(example = "450.00")]
    pub order_total: Decimal,
}

/// Result of previewing a coupon against an order total
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApplyCouponResponse {
    pub valid: bool,
    #[schema(example = "45.00")]
    pub discount: Decimal,
    /// Present only when `valid` is true
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon: Option<Coupon>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListCouponsQuery {
    /// Only return active coupons (default true)
    #[serde(default = "default_true")]
    pub active_only: bool,
}
