// Validation utilities module
// Custom validator functions for restaurant-domain request fields

use regex::Regex;
use rust_decimal::Decimal;
use std::sync::OnceLock;
use validator::ValidationError;

/// Largest amount a `NUMERIC(10, 2)` money column holds: 99,999,999.99
pub const MAX_MONEY_AMOUNT: Decimal = Decimal::from_parts(0x540B_E3FF, 2, 0, false, 2);

fn coupon_code_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_-]{3,50}$").expect("static pattern compiles")
    })
}

fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[6-9][0-9]{9}$").expect("static pattern compiles")
    })
}

fn postal_code_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9]{6}$").expect("static pattern compiles"))
}

/// Coupon codes are 3-50 characters of letters, digits, `_` or `-`.
/// Case is preserved; lookups are case-sensitive.
pub fn validate_coupon_code(code: &str) -> Result<(), ValidationError> {
    if coupon_code_pattern().is_match(code) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_coupon_code"))
    }
}

/// Money amount between 0 and `MAX_MONEY_AMOUNT`, inclusive
pub fn validate_money_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        Err(ValidationError::new("amount_must_not_be_negative"))
    } else if *amount > MAX_MONEY_AMOUNT {
        Err(ValidationError::new("amount_too_large"))
    } else {
        Ok(())
    }
}

/// Unit price above zero and at most `MAX_MONEY_AMOUNT`
pub fn validate_positive_price(price: &Decimal) -> Result<(), ValidationError> {
    if *price <= Decimal::ZERO {
        Err(ValidationError::new("price_must_be_positive"))
    } else if *price > MAX_MONEY_AMOUNT {
        Err(ValidationError::new("price_too_large"))
    } else {
        Ok(())
    }
}

/// Indian mobile number: 10 digits starting with 6-9
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if phone_pattern().is_match(phone) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_phone"))
    }
}

/// Indian PIN code: exactly 6 digits
pub fn validate_postal_code(code: &str) -> Result<(), ValidationError> {
    if postal_code_pattern().is_match(code) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_postal_code"))
    }
}
