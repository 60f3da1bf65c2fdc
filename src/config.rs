// Service configuration loaded from the environment
// Monetary settings are validated here so the pricing formulas never have to

use rust_decimal::Decimal;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_JWT_SECRET: &str = "supersecretkey";
const DEFAULT_CORS_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://localhost:8080"];

/// Errors raised while loading configuration at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set in environment")]
    Missing(&'static str),

    #[error("{key} has an invalid value '{value}'")]
    Invalid { key: &'static str, value: String },

    #[error("{0} must not be negative")]
    Negative(&'static str),
}

/// Runtime settings for the restaurant service
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub jwt_secret: String,
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub cors_origins: Vec<String>,
    /// GST applied to the order subtotal, as a percentage
    pub gst_percentage: Decimal,
    pub default_delivery_fee: Decimal,
    pub min_order_amount: Decimal,
    pub coupon_expiry_sweep: Duration,
}

impl Settings {
    /// Load settings from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary key lookup
    ///
    /// Split out from `from_env` so tests can feed a map instead of mutating
    /// the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let settings = Self {
            database_url,
            jwt_secret: lookup("JWT_SECRET").unwrap_or_else(|| DEFAULT_JWT_SECRET.to_string()),
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "PORT", 8001)?,
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            cors_origins: parse_cors_origins(lookup("CORS_ORIGINS")),
            gst_percentage: parse_or(&lookup, "GST_PERCENTAGE", Decimal::new(180, 1))?,
            default_delivery_fee: parse_or(&lookup, "DEFAULT_DELIVERY_FEE", Decimal::new(500, 1))?,
            min_order_amount: parse_or(&lookup, "MIN_ORDER_AMOUNT", Decimal::new(1000, 1))?,
            coupon_expiry_sweep: Duration::from_secs(parse_or(
                &lookup,
                "COUPON_EXPIRY_SWEEP_SECS",
                3600u64,
            )?),
        };

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.gst_percentage.is_sign_negative() {
            return Err(ConfigError::Negative("GST_PERCENTAGE"));
        }
        if self.default_delivery_fee.is_sign_negative() {
            return Err(ConfigError::Negative("DEFAULT_DELIVERY_FEE"));
        }
        if self.min_order_amount.is_sign_negative() {
            return Err(ConfigError::Negative("MIN_ORDER_AMOUNT"));
        }
        Ok(())
    }

    /// Address the HTTP listener binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
        None => Ok(default),
    }
}

/// CORS origins are a JSON array; anything unparsable falls back to the local dev origins
fn parse_cors_origins(raw: Option<String>) -> Vec<String> {
    raw.and_then(|value| serde_json::from_str::<Vec<String>>(&value).ok())
        .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect())
}
