use chrono::{NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::orders::PaymentMethod;
use crate::validation::{validate_money_amount, validate_phone, validate_postal_code};

/// Restaurant catalog profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Restaurant {
    pub id: Uuid,
    /// User that registered the restaurant
    pub owner_id: Uuid,
    #[schema(example = "Spice Route")]
    pub name: String,
    pub description: Option<String>,
    #[schema(example = "9876543210")]
    pub phone: String,
    pub city: String,
    #[schema(example = "560001")]
    pub postal_code: String,
    pub cuisine_type: Option<String>,
    /// Overrides the service-wide minimum order amount
    pub min_order_amount: Option<Decimal>,
    /// Overrides the service-wide delivery fee
    pub delivery_fee: Option<Decimal>,
    pub is_open: bool,
    #[schema(value_type = Option<String>, example = "09:00:00")]
    pub opening_time: Option<NaiveTime>,
    /// Earlier than `opening_time` when the kitchen closes after midnight
    #[schema(value_type = Option<String>, example = "23:30:00")]
    pub closing_time: Option<NaiveTime>,
    /// Accepted payment methods; empty accepts every method
    pub payment_methods: Vec<PaymentMethod>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterRestaurantRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(custom = "validate_phone")]
    pub phone: String,
    #[validate(length(min = 1, max = 100))]
    pub city: String,
    #[validate(custom = "validate_postal_code")]
    pub postal_code: String,
    pub cuisine_type: Option<String>,
    #[validate(custom = "validate_money_amount")]
    pub min_order_amount: Option<Decimal>,
    #[validate(custom = "validate_money_amount")]
    pub delivery_fee: Option<Decimal>,
}

/// Partial profile update; omitted fields keep their current value
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(custom = "validate_phone")]
    pub phone: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub city: Option<String>,
    #[validate(custom = "validate_postal_code")]
    pub postal_code: Option<String>,
    pub cuisine_type: Option<String>,
    #[validate(custom = "validate_money_amount")]
    pub min_order_amount: Option<Decimal>,
    #[validate(custom = "validate_money_amount")]
    pub delivery_fee: Option<Decimal>,
    pub is_open: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SetOpenStatusRequest {
    pub is_open: bool,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_business_hours"))]
pub struct BusinessHoursRequest {
    #[schema(value_type = String, example = "09:00:00")]
    pub opening_time: NaiveTime,
    #[schema(value_type = String, example = "23:30:00")]
    pub closing_time: NaiveTime,
}

fn validate_business_hours(request: &BusinessHoursRequest) -> Result<(), ValidationError> {
    if request.opening_time == request.closing_time {
        return Err(ValidationError::new("empty_business_hours"));
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct PaymentMethodsRequest {
    #[validate(length(min = 1, message = "At least one payment method is required"))]
    pub payment_methods: Vec<PaymentMethod>,
}

impl Restaurant {
    pub fn register(owner_id: Uuid, request: RegisterRestaurantRequest, now: NaiveDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            name: request.name,
            description: request.description,
            phone: request.phone,
            city: request.city,
            postal_code: request.postal_code,
            cuisine_type: request.cuisine_type,
            min_order_amount: request.min_order_amount,
            delivery_fee: request.delivery_fee,
            is_open: true,
            opening_time: None,
            closing_time: None,
            payment_methods: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(&mut self, update: UpdateProfileRequest, now: NaiveDateTime) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(phone) = update.phone {
            self.phone = phone;
        }
        if let Some(city) = update.city {
            self.city = city;
        }
        if let Some(postal_code) = update.postal_code {
            self.postal_code = postal_code;
        }
        if let Some(cuisine_type) = update.cuisine_type {
            self.cuisine_type = Some(cuisine_type);
        }
        if let Some(min_order_amount) = update.min_order_amount {
            self.min_order_amount = Some(min_order_amount);
        }
        if let Some(delivery_fee) = update.delivery_fee {
            self.delivery_fee = Some(delivery_fee);
        }
        if let Some(is_open) = update.is_open {
            self.is_open = is_open;
        }
        self.updated_at = now;
    }

    pub fn set_business_hours(&mut self, hours: BusinessHoursRequest, now: NaiveDateTime) {
        self.opening_time = Some(hours.opening_time);
        self.closing_time = Some(hours.closing_time);
        self.updated_at = now;
    }

    /// Replace the accepted methods, dropping repeats but keeping order
    pub fn set_payment_methods(&mut self, methods: Vec<PaymentMethod>, now: NaiveDateTime) {
        let mut accepted = Vec::with_capacity(methods.len());
        for method in methods {
            if !accepted.contains(&method) {
                accepted.push(method);
            }
        }
        self.payment_methods = accepted;
        self.updated_at = now;
    }

    pub fn accepts(&self, method: PaymentMethod) -> bool {
        self.payment_methods.is_empty() || self.payment_methods.contains(&method)
    }
}
