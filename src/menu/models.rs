use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::validation::validate_positive_price;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FoodStatus {
    #[default]
    Available,
    Unavailable,
    OutOfStock,
}

/// Menu section shared by all restaurants, e.g. "Starters"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Category {
    pub id: Uuid,
    #[schema(example = "Starters")]
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub is_active: bool,
    pub sort_order: i32,
    pub created_at: NaiveDateTime,
}

/// A dish on one restaurant's menu
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct FoodItem {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub category_id: Uuid,
    #[schema(example = "Masala Dosa")]
    pub name: String,
    pub description: Option<String>,
    #[schema(example = "120.00")]
    pub price: Decimal,
    /// Sale price; always below `price`
    #[schema(example = "99.00")]
    pub discount_price: Option<Decimal>,
    pub image: Option<String>,
    pub is_veg: bool,
    pub ingredients: Option<String>,
    pub allergens: Option<String>,
    pub calories: Option<i32>,
    /// Minutes
    pub prep_time: Option<i32>,
    pub status: FoodStatus,
    pub rating: Decimal,
    pub total_ratings: i32,
    pub sort_order: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

fn default_true() -> bool {
    true
}

fn discount_below_price(price: Decimal, discount_price: Option<Decimal>) -> bool {
    discount_price.map_or(true, |discount| discount < price)
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(length(max = 500))]
    pub image: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub sort_order: i32,
}

/// Request body for POST /api/menu/items
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_new_item_prices"))]
pub struct CreateFoodItemRequest {
    pub restaurant_id: Uuid,
    pub category_id: Uuid,
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(custom = "validate_positive_price")]
    pub price: Decimal,
    #[validate(custom = "validate_positive_price")]
    pub discount_price: Option<Decimal>,
    #[validate(length(max = 500))]
    pub image: Option<String>,
    #[serde(default = "default_true")]
    pub is_veg: bool,
    pub ingredients: Option<String>,
    pub allergens: Option<String>,
    #[validate(range(min = 0, message = "Calories must not be negative"))]
    pub calories: Option<i32>,
    #[validate(range(min = 0, max = 600, message = "Prep time must be 0-600 minutes"))]
    pub prep_time: Option<i32>,
    #[serde(default)]
    pub status: FoodStatus,
    #[serde(default)]
    pub sort_order: i32,
}

fn validate_new_item_prices(request: &CreateFoodItemRequest) -> Result<(), ValidationError> {
    if !discount_below_price(request.price, request.discount_price) {
        return Err(ValidationError::new("discount_price_not_below_price"));
    }
    Ok(())
}

/// Partial update; omitted fields keep their current value
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateFoodItemRequest {
    pub category_id: Option<Uuid>,
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(custom = "validate_positive_price")]
    pub price: Option<Decimal>,
    #[validate(custom = "validate_positive_price")]
    pub discount_price: Option<Decimal>,
    /// Drop the sale price
    #[serde(default)]
    pub clear_discount: bool,
    #[validate(length(max = 500))]
    pub image: Option<String>,
    pub is_veg: Option<bool>,
    pub ingredients: Option<String>,
    pub allergens: Option<String>,
    #[validate(range(min = 0))]
    pub calories: Option<i32>,
    #[validate(range(min = 0, max = 600))]
    pub prep_time: Option<i32>,
    pub status: Option<FoodStatus>,
    pub sort_order: Option<i32>,
}

impl FoodItem {
    /// Apply `update`, then check the sale price is still below the price
    pub fn apply_update(
        &mut self,
        update: UpdateFoodItemRequest,
        now: NaiveDateTime,
    ) -> Result<(), ValidationError> {
        if let Some(category_id) = update.category_id {
            self.category_id = category_id;
        }
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if update.clear_discount {
            self.discount_price = None;
        } else if let Some(discount_price) = update.discount_price {
            self.discount_price = Some(discount_price);
        }
        if let Some(image) = update.image {
            self.image = Some(image);
        }
        if let Some(is_veg) = update.is_veg {
            self.is_veg = is_veg;
        }
        if let Some(ingredients) = update.ingredients {
            self.ingredients = Some(ingredients);
        }
        if let Some(allergens) = update.allergens {
            self.allergens = Some(allergens);
        }
        if let Some(calories) = update.calories {
            self.calories = Some(calories);
        }
        if let Some(prep_time) = update.prep_time {
            self.prep_time = Some(prep_time);
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(sort_order) = update.sort_order {
            self.sort_order = sort_order;
        }

        if !discount_below_price(self.price, self.discount_price) {
            return Err(ValidationError::new("discount_price_not_below_price"));
        }
        self.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 7, 1)
            .unwrap()
            .and_hms_opt(11, 0, 0)
            .unwrap()
    }

    fn create_request() -> CreateFoodItemRequest {
        serde_json::from_value(serde_json::json!({
            "restaurant_id": Uuid::new_v4(),
            "category_id": Uuid::new_v4(),
            "name": "Masala Dosa",
            "price": "120.00",
            "discount_price": "99.00"
        }))
        .unwrap()
    }

    fn item() -> FoodItem {
        FoodItem {
            id: Uuid::new_v4(),
            restaurant_id: Uuid::new_v4(),
            category_id: Uuid::new_v4(),
            name: "Masala Dosa".to_string(),
            description: None,
            price: dec!(120),
            discount_price: Some(dec!(99)),
            image: None,
            is_veg: true,
            ingredients: None,
            allergens: None,
            calories: None,
            prep_time: Some(15),
            status: FoodStatus::Available,
            rating: dec!(0),
            total_ratings: 0,
            sort_order: 0,
            created_at: now(),
            updated_at: now(),
        }
    }

    #[test]
    fn test_create_defaults() {
        let request = create_request();
        assert!(request.is_veg);
        assert_eq!(request.status, FoodStatus::Available);
        assert_eq!(request.sort_order, 0);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_discount_must_be_below_price() {
        let mut request = create_request();
        request.discount_price = Some(dec!(120));
        assert!(request.validate().is_err());

        request.discount_price = None;
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_price_bounds() {
        let mut request = create_request();
        request.price = dec!(0);
        assert!(request.validate().is_err());

        request.price = dec!(100000000);
        request.discount_price = None;
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&FoodStatus::OutOfStock).unwrap(),
            "\"out_of_stock\""
        );
    }

    #[test]
    fn test_update_keeps_unset_fields() {
        let mut food = item();
        let later = now() + chrono::Duration::minutes(5);

        food.apply_update(
            UpdateFoodItemRequest {
                status: Some(FoodStatus::OutOfStock),
                ..Default::default()
            },
            later,
        )
        .unwrap();

        assert_eq!(food.status, FoodStatus::OutOfStock);
        assert_eq!(food.price, dec!(120));
        assert_eq!(food.discount_price, Some(dec!(99)));
        assert_eq!(food.updated_at, later);
    }

    #[test]
    fn test_price_cut_below_discount_rejected() {
        let mut food = item();
        let result = food.apply_update(
            UpdateFoodItemRequest {
                price: Some(dec!(90)),
                ..Default::default()
            },
            now(),
        );
        assert!(result.is_err());

        let mut food = item();
        food.apply_update(
            UpdateFoodItemRequest {
                price: Some(dec!(90)),
                clear_discount: true,
                ..Default::default()
            },
            now(),
        )
        .unwrap();
        assert_eq!(food.discount_price, None);
    }
}
