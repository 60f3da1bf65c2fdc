use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{is_foreign_key_violation, is_unique_violation};
use crate::menu::{Category, CreateCategoryRequest, CreateFoodItemRequest, FoodItem, MenuError};

const CATEGORY_COLUMNS: &str = "id, name, description, image, is_active, sort_order, created_at";

const FOOD_ITEM_COLUMNS: &str = "id, restaurant_id, category_id, name, description, price, \
     discount_price, image, is_veg, ingredients, allergens, calories, prep_time, status, rating, \
     total_ratings, sort_order, created_at, updated_at";

/// Repository for categories and food items
#[derive(Clone)]
pub struct MenuRepository {
    pool: PgPool,
}

impl MenuRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>, MenuError> {
        let categories = sqlx::query_as::<_, Category>(&format!(
            "SELECT {} FROM categories ORDER BY sort_order, name",
            CATEGORY_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    pub async fn create_category(
        &self,
        request: &CreateCategoryRequest,
    ) -> Result<Category, MenuError> {
        let result = sqlx::query_as::<_, Category>(&format!(
            r#"
            INSERT INTO categories (name, description, image, is_active, sort_order)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            CATEGORY_COLUMNS
        ))
        .bind(&request.name)
        .bind(&request.description)
        .bind(&request.image)
        .bind(request.is_active)
        .bind(request.sort_order)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(category) => Ok(category),
            Err(e) if is_unique_violation(&e) => {
                Err(MenuError::DuplicateCategory(request.name.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// A restaurant's menu in display order
    pub async fn list_items(&self, restaurant_id: Uuid) -> Result<Vec<FoodItem>, MenuError> {
        let items = sqlx::query_as::<_, FoodItem>(&format!(
            "SELECT {} FROM food_items WHERE restaurant_id = $1 ORDER BY sort_order, name",
            FOOD_ITEM_COLUMNS
        ))
        .bind(restaurant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    pub async fn find_item(&self, item_id: Uuid) -> Result<Option<FoodItem>, MenuError> {
        let item = sqlx::query_as::<_, FoodItem>(&format!(
            "SELECT {} FROM food_items WHERE id = $1",
            FOOD_ITEM_COLUMNS
        ))
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    pub async fn create_item(&self, request: &CreateFoodItemRequest) -> Result<FoodItem, MenuError> {
        let result = sqlx::query_as::<_, FoodItem>(&format!(
            r#"
            INSERT INTO food_items (restaurant_id, category_id, name, description, price,
                                    discount_price, image, is_veg, ingredients, allergens,
                                    calories, prep_time, status, sort_order)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {}
            "#,
            FOOD_ITEM_COLUMNS
        ))
        .bind(request.restaurant_id)
        .bind(request.category_id)
        .bind(&request.name)
        .bind(&request.description)
        .bind(request.price)
        .bind(request.discount_price)
        .bind(&request.image)
        .bind(request.is_veg)
        .bind(&request.ingredients)
        .bind(&request.allergens)
        .bind(request.calories)
        .bind(request.prep_time)
        .bind(request.status)
        .bind(request.sort_order)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(item) => Ok(item),
            Err(e) if is_foreign_key_violation(&e) => Err(MenuError::CategoryNotFound),
            Err(e) => Err(e.into()),
        }
    }

    /// Write every editable column of `item`
    pub async fn update_item(&self, item: &FoodItem) -> Result<FoodItem, MenuError> {
        let result = sqlx::query_as::<_, FoodItem>(&format!(
            r#"
            UPDATE food_items
            SET category_id = $2, name = $3, description = $4, price = $5,
                discount_price = $6, image = $7, is_veg = $8, ingredients = $9,
                allergens = $10, calories = $11, prep_time = $12, status = $13,
                sort_order = $14, updated_at = $15
            WHERE id = $1
            RETURNING {}
            "#,
            FOOD_ITEM_COLUMNS
        ))
        .bind(item.id)
        .bind(item.category_id)
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.price)
        .bind(item.discount_price)
        .bind(&item.image)
        .bind(item.is_veg)
        .bind(&item.ingredients)
        .bind(&item.allergens)
        .bind(item.calories)
        .bind(item.prep_time)
        .bind(item.status)
        .bind(item.sort_order)
        .bind(item.updated_at)
        .fetch_optional(&self.pool)
        .await;

        match result {
            Ok(Some(updated)) => Ok(updated),
            Ok(None) => Err(MenuError::ItemNotFound),
            Err(e) if is_foreign_key_violation(&e) => Err(MenuError::CategoryNotFound),
            Err(e) => Err(e.into()),
        }
    }

    /// Returns whether a row was deleted
    pub async fn delete_item(&self, item_id: Uuid) -> Result<bool, MenuError> {
        let result = sqlx::query("DELETE FROM food_items WHERE id = $1")
            .bind(item_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }
}
