use chrono::NaiveDateTime;
use uuid::Uuid;
use validator::Validate;

use crate::menu::{
    Category, CreateCategoryRequest, CreateFoodItemRequest, FoodItem, MenuError, MenuRepository,
    UpdateFoodItemRequest,
};

/// Service for menu business logic
#[derive(Clone)]
pub struct MenuService {
    repository: MenuRepository,
}

impl MenuService {
    pub fn new(repository: MenuRepository) -> Self {
        Self { repository }
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>, MenuError> {
        self.repository.list_categories().await
    }

    pub async fn create_category(
        &self,
        request: CreateCategoryRequest,
    ) -> Result<Category, MenuError> {
        request
            .validate()
            .map_err(|e| MenuError::ValidationError(e.to_string()))?;

        let category = self.repository.create_category(&request).await?;
        tracing::info!("Created menu category {}", category.name);
        Ok(category)
    }

    pub async fn list_items(&self, restaurant_id: Uuid) -> Result<Vec<FoodItem>, MenuError> {
        self.repository.list_items(restaurant_id).await
    }

    pub async fn create_item(&self, request: CreateFoodItemRequest) -> Result<FoodItem, MenuError> {
        request
            .validate()
            .map_err(|e| MenuError::ValidationError(e.to_string()))?;

        let item = self.repository.create_item(&request).await?;
        tracing::info!(
            "Added {} ({}) to the menu of restaurant {}",
            item.name,
            item.id,
            item.restaurant_id
        );
        Ok(item)
    }

    /// Merge `request` into the stored item
    pub async fn update_item(
        &self,
        item_id: Uuid,
        request: UpdateFoodItemRequest,
        now: NaiveDateTime,
    ) -> Result<FoodItem, MenuError> {
        request
            .validate()
            .map_err(|e| MenuError::ValidationError(e.to_string()))?;

        let mut item = self
            .repository
            .find_item(item_id)
            .await?
            .ok_or(MenuError::ItemNotFound)?;

        item.apply_update(request, now)
            .map_err(|e| MenuError::ValidationError(e.to_string()))?;

        self.repository.update_item(&item).await
    }

    pub async fn delete_item(&self, item_id: Uuid) -> Result<(), MenuError> {
        if !self.repository.delete_item(item_id).await? {
            return Err(MenuError::ItemNotFound);
        }
        tracing::info!("Removed food item {}", item_id);
        Ok(())
    }
}
