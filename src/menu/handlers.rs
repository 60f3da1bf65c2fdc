// HTTP handlers for menu endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Local;
use uuid::Uuid;

use crate::auth::AuthenticatedUser;
use crate::menu::{
    Category, CreateCategoryRequest, CreateFoodItemRequest, FoodItem, MenuError,
    UpdateFoodItemRequest,
};
use crate::AppState;

/// Handler for GET /api/menu/categories
#[utoipa::path(
    get,
    path = "/api/menu/categories",
    responses((status = 200, description = "All categories in display order", body = Vec<Category>)),
    tag = "menu"
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>, MenuError> {
    Ok(Json(state.menu_service.list_categories().await?))
}

/// Handler for POST /api/menu/categories
#[utoipa::path(
    post,
    path = "/api/menu/categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 400, description = "Invalid category"),
        (status = 403, description = "Role not allowed"),
        (status = 409, description = "Category name already exists")
    ),
    tag = "menu"
)]
pub async fn create_category(
    State(state): State<AppState>,
    Json(request): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<Category>), MenuError> {
    let category = state.menu_service.create_category(request).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// Handler for GET /api/menu/items/{id}, where `id` is the restaurant
#[utoipa::path(
    get,
    path = "/api/menu/items/{id}",
    params(("id" = Uuid, Path, description = "Restaurant ID")),
    responses((status = 200, description = "The restaurant's menu", body = Vec<FoodItem>)),
    tag = "menu"
)]
pub async fn list_food_items(
    State(state): State<AppState>,
    Path(restaurant_id): Path<Uuid>,
) -> Result<Json<Vec<FoodItem>>, MenuError> {
    Ok(Json(state.menu_service.list_items(restaurant_id).await?))
}

/// Handler for POST /api/menu/items
#[utoipa::path(
    post,
    path = "/api/menu/items",
    request_body = CreateFoodItemRequest,
    responses(
        (status = 201, description = "Food item created", body = FoodItem),
        (status = 400, description = "Invalid food item"),
        (status = 403, description = "Role not allowed"),
        (status = 404, description = "Category not found")
    ),
    tag = "menu"
)]
pub async fn create_food_item(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<CreateFoodItemRequest>,
) -> Result<(StatusCode, Json<FoodItem>), MenuError> {
    tracing::debug!("User {} adding food item {}", user.user_id, request.name);
    let item = state.menu_service.create_item(request).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Handler for PUT /api/menu/items/{id}
#[utoipa::path(
    put,
    path = "/api/menu/items/{id}",
    params(("id" = Uuid, Path, description = "Food item ID")),
    request_body = UpdateFoodItemRequest,
    responses(
        (status = 200, description = "Food item updated", body = FoodItem),
        (status = 400, description = "Invalid update"),
        (status = 403, description = "Role not allowed"),
        (status = 404, description = "Food item or category not found")
    ),
    tag = "menu"
)]
pub async fn update_food_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    Json(request): Json<UpdateFoodItemRequest>,
) -> Result<Json<FoodItem>, MenuError> {
    let item = state
        .menu_service
        .update_item(item_id, request, Local::now().naive_local())
        .await?;
    Ok(Json(item))
}

/// Handler for DELETE /api/menu/items/{id}
#[utoipa::path(
    delete,
    path = "/api/menu/items/{id}",
    params(("id" = Uuid, Path, description = "Food item ID")),
    responses(
        (status = 204, description = "Food item removed"),
        (status = 403, description = "Role not allowed"),
        (status = 404, description = "Food item not found")
    ),
    tag = "menu"
)]
pub async fn delete_food_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> Result<StatusCode, MenuError> {
    state.menu_service.delete_item(item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
