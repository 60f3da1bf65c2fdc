// HTTP handlers for restaurant profile endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Local;
use uuid::Uuid;
use validator::Validate;

use crate::auth::{AuthenticatedUser, Role};
use crate::error::ApiError;
use crate::restaurants::{
    BusinessHoursRequest, PaymentMethodsRequest, RegisterRestaurantRequest, Restaurant,
    SetOpenStatusRequest, UpdateProfileRequest,
};
use crate::storage::StorageError;
use crate::AppState;

fn not_found(id: Uuid) -> ApiError {
    ApiError::NotFound {
        resource: "Restaurant".to_string(),
        id: id.to_string(),
    }
}

/// Write `restaurant`, failing with 409 if another restaurant has its phone
async fn save(state: &AppState, restaurant: &Restaurant) -> Result<(), ApiError> {
    let phone = restaurant.phone.clone();
    let unique_phone = move |other: &Restaurant| other.phone == phone;

    match state
        .restaurants
        .upsert_unless(restaurant.id, restaurant.clone(), &unique_phone)
        .await
    {
        Ok(_) => Ok(()),
        Err(StorageError::Conflict(_)) => Err(ApiError::Conflict {
            message: format!(
                "A restaurant with phone {} is already registered",
                restaurant.phone
            ),
        }),
        Err(e) => Err(e.into()),
    }
}

/// Load a restaurant the caller may manage: its owner, or any admin
async fn load_managed(
    state: &AppState,
    user: &AuthenticatedUser,
    id: Uuid,
) -> Result<Restaurant, ApiError> {
    let restaurant = state.restaurants.get(id).await?.ok_or_else(|| not_found(id))?;

    if user.role != Role::Admin && restaurant.owner_id != user.user_id {
        return Err(ApiError::Forbidden(format!(
            "User {} does not own restaurant {}",
            user.user_id, id
        )));
    }
    Ok(restaurant)
}

/// Handler for POST /api/restaurants/register
#[utoipa::path(
    post,
    path = "/api/restaurants/register",
    request_body = RegisterRestaurantRequest,
    responses(
        (status = 201, description = "Restaurant registered", body = Restaurant),
        (status = 400, description = "Invalid profile"),
        (status = 403, description = "Role not allowed"),
        (status = 409, description = "Phone number already registered")
    ),
    tag = "restaurants"
)]
pub async fn register_restaurant(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<RegisterRestaurantRequest>,
) -> Result<(StatusCode, Json<Restaurant>), ApiError> {
    request.validate()?;

    let restaurant = Restaurant::register(user.user_id, request, Local::now().naive_local());
    save(&state, &restaurant).await?;

    tracing::info!(
        "Registered restaurant {} ({}) for owner {}",
        restaurant.name,
        restaurant.id,
        user.user_id
    );
    Ok((StatusCode::CREATED, Json(restaurant)))
}

/// Handler for GET /api/restaurants
#[utoipa::path(
    get,
    path = "/api/restaurants",
    responses((status = 200, description = "All restaurants", body = Vec<Restaurant>)),
    tag = "restaurants"
)]
pub async fn list_restaurants(
    State(state): State<AppState>,
) -> Result<Json<Vec<Restaurant>>, ApiError> {
    let mut restaurants = state.restaurants.list().await?;
    restaurants.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(Json(restaurants))
}

/// Handler for GET /api/restaurants/{id}
#[utoipa::path(
    get,
    path = "/api/restaurants/{id}",
    params(("id" = Uuid, Path, description = "Restaurant ID")),
    responses(
        (status = 200, description = "Restaurant profile", body = Restaurant),
        (status = 404, description = "Restaurant not found")
    ),
    tag = "restaurants"
)]
pub async fn get_restaurant(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Restaurant>, ApiError> {
    let restaurant = state.restaurants.get(id).await?.ok_or_else(|| not_found(id))?;
    Ok(Json(restaurant))
}

/// Handler for PUT /api/restaurants/{id}/profile
///
/// Owners may only edit their own restaurant; admins may edit any.
#[utoipa::path(
    put,
    path = "/api/restaurants/{id}/profile",
    params(("id" = Uuid, Path, description = "Restaurant ID")),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = Restaurant),
        (status = 400, description = "Invalid profile"),
        (status = 403, description = "Not the restaurant's owner"),
        (status = 404, description = "Restaurant not found"),
        (status = 409, description = "Phone number already registered")
    ),
    tag = "restaurants"
)]
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<Restaurant>, ApiError> {
    request.validate()?;

    let mut restaurant = load_managed(&state, &user, id).await?;
    restaurant.apply_update(request, Local::now().naive_local());
    save(&state, &restaurant).await?;

    tracing::info!("Updated profile of restaurant {}", id);
    Ok(Json(restaurant))
}

/// Handler for PUT /api/restaurants/{id}/open
#[utoipa::path(
    put,
    path = "/api/restaurants/{id}/open",
    params(("id" = Uuid, Path, description = "Restaurant ID")),
    request_body = SetOpenStatusRequest,
    responses(
        (status = 200, description = "Open status changed", body = Restaurant),
        (status = 403, description = "Not the restaurant's owner"),
        (status = 404, description = "Restaurant not found")
    ),
    tag = "restaurants"
)]
pub async fn set_open_status(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(request): Json<SetOpenStatusRequest>,
) -> Result<Json<Restaurant>, ApiError> {
    let mut restaurant = load_managed(&state, &user, id).await?;
    restaurant.is_open = request.is_open;
    restaurant.updated_at = Local::now().naive_local();
    save(&state, &restaurant).await?;

    tracing::info!(
        "Restaurant {} is now {}",
        id,
        if request.is_open { "open" } else { "closed" }
    );
    Ok(Json(restaurant))
}

/// Handler for PUT /api/restaurants/{id}/business_hours
#[utoipa::path(
    put,
    path = "/api/restaurants/{id}/business_hours",
    params(("id" = Uuid, Path, description = "Restaurant ID")),
    request_body = BusinessHoursRequest,
    responses(
        (status = 200, description = "Business hours set", body = Restaurant),
        (status = 400, description = "Opening and closing time are equal"),
        (status = 403, description = "Not the restaurant's owner"),
        (status = 404, description = "Restaurant not found")
    ),
    tag = "restaurants"
)]
pub async fn set_business_hours(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(request): Json<BusinessHoursRequest>,
) -> Result<Json<Restaurant>, ApiError> {
    request.validate()?;

    let mut restaurant = load_managed(&state, &user, id).await?;
    restaurant.set_business_hours(request, Local::now().naive_local());
    save(&state, &restaurant).await?;

    Ok(Json(restaurant))
}

/// Handler for PUT /api/restaurants/{id}/payment_methods
#[utoipa::path(
    put,
    path = "/api/restaurants/{id}/payment_methods",
    params(("id" = Uuid, Path, description = "Restaurant ID")),
    request_body = PaymentMethodsRequest,
    responses(
        (status = 200, description = "Accepted payment methods replaced", body = Restaurant),
        (status = 400, description = "Empty method list"),
        (status = 403, description = "Not the restaurant's owner"),
        (status = 404, description = "Restaurant not found")
    ),
    tag = "restaurants"
)]
pub async fn set_payment_methods(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(request): Json<PaymentMethodsRequest>,
) -> Result<Json<Restaurant>, ApiError> {
    request.validate()?;

    let mut restaurant = load_managed(&state, &user, id).await?;
    restaurant.set_payment_methods(request.payment_methods, Local::now().naive_local());
    save(&state, &restaurant).await?;

    tracing::info!(
        "Restaurant {} accepts {:?}",
        id,
        restaurant.payment_methods
    );
    Ok(Json(restaurant))
}
