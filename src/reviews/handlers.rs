// HTTP handlers for review endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Local;
use uuid::Uuid;

use crate::auth::AuthenticatedUser;
use crate::reviews::{CreateReviewRequest, RespondToReviewRequest, Review, ReviewError};
use crate::AppState;

/// Handler for GET /api/restaurant/reviews/restaurant/{id}
#[utoipa::path(
    get,
    path = "/api/restaurant/reviews/restaurant/{id}",
    params(("id" = Uuid, Path, description = "Restaurant ID")),
    responses((status = 200, description = "Reviews, newest first", body = Vec<Review>)),
    tag = "reviews"
)]
pub async fn list_restaurant_reviews(
    State(state): State<AppState>,
    Path(restaurant_id): Path<Uuid>,
) -> Result<Json<Vec<Review>>, ReviewError> {
    Ok(Json(
        state.review_service.reviews_for_restaurant(restaurant_id).await?,
    ))
}

/// Handler for GET /api/restaurant/reviews/order/{id}
#[utoipa::path(
    get,
    path = "/api/restaurant/reviews/order/{id}",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses((status = 200, description = "Reviews of the order", body = Vec<Review>)),
    tag = "reviews"
)]
pub async fn list_order_reviews(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<Vec<Review>>, ReviewError> {
    Ok(Json(state.review_service.reviews_for_order(order_id).await?))
}

/// Handler for GET /api/restaurant/reviews/{id}
#[utoipa::path(
    get,
    path = "/api/restaurant/reviews/{id}",
    params(("id" = Uuid, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Review", body = Review),
        (status = 404, description = "Review not found")
    ),
    tag = "reviews"
)]
pub async fn get_review(
    State(state): State<AppState>,
    Path(review_id): Path<Uuid>,
) -> Result<Json<Review>, ReviewError> {
    Ok(Json(state.review_service.get_review(review_id).await?))
}

/// Handler for POST /api/restaurant/reviews (the order's customer or staff)
#[utoipa::path(
    post,
    path = "/api/restaurant/reviews",
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Review created", body = Review),
        (status = 400, description = "Invalid review"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Not the order's customer"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order not delivered or already reviewed")
    ),
    tag = "reviews"
)]
pub async fn create_review(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<CreateReviewRequest>,
) -> Result<(StatusCode, Json<Review>), ReviewError> {
    let review = state
        .review_service
        .create_review(&user, request, Local::now().naive_local())
        .await?;
    Ok((StatusCode::CREATED, Json(review)))
}

/// Handler for PUT /api/restaurant/reviews/{id}/respond
#[utoipa::path(
    put,
    path = "/api/restaurant/reviews/{id}/respond",
    params(("id" = Uuid, Path, description = "Review ID")),
    request_body = RespondToReviewRequest,
    responses(
        (status = 200, description = "Response stored", body = Review),
        (status = 400, description = "Empty response"),
        (status = 403, description = "Role not allowed"),
        (status = 404, description = "Review not found")
    ),
    tag = "reviews"
)]
pub async fn respond_to_review(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(review_id): Path<Uuid>,
    Json(request): Json<RespondToReviewRequest>,
) -> Result<Json<Review>, ReviewError> {
    tracing::debug!("User {} responding to review {}", user.user_id, review_id);
    let review = state
        .review_service
        .respond(review_id, request, Local::now().naive_local())
        .await?;
    Ok(Json(review))
}
