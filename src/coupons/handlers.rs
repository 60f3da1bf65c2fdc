// HTTP handlers for coupon endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Local;
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthenticatedUser;
use crate::coupons::{
    ApplyCouponRequest, ApplyCouponResponse, Coupon, CouponError, CreateCouponRequest,
    ListCouponsQuery,
};
use crate::AppState;

/// Handler for GET /api/restaurant/coupons
#[utoipa::path(
    get,
    path = "/api/restaurant/coupons",
    params(ListCouponsQuery),
    responses(
        (status = 200, description = "Coupons", body = Vec<Coupon>),
        (status = 500, description = "Internal server error")
    ),
    tag = "coupons"
)]
pub async fn list_coupons(
    State(state): State<AppState>,
    Query(query): Query<ListCouponsQuery>,
) -> Result<Json<Vec<Coupon>>, CouponError> {
    let coupons = state.coupon_service.list_coupons(query.active_only).await?;
    Ok(Json(coupons))
}

/// Handler for POST /api/restaurant/coupons (admin or restaurant owner)
#[utoipa::path(
    post,
    path = "/api/restaurant/coupons",
    request_body = CreateCouponRequest,
    responses(
        (status = 201, description = "Coupon created", body = Coupon),
        (status = 400, description = "Invalid coupon definition"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Role not allowed"),
        (status = 409, description = "Coupon code already exists")
    ),
    tag = "coupons"
)]
pub async fn create_coupon(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<CreateCouponRequest>,
) -> Result<(StatusCode, Json<Coupon>), CouponError> {
    request
        .validate()
        .map_err(|e| CouponError::ValidationError(e.to_string()))?;

    tracing::debug!("User {} creating coupon {}", user.user_id, request.code);
    let coupon = state.coupon_service.create_coupon(request).await?;

    Ok((StatusCode::CREATED, Json(coupon)))
}

/// Handler for PUT /api/restaurant/coupons/{coupon_id}/deactivate
#[utoipa::path(
    put,
    path = "/api/restaurant/coupons/{coupon_id}/deactivate",
    params(("coupon_id" = Uuid, Path, description = "Coupon ID")),
    responses(
        (status = 200, description = "Coupon deactivated", body = Coupon),
        (status = 403, description = "Role not allowed"),
        (status = 404, description = "Coupon not found")
    ),
    tag = "coupons"
)]
pub async fn deactivate_coupon(
    State(state): State<AppState>,
    Path(coupon_id): Path<Uuid>,
) -> Result<Json<Coupon>, CouponError> {
    let coupon = state.coupon_service.deactivate_coupon(coupon_id).await?;
    Ok(Json(coupon))
}

/// Handler for POST /api/restaurant/coupons/apply
///
/// Unknown, expired, inactive and below-minimum codes all answer
/// `{"valid": false, "discount": "0"}`.
#[utoipa::path(
    post,
    path = "/api/restaurant/coupons/apply",
    request_body = ApplyCouponRequest,
    responses(
        (status = 200, description = "Coupon evaluation", body = ApplyCouponResponse),
        (status = 400, description = "Negative order total")
    ),
    tag = "coupons"
)]
pub async fn apply_coupon(
    State(state): State<AppState>,
    Json(request): Json<ApplyCouponRequest>,
) -> Result<Json<ApplyCouponResponse>, CouponError> {
    request
        .validate()
        .map_err(|e| CouponError::ValidationError(e.to_string()))?;

    let now = Local::now().naive_local();
    let evaluation = state
        .coupon_service
        .evaluate_code(&request.code, request.order_total, now)
        .await?;

    Ok(Json(ApplyCouponResponse {
        valid: evaluation.applicable,
        discount: evaluation.discount,
        coupon: evaluation.coupon,
    }))
}
