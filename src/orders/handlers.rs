// HTTP handlers for order endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Local;
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthenticatedUser;
use crate::orders::{
    AssignDeliveryRequest, CancelOrderRequest, CreateOrderRequest, OrderError, OrderResponse,
    UpdateStatusRequest,
};
use crate::AppState;

/// Handler for POST /api/orders
#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = OrderResponse),
        (status = 400, description = "Invalid order, subtotal below minimum, or coupon not applicable"),
        (status = 403, description = "Role not allowed"),
        (status = 409, description = "Coupon used up, deactivated or expired since evaluation")
    ),
    tag = "orders"
)]
pub async fn create_order_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), OrderError> {
    tracing::debug!(
        "User {} creating order for restaurant {}",
        user.user_id,
        request.restaurant_id
    );

    let order = state
        .order_service
        .create_order(request, Local::now().naive_local())
        .await?;

    Ok((StatusCode::CREATED, Json(order)))
}

/// Handler for GET /api/orders/restaurant/{restaurant_id}
#[utoipa::path(
    get,
    path = "/api/orders/restaurant/{restaurant_id}",
    params(("restaurant_id" = Uuid, Path, description = "Restaurant ID")),
    responses((status = 200, description = "Orders of the restaurant", body = Vec<OrderResponse>)),
    tag = "orders"
)]
pub async fn list_restaurant_orders_handler(
    State(state): State<AppState>,
    Path(restaurant_id): Path<Uuid>,
) -> Result<Json<Vec<OrderResponse>>, OrderError> {
    let orders = state
        .order_service
        .list_restaurant_orders(restaurant_id)
        .await?;

    Ok(Json(orders))
}

/// Handler for GET /api/orders/{order_id}
#[utoipa::path(
    get,
    path = "/api/orders/{order_id}",
    params(("order_id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "Order not found")
    ),
    tag = "orders"
)]
pub async fn get_order_by_id_handler(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<OrderResponse>, OrderError> {
    let order = state.order_service.get_order(order_id).await?;
    Ok(Json(order))
}

/// Handler for PUT /api/orders/{order_id}/status
#[utoipa::path(
    put,
    path = "/api/orders/{order_id}/status",
    params(("order_id" = Uuid, Path, description = "Order ID")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = OrderResponse),
        (status = 400, description = "Transition not allowed"),
        (status = 404, description = "Order not found")
    ),
    tag = "orders"
)]
pub async fn update_order_status_handler(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<OrderResponse>, OrderError> {
    let order = state
        .order_service
        .update_order_status(order_id, request.status, Local::now().naive_local())
        .await?;

    Ok(Json(order))
}

/// Handler for PUT /api/orders/{order_id}/assign_delivery
#[utoipa::path(
    put,
    path = "/api/orders/{order_id}/assign_delivery",
    params(("order_id" = Uuid, Path, description = "Order ID")),
    request_body = AssignDeliveryRequest,
    responses(
        (status = 200, description = "Delivery partner assigned", body = OrderResponse),
        (status = 400, description = "Order already finished"),
        (status = 404, description = "Order not found")
    ),
    tag = "orders"
)]
pub async fn assign_delivery_handler(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(request): Json<AssignDeliveryRequest>,
) -> Result<Json<OrderResponse>, OrderError> {
    let order = state
        .order_service
        .assign_delivery_partner(
            order_id,
            request.delivery_partner_id,
            Local::now().naive_local(),
        )
        .await?;

    Ok(Json(order))
}

/// Handler for PUT /api/orders/{order_id}/cancel
#[utoipa::path(
    put,
    path = "/api/orders/{order_id}/cancel",
    params(("order_id" = Uuid, Path, description = "Order ID")),
    request_body = CancelOrderRequest,
    responses(
        (status = 200, description = "Order cancelled", body = OrderResponse),
        (status = 400, description = "Order can no longer be cancelled"),
        (status = 404, description = "Order not found")
    ),
    tag = "orders"
)]
pub async fn cancel_order_handler(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(request): Json<CancelOrderRequest>,
) -> Result<Json<OrderResponse>, OrderError> {
    request
        .validate()
        .map_err(|e| OrderError::ValidationError(e.to_string()))?;

    let order = state
        .order_service
        .cancel_order(order_id, &request.reason, Local::now().naive_local())
        .await?;

    Ok(Json(order))
}
