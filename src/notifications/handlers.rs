// HTTP handlers for notification endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::auth::AuthenticatedUser;
use crate::notifications::{CreateNotificationRequest, Notification, NotificationError};
use crate::AppState;

/// Handler for GET /api/restaurant/notifications/user/{user_id}
#[utoipa::path(
    get,
    path = "/api/restaurant/notifications/user/{user_id}",
    params(("user_id" = Uuid, Path, description = "Recipient")),
    responses(
        (status = 200, description = "Notifications, newest first", body = Vec<Notification>),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Not the recipient")
    ),
    tag = "notifications"
)]
pub async fn list_user_notifications(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<Notification>>, NotificationError> {
    Ok(Json(
        state.notification_service.list_for_user(&user, user_id).await?,
    ))
}

/// Handler for PUT /api/restaurant/notifications/{id}/read
#[utoipa::path(
    put,
    path = "/api/restaurant/notifications/{id}/read",
    params(("id" = Uuid, Path, description = "Notification ID")),
    responses(
        (status = 200, description = "Marked read", body = Notification),
        (status = 403, description = "Not the recipient"),
        (status = 404, description = "Notification not found")
    ),
    tag = "notifications"
)]
pub async fn mark_notification_read(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Notification>, NotificationError> {
    Ok(Json(state.notification_service.mark_read(&user, id).await?))
}

/// Handler for POST /api/restaurant/notifications
#[utoipa::path(
    post,
    path = "/api/restaurant/notifications",
    request_body = CreateNotificationRequest,
    responses(
        (status = 201, description = "Notification created", body = Notification),
        (status = 400, description = "Invalid notification"),
        (status = 403, description = "Role not allowed")
    ),
    tag = "notifications"
)]
pub async fn create_notification(
    State(state): State<AppState>,
    Json(request): Json<CreateNotificationRequest>,
) -> Result<(StatusCode, Json<Notification>), NotificationError> {
    let notification = state.notification_service.create(request).await?;
    Ok((StatusCode::CREATED, Json(notification)))
}
