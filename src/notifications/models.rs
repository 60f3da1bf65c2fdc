use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    OrderUpdate,
    Promotion,
    #[default]
    System,
}

/// A message addressed to one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Notification {
    pub id: Uuid,
    /// Recipient
    pub user_id: Uuid,
    #[schema(example = "Order out for delivery")]
    pub title: String,
    pub message: String,
    pub notification_type: NotificationType,
    pub is_read: bool,
    /// Free-form payload for the client, e.g. the order id
    #[schema(value_type = Option<Object>)]
    pub data_json: Option<serde_json::Value>,
    pub created_at: NaiveDateTime,
}

/// Request body for POST /api/restaurant/notifications
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateNotificationRequest {
    pub user_id: Uuid,
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 2000, message = "Message must be 1-2000 characters"))]
    pub message: String,
    #[serde(default)]
    pub notification_type: NotificationType,
    #[schema(value_type = Option<Object>)]
    pub data_json: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_type_defaults_to_system() {
        let request: CreateNotificationRequest = serde_json::from_value(json!({
            "user_id": Uuid::new_v4(),
            "title": "Welcome",
            "message": "Your restaurant is live"
        }))
        .unwrap();

        assert_eq!(request.notification_type, NotificationType::System);
        assert_eq!(request.data_json, None);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_payload_kept_as_json() {
        let order_id = Uuid::new_v4();
        let request: CreateNotificationRequest = serde_json::from_value(json!({
            "user_id": Uuid::new_v4(),
            "title": "Order confirmed",
            "message": "The kitchen has started on your order",
            "notification_type": "order_update",
            "data_json": {"order_id": order_id}
        }))
        .unwrap();

        assert_eq!(request.notification_type, NotificationType::OrderUpdate);
        assert_eq!(request.data_json.unwrap()["order_id"], json!(order_id));
    }

    #[test]
    fn test_empty_message_rejected() {
        let request = CreateNotificationRequest {
            user_id: Uuid::new_v4(),
            title: "Promo".to_string(),
            message: String::new(),
            notification_type: NotificationType::Promotion,
            data_json: None,
        };
        assert!(request.validate().is_err());
    }
}
