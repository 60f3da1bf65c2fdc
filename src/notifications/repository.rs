use sqlx::PgPool;
use uuid::Uuid;

use crate::notifications::{CreateNotificationRequest, Notification, NotificationError};

const NOTIFICATION_COLUMNS: &str =
    "id, user_id, title, message, notification_type, is_read, data_json, created_at";

#[derive(Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Newest first
    pub async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Notification>, NotificationError> {
        let notifications = sqlx::query_as::<_, Notification>(&format!(
            "SELECT {} FROM notifications WHERE user_id = $1 ORDER BY created_at DESC",
            NOTIFICATION_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(notifications)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Notification>, NotificationError> {
        let notification = sqlx::query_as::<_, Notification>(&format!(
            "SELECT {} FROM notifications WHERE id = $1",
            NOTIFICATION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(notification)
    }

    pub async fn create(
        &self,
        request: &CreateNotificationRequest,
    ) -> Result<Notification, NotificationError> {
        let notification = sqlx::query_as::<_, Notification>(&format!(
            r#"
            INSERT INTO notifications (user_id, title, message, notification_type, data_json)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            NOTIFICATION_COLUMNS
        ))
        .bind(request.user_id)
        .bind(&request.title)
        .bind(&request.message)
        .bind(request.notification_type)
        .bind(&request.data_json)
        .fetch_one(&self.pool)
        .await?;

        Ok(notification)
    }

    pub async fn mark_read(&self, id: Uuid) -> Result<Notification, NotificationError> {
        let notification = sqlx::query_as::<_, Notification>(&format!(
            "UPDATE notifications SET is_read = TRUE WHERE id = $1 RETURNING {}",
            NOTIFICATION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(NotificationError::NotFound)?;

        Ok(notification)
    }
}
