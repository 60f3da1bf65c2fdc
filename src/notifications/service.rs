use uuid::Uuid;
use validator::Validate;

use crate::auth::{AuthenticatedUser, Role};
use crate::notifications::{
    CreateNotificationRequest, Notification, NotificationError, NotificationRepository,
};

/// Users see their own notifications; admins see everyone's
pub fn can_access(user: &AuthenticatedUser, recipient: Uuid) -> bool {
    user.user_id == recipient || user.role == Role::Admin
}

#[derive(Clone)]
pub struct NotificationService {
    repository: NotificationRepository,
}

impl NotificationService {
    pub fn new(repository: NotificationRepository) -> Self {
        Self { repository }
    }

    pub async fn list_for_user(
        &self,
        user: &AuthenticatedUser,
        recipient: Uuid,
    ) -> Result<Vec<Notification>, NotificationError> {
        if !can_access(user, recipient) {
            return Err(NotificationError::Forbidden);
        }
        self.repository.find_by_user(recipient).await
    }

    pub async fn create(
        &self,
        request: CreateNotificationRequest,
    ) -> Result<Notification, NotificationError> {
        request
            .validate()
            .map_err(|e| NotificationError::ValidationError(e.to_string()))?;

        let notification = self.repository.create(&request).await?;
        tracing::debug!(
            "Queued notification {} for user {}",
            notification.id,
            notification.user_id
        );
        Ok(notification)
    }

    /// Marking an already read notification is a no-op that still succeeds
    pub async fn mark_read(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
    ) -> Result<Notification, NotificationError> {
        let notification = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(NotificationError::NotFound)?;

        if !can_access(user, notification.user_id) {
            return Err(NotificationError::Forbidden);
        }
        if notification.is_read {
            return Ok(notification);
        }
        self.repository.mark_read(id).await
    }
}
