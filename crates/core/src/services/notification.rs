//! Notification service.

use voxpop_common::{AppError, AppResult};
use voxpop_db::{entities::notification, repositories::NotificationRepository};

/// Notification service for business logic.
#[derive(Clone)]
pub struct NotificationService {
    notification_repo: NotificationRepository,
}

impl NotificationService {
    /// Create a new notification service.
    #[must_use]
    pub const fn new(notification_repo: NotificationRepository) -> Self {
        Self { notification_repo }
    }

    /// Notifications for a user, newest first.
    pub async fn list(
        &self,
        user_id: &str,
        unread_only: bool,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<notification::Model>> {
        self.notification_repo
            .find_by_user(user_id, unread_only, limit.min(100), offset)
            .await
    }

    /// Count unread notifications.
    pub async fn unread_count(&self, user_id: &str) -> AppResult<u64> {
        self.notification_repo.count_unread(user_id).await
    }

    /// Mark one notification as read. Only the recipient may.
    pub async fn mark_as_read(&self, user_id: &str, notification_id: &str) -> AppResult<()> {
        let notification = self
            .notification_repo
            .find_by_id(notification_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Notification not found: {notification_id}"))
            })?;

        if notification.recipient_id != user_id {
            return Err(AppError::Forbidden(
                "Not your notification".to_string(),
            ));
        }

        self.notification_repo.mark_as_read(notification_id).await
    }

    /// Mark all of a user's notifications as read.
    pub async fn mark_all_as_read(&self, user_id: &str) -> AppResult<()> {
        self.notification_repo.mark_all_as_read(user_id).await
    }

    /// Delete one notification. Only the recipient may.
    pub async fn delete(&self, user_id: &str, notification_id: &str) -> AppResult<()> {
        let notification = self
            .notification_repo
            .find_by_id(notification_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Notification not found: {notification_id}"))
            })?;

        if notification.recipient_id != user_id {
            return Err(AppError::Forbidden(
                "Not your notification".to_string(),
            ));
        }

        self.notification_repo.delete(notification_id).await
    }

    /// Clear a user's notifications.
    pub async fn delete_all(&self, user_id: &str) -> AppResult<()> {
        self.notification_repo.delete_all_for_user(user_id).await
    }
}
