use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use inkwell_core::AppResult;
use inkwell_domain::{NewNotification, Notification, UserId};

/// Repository port for the notification ledger.
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Writes a notification, replacing the payload and timestamp of any
    /// existing row with the same user and name.
    async fn upsert_notification(
        &self,
        user_id: UserId,
        notification: &NewNotification,
    ) -> AppResult<Notification>;

    /// Lists a user's notifications newer than `since`, oldest first.
    async fn list_notifications_since(
        &self,
        user_id: UserId,
        since: f64,
    ) -> AppResult<Vec<Notification>>;
}

/// Application service for per-user notifications.
#[derive(Clone)]
pub struct NotificationService {
    repository: Arc<dyn NotificationRepository>,
}

impl NotificationService {
    /// Creates a new notification service.
    #[must_use]
    pub fn new(repository: Arc<dyn NotificationRepository>) -> Self {
        Self { repository }
    }

    /// Stores `data` under `name` for the user. The latest write wins.
    pub async fn add_notification(
        &self,
        user_id: UserId,
        name: &str,
        data: &Value,
    ) -> AppResult<Notification> {
        let notification = NewNotification::new(name, data)?;
        let stored = self
            .repository
            .upsert_notification(user_id, &notification)
            .await?;

        debug!(user_id = %user_id, name = stored.name.as_str(), "notification stored");
        Ok(stored)
    }

    /// Lists notifications written after `since` seconds since the epoch.
    pub async fn list_since(&self, user_id: UserId, since: f64) -> AppResult<Vec<Notification>> {
        self.repository
            .list_notifications_since(user_id, since)
            .await
    }
}
