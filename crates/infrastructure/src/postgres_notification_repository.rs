//! PostgreSQL-backed notification ledger.

use async_trait::async_trait;
use sqlx::PgPool;

use inkwell_application::NotificationRepository;
use inkwell_core::{AppError, AppResult};
use inkwell_domain::{NewNotification, Notification, UserId};

/// PostgreSQL implementation of the notification repository port.
#[derive(Clone)]
pub struct PostgresNotificationRepository {
    pool: PgPool,
}

impl PostgresNotificationRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct NotificationRow {
    id: i64,
    name: String,
    user_id: uuid::Uuid,
    timestamp: f64,
    payload_json: String,
}

impl From<NotificationRow> for Notification {
    fn from(row: NotificationRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            user_id: UserId::from_uuid(row.user_id),
            timestamp: row.timestamp,
            payload_json: row.payload_json,
        }
    }
}

#[async_trait]
impl NotificationRepository for PostgresNotificationRepository {
    async fn upsert_notification(
        &self,
        user_id: UserId,
        notification: &NewNotification,
    ) -> AppResult<Notification> {
        let row = sqlx::query_as::<_, NotificationRow>(
            r#"
            INSERT INTO notifications (name, user_id, timestamp, payload_json)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, name) DO UPDATE
            SET timestamp = EXCLUDED.timestamp,
                payload_json = EXCLUDED.payload_json
            RETURNING id, name, user_id, timestamp, payload_json
            "#,
        )
        .bind(notification.name())
        .bind(user_id.as_uuid())
        .bind(notification.timestamp())
        .bind(notification.payload_json())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to store notification '{}': {error}",
                notification.name()
            ))
        })?;

        Ok(row.into())
    }

    async fn list_notifications_since(
        &self,
        user_id: UserId,
        since: f64,
    ) -> AppResult<Vec<Notification>> {
        let rows = sqlx::query_as::<_, NotificationRow>(
            r#"
            SELECT id, name, user_id, timestamp, payload_json
            FROM notifications
            WHERE user_id = $1 AND timestamp > $2
            ORDER BY timestamp, id
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(since)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list notifications: {error}")))?;

        Ok(rows.into_iter().map(Notification::from).collect())
    }
}

#[cfg(test)]
mod tests;
