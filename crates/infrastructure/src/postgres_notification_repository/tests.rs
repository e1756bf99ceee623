use inkwell_application::NotificationRepository;
use inkwell_domain::NewNotification;
use serde_json::json;

use super::PostgresNotificationRepository;
use crate::test_support::{insert_user, test_pool};

#[tokio::test]
async fn upsert_replaces_payload_for_same_name() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let user_id = insert_user(&pool).await;
    let repository = PostgresNotificationRepository::new(pool);

    let first = NewNotification::new("unread_count", &json!({"count": 2}))
        .unwrap_or_else(|_| unreachable!());
    let second = NewNotification::new("unread_count", &json!({"count": 5}))
        .unwrap_or_else(|_| unreachable!());

    let stored_first = repository.upsert_notification(user_id, &first).await;
    let stored_second = repository.upsert_notification(user_id, &second).await;
    assert!(matches!(
        (&stored_first, &stored_second),
        (Ok(first), Ok(second)) if first.id == second.id
    ));

    let listed = repository
        .list_notifications_since(user_id, 0.0)
        .await
        .unwrap_or_default();
    assert_eq!(listed.len(), 1);
    assert!(matches!(
        listed.first().map(|row| row.get_data()),
        Some(Ok(data)) if data == json!({"count": 5})
    ));
}

#[tokio::test]
async fn list_since_filters_by_timestamp() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let user_id = insert_user(&pool).await;
    let repository = PostgresNotificationRepository::new(pool);

    let notification = NewNotification::new("task_progress", &json!({"progress": 40}))
        .unwrap_or_else(|_| unreachable!());
    let Ok(stored) = repository.upsert_notification(user_id, &notification).await else {
        panic!("failed to store notification");
    };

    let newer = repository
        .list_notifications_since(user_id, stored.timestamp)
        .await;
    assert!(matches!(newer, Ok(rows) if rows.is_empty()));

    let older = repository
        .list_notifications_since(user_id, stored.timestamp - 1.0)
        .await;
    assert!(matches!(older, Ok(rows) if rows.len() == 1));
}
