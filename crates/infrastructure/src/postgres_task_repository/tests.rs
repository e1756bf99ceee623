use chrono::{Duration, Utc};
use inkwell_application::TaskRepository;
use inkwell_core::AppError;
use inkwell_domain::{JobId, NewTask, Task, UserId};
use uuid::Uuid;

use super::PostgresTaskRepository;
use crate::test_support::{insert_user, test_pool};

fn task(user_id: UserId, name: &str, age_seconds: i64) -> Task {
    let job_id = JobId::new(Uuid::new_v4().to_string()).unwrap_or_else(|_| unreachable!());
    let mut task = NewTask::new(name, "Export data")
        .unwrap_or_else(|_| unreachable!())
        .into_task(job_id, user_id);
    task.created_at = Utc::now() - Duration::seconds(age_seconds);
    task
}

#[tokio::test]
async fn incomplete_tasks_follow_creation_order() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let user_id = insert_user(&pool).await;
    let repository = PostgresTaskRepository::new(pool);

    let older = task(user_id, "export", 20);
    let newer = task(user_id, "export", 10);
    assert!(repository.create_task(&newer).await.is_ok());
    assert!(repository.create_task(&older).await.is_ok());

    let listed = repository.list_incomplete_tasks(user_id).await;
    assert!(matches!(
        &listed,
        Ok(tasks) if tasks.iter().map(|task| task.id.clone()).collect::<Vec<_>>()
            == vec![older.id.clone(), newer.id.clone()]
    ));

    let first = repository.find_incomplete_task(user_id, "export").await;
    assert!(matches!(first, Ok(Some(found)) if found.id == older.id));

    assert!(matches!(repository.mark_complete(&older.id).await, Ok(true)));
    let next = repository.find_incomplete_task(user_id, "export").await;
    assert!(matches!(next, Ok(Some(found)) if found.id == newer.id));
}

#[tokio::test]
async fn duplicate_job_id_is_a_conflict() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let user_id = insert_user(&pool).await;
    let repository = PostgresTaskRepository::new(pool);

    let task = task(user_id, "export", 0);
    assert!(repository.create_task(&task).await.is_ok());
    assert!(matches!(
        repository.create_task(&task).await,
        Err(AppError::Conflict(_))
    ));
}

#[tokio::test]
async fn completing_unknown_task_reports_false() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresTaskRepository::new(pool);
    let job_id = JobId::new(Uuid::new_v4().to_string()).unwrap_or_else(|_| unreachable!());

    assert!(matches!(repository.mark_complete(&job_id).await, Ok(false)));
    assert!(matches!(repository.find_task(&job_id).await, Ok(None)));
}
