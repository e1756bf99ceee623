//! PostgreSQL-backed task ledger.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use inkwell_application::TaskRepository;
use inkwell_core::{AppError, AppResult};
use inkwell_domain::{JobId, Task, UserId};

/// PostgreSQL implementation of the task repository port.
#[derive(Clone)]
pub struct PostgresTaskRepository {
    pool: PgPool,
}

impl PostgresTaskRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TaskRow {
    id: String,
    name: String,
    description: String,
    user_id: uuid::Uuid,
    complete: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<TaskRow> for Task {
    type Error = AppError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: JobId::new(row.id)?,
            name: row.name,
            description: row.description,
            user_id: UserId::from_uuid(row.user_id),
            complete: row.complete,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn create_task(&self, task: &Task) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO tasks (id, name, description, user_id, complete, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(task.id.as_str())
        .bind(task.name.as_str())
        .bind(task.description.as_str())
        .bind(task.user_id.as_uuid())
        .bind(task.complete)
        .bind(task.created_at)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            if let sqlx::Error::Database(ref database_error) = error
                && database_error.code().as_deref() == Some("23505")
            {
                return AppError::Conflict(format!("task '{}' already exists", task.id));
            }

            AppError::Internal(format!("failed to create task: {error}"))
        })?;

        Ok(())
    }

    async fn list_incomplete_tasks(&self, user_id: UserId) -> AppResult<Vec<Task>> {
        let rows = sqlx::query_as::<_, TaskRow>(
            r#"
            SELECT id, name, description, user_id, complete, created_at
            FROM tasks
            WHERE user_id = $1 AND NOT complete
            ORDER BY created_at, id
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list tasks: {error}")))?;

        rows.into_iter().map(Task::try_from).collect()
    }

    async fn find_incomplete_task(&self, user_id: UserId, name: &str) -> AppResult<Option<Task>> {
        let row = sqlx::query_as::<_, TaskRow>(
            r#"
            SELECT id, name, description, user_id, complete, created_at
            FROM tasks
            WHERE user_id = $1 AND name = $2 AND NOT complete
            ORDER BY created_at, id
            LIMIT 1
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find task '{name}': {error}")))?;

        row.map(Task::try_from).transpose()
    }

    async fn find_task(&self, job_id: &JobId) -> AppResult<Option<Task>> {
        let row = sqlx::query_as::<_, TaskRow>(
            r#"
            SELECT id, name, description, user_id, complete, created_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(job_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find task '{job_id}': {error}")))?;

        row.map(Task::try_from).transpose()
    }

    async fn mark_complete(&self, job_id: &JobId) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET complete = TRUE
            WHERE id = $1
            "#,
        )
        .bind(job_id.as_str())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to complete task '{job_id}': {error}"))
        })?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests;
