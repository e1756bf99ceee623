//! Task ledger ports and application service.
//!
//! A task mirrors one job on the external queue. The ledger stores ownership
//! and completion; progress is always read live from the queue.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, warn};

use inkwell_core::{AppError, AppResult};
use inkwell_domain::{JobId, NewTask, Task, TaskProgress, UserId};

// ---------------------------------------------------------------------------
// Ports
// ---------------------------------------------------------------------------

/// Job as seen on the external queue.
#[derive(Debug, Clone, PartialEq)]
pub struct QueuedJob {
    /// Queue-issued identifier.
    pub id: JobId,
    /// Task name the worker dispatches on.
    pub name: String,
    /// User the job runs for.
    pub user_id: UserId,
    /// Arguments passed at enqueue time.
    pub args: Value,
    /// Progress reported by the worker, if any.
    pub progress: Option<i64>,
}

/// External job queue port.
#[async_trait]
pub trait JobQueue: Send + Sync {
    /// Stores a job without making it visible to workers.
    async fn reserve(&self, name: &str, user_id: UserId, args: &Value) -> AppResult<JobId>;

    /// Hands a reserved job to the workers.
    async fn release(&self, job_id: &JobId) -> AppResult<()>;

    /// Looks up a job. Expired or unknown jobs are `None`.
    async fn fetch(&self, job_id: &JobId) -> AppResult<Option<QueuedJob>>;

    /// Records worker progress for a job.
    async fn set_progress(&self, job_id: &JobId, progress: u8) -> AppResult<()>;

    /// Blocks up to `timeout_seconds` for the next ready job.
    async fn dequeue(&self, timeout_seconds: u32) -> AppResult<Option<QueuedJob>>;
}

/// Repository port for the task ledger.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Inserts a task. An existing id is a conflict.
    async fn create_task(&self, task: &Task) -> AppResult<()>;

    /// Lists a user's incomplete tasks in creation order.
    async fn list_incomplete_tasks(&self, user_id: UserId) -> AppResult<Vec<Task>>;

    /// Finds the earliest incomplete task with `name` for a user.
    async fn find_incomplete_task(&self, user_id: UserId, name: &str) -> AppResult<Option<Task>>;

    /// Finds a task by job id.
    async fn find_task(&self, job_id: &JobId) -> AppResult<Option<Task>>;

    /// Flags a task complete. Returns false when the id is unknown.
    async fn mark_complete(&self, job_id: &JobId) -> AppResult<bool>;
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Application service for launching and tracking background tasks.
#[derive(Clone)]
pub struct TaskService {
    task_repository: Arc<dyn TaskRepository>,
    job_queue: Arc<dyn JobQueue>,
}

impl TaskService {
    /// Creates a new task service.
    #[must_use]
    pub fn new(task_repository: Arc<dyn TaskRepository>, job_queue: Arc<dyn JobQueue>) -> Self {
        Self {
            task_repository,
            job_queue,
        }
    }

    /// Enqueues `name` for `user_id` and records the resulting task.
    ///
    /// The job reaches the workers only after its task row exists. A job
    /// whose row could not be written is never released and expires.
    pub async fn launch_task(
        &self,
        user_id: UserId,
        name: &str,
        description: &str,
        args: &Value,
    ) -> AppResult<Task> {
        let new_task = NewTask::new(name, description)?;
        let job_id = self
            .job_queue
            .reserve(new_task.name(), user_id, args)
            .await?;

        let task = new_task.into_task(job_id, user_id);
        self.task_repository.create_task(&task).await?;
        if let Err(error) = self.job_queue.release(&task.id).await {
            warn!(job_id = %task.id, error = %error, "job could not be released");
            self.task_repository.mark_complete(&task.id).await?;
            return Err(error);
        }

        info!(
            job_id = %task.id,
            user_id = %user_id,
            task = task.name.as_str(),
            "task launched"
        );
        Ok(task)
    }

    /// Returns the user's incomplete tasks in creation order.
    pub async fn get_tasks_in_progress(&self, user_id: UserId) -> AppResult<Vec<Task>> {
        self.task_repository.list_incomplete_tasks(user_id).await
    }

    /// Returns the earliest incomplete task with `name`, if any.
    pub async fn get_task_in_progress(
        &self,
        user_id: UserId,
        name: &str,
    ) -> AppResult<Option<Task>> {
        self.task_repository
            .find_incomplete_task(user_id, name)
            .await
    }

    /// Returns a task owned by `user_id`. Other users' tasks are not found.
    pub async fn find_task(&self, user_id: UserId, job_id: &JobId) -> AppResult<Task> {
        self.task_repository
            .find_task(job_id)
            .await?
            .filter(|task| task.user_id == user_id)
            .ok_or_else(|| AppError::NotFound(format!("task '{job_id}' does not exist")))
    }

    /// Reads live progress for a task.
    ///
    /// A job the queue no longer knows, or a failed lookup, counts as done.
    pub async fn get_progress(&self, task: &Task) -> TaskProgress {
        match self.job_queue.fetch(&task.id).await {
            Ok(Some(job)) => TaskProgress::from_reported(job.progress),
            Ok(None) => TaskProgress::DONE,
            Err(error) => {
                warn!(
                    job_id = %task.id,
                    error = %error,
                    "job lookup failed, reporting task as done"
                );
                TaskProgress::DONE
            }
        }
    }

    /// Records worker progress on the queue.
    pub async fn report_progress(&self, job_id: &JobId, progress: TaskProgress) -> AppResult<()> {
        self.job_queue.set_progress(job_id, progress.percent()).await
    }

    /// Marks a task complete once its job has finished.
    pub async fn complete_task(&self, job_id: &JobId) -> AppResult<()> {
        if !self.task_repository.mark_complete(job_id).await? {
            return Err(AppError::NotFound(format!(
                "task '{job_id}' does not exist"
            )));
        }

        info!(job_id = %job_id, "task completed");
        Ok(())
    }

    /// Waits for the next job on the queue.
    pub async fn next_job(&self, timeout_seconds: u32) -> AppResult<Option<QueuedJob>> {
        self.job_queue.dequeue(timeout_seconds).await
    }
}
