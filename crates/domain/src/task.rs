//! Background task references.

use chrono::{DateTime, Utc};
use inkwell_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::UserId;

/// Maximum task name and description length.
pub const TASK_TEXT_MAX_LENGTH: usize = 128;

/// Opaque identifier issued by the job queue for one submission.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(String);

impl JobId {
    /// Wraps a queue-issued identifier.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation("job id must not be empty".to_owned()));
        }

        if value.len() > 36 {
            return Err(AppError::Validation(
                "job id must not exceed 36 characters".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the identifier string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Ledger entry for work dispatched to the job queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Queue job identifier.
    pub id: JobId,
    /// Task name as understood by the worker.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Owning user.
    pub user_id: UserId,
    /// Set once the worker reports completion.
    pub complete: bool,
    /// Ledger insertion time.
    pub created_at: DateTime<Utc>,
}

/// Validated input for recording a dispatched task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    name: NonEmptyString,
    description: NonEmptyString,
}

impl NewTask {
    /// Validates a task name and description.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> AppResult<Self> {
        Ok(Self {
            name: NonEmptyString::with_max_chars("task name", name, TASK_TEXT_MAX_LENGTH)?,
            description: NonEmptyString::with_max_chars(
                "task description",
                description,
                TASK_TEXT_MAX_LENGTH,
            )?,
        })
    }

    /// Returns the task name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Builds the ledger entry for a queue submission.
    #[must_use]
    pub fn into_task(self, id: JobId, user_id: UserId) -> Task {
        Task {
            id,
            name: self.name.into(),
            description: self.description.into(),
            user_id,
            complete: false,
            created_at: Utc::now(),
        }
    }
}

/// Completion percentage of a task, always within `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskProgress(u8);

impl TaskProgress {
    /// Progress of a task whose job can no longer be found.
    pub const DONE: Self = Self(100);

    /// Progress of a job that has not reported anything yet.
    pub const NOT_STARTED: Self = Self(0);

    /// Normalizes a value reported by a job.
    #[must_use]
    pub fn from_reported(value: Option<i64>) -> Self {
        match value {
            // Bounded by the clamp.
            Some(value) => Self(value.clamp(0, 100) as u8),
            None => Self::NOT_STARTED,
        }
    }

    /// Returns the percentage.
    #[must_use]
    pub fn percent(self) -> u8 {
        self.0
    }
}
