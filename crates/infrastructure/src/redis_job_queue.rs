//! Redis-backed job queue.
//!
//! Each job is a hash at `{prefix}:job:{id}` holding `name`, `user_id`,
//! `args`, `status` and, once reported, `progress`. Released job ids wait on
//! the list `{prefix}:queue`. Job hashes expire after the configured TTL,
//! after which lookups report the job as unknown.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use inkwell_application::{JobQueue, QueuedJob};
use inkwell_core::{AppError, AppResult};
use inkwell_domain::{JobId, UserId};
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, AsyncConnectionConfig, Script};
use serde_json::Value;
use tracing::debug;

/// Default lifetime of a job hash.
pub const DEFAULT_JOB_TTL_SECONDS: u64 = 86_400;

/// Extra time a blocking pop may take beyond its own timeout.
const DEQUEUE_RESPONSE_GRACE_SECONDS: u64 = 5;

const SET_PROGRESS_SCRIPT: &str = r#"
if redis.call('EXISTS', KEYS[1]) == 1 then
  redis.call('HSET', KEYS[1], 'progress', ARGV[1], 'status', ARGV[2])
  return 1
else
  return 0
end
"#;

/// Redis implementation of the job queue port.
#[derive(Clone)]
pub struct RedisJobQueue {
    client: redis::Client,
    key_prefix: String,
    job_ttl_seconds: u64,
}

impl RedisJobQueue {
    /// Creates a queue adapter with a configured Redis client and key prefix.
    #[must_use]
    pub fn new(client: redis::Client, key_prefix: impl Into<String>, job_ttl_seconds: u64) -> Self {
        Self {
            client,
            key_prefix: key_prefix.into(),
            job_ttl_seconds: job_ttl_seconds.max(1),
        }
    }

    fn job_key(&self, job_id: &str) -> String {
        format!("{}:job:{job_id}", self.key_prefix)
    }

    fn queue_key(&self) -> String {
        format!("{}:queue", self.key_prefix)
    }

    async fn connection(&self) -> AppResult<MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|error| {
                AppError::ExternalQueue(format!("failed to connect to redis: {error}"))
            })
    }

    /// Connection for `BRPOP`, whose reply may take the whole pop timeout.
    async fn blocking_connection(&self, timeout_seconds: u32) -> AppResult<MultiplexedConnection> {
        let response_timeout =
            Duration::from_secs(u64::from(timeout_seconds) + DEQUEUE_RESPONSE_GRACE_SECONDS);
        let config = AsyncConnectionConfig::new().set_response_timeout(Some(response_timeout));

        self.client
            .get_multiplexed_async_connection_with_config(&config)
            .await
            .map_err(|error| {
                AppError::ExternalQueue(format!("failed to connect to redis: {error}"))
            })
    }

    async fn load_job(
        &self,
        connection: &mut MultiplexedConnection,
        job_id: &JobId,
    ) -> AppResult<Option<QueuedJob>> {
        let fields: HashMap<String, String> = connection
            .hgetall(self.job_key(job_id.as_str()))
            .await
            .map_err(|error| {
                AppError::ExternalQueue(format!("failed to read job '{job_id}': {error}"))
            })?;

        if fields.is_empty() {
            return Ok(None);
        }

        job_from_fields(job_id.clone(), &fields).map(Some)
    }
}

#[async_trait]
impl JobQueue for RedisJobQueue {
    async fn reserve(&self, name: &str, user_id: UserId, args: &Value) -> AppResult<JobId> {
        let job_id = JobId::new(uuid::Uuid::new_v4().to_string())?;
        let key = self.job_key(job_id.as_str());
        let args = serde_json::to_string(args).map_err(|error| {
            AppError::Internal(format!("failed to encode job arguments: {error}"))
        })?;
        let fields = [
            ("name", name.to_owned()),
            ("user_id", user_id.to_string()),
            ("args", args),
            ("status", "queued".to_owned()),
        ];

        let mut connection = self.connection().await?;
        redis::pipe()
            .atomic()
            .hset_multiple(key.as_str(), &fields)
            .ignore()
            .expire(key.as_str(), i64::try_from(self.job_ttl_seconds).unwrap_or(i64::MAX))
            .ignore()
            .query_async::<()>(&mut connection)
            .await
            .map_err(|error| AppError::ExternalQueue(format!("failed to reserve job: {error}")))?;

        debug!(job_id = %job_id, name, "job reserved");
        Ok(job_id)
    }

    async fn release(&self, job_id: &JobId) -> AppResult<()> {
        let mut connection = self.connection().await?;
        connection
            .lpush::<_, _, ()>(self.queue_key(), job_id.as_str())
            .await
            .map_err(|error| {
                AppError::ExternalQueue(format!("failed to release job '{job_id}': {error}"))
            })?;

        debug!(job_id = %job_id, "job released");
        Ok(())
    }

    async fn fetch(&self, job_id: &JobId) -> AppResult<Option<QueuedJob>> {
        let mut connection = self.connection().await?;
        self.load_job(&mut connection, job_id).await
    }

    async fn set_progress(&self, job_id: &JobId, progress: u8) -> AppResult<()> {
        let status = if progress >= 100 { "finished" } else { "started" };
        let mut connection = self.connection().await?;

        Script::new(SET_PROGRESS_SCRIPT)
            .key(self.job_key(job_id.as_str()))
            .arg(progress)
            .arg(status)
            .invoke_async::<i32>(&mut connection)
            .await
            .map_err(|error| {
                AppError::ExternalQueue(format!(
                    "failed to record progress for job '{job_id}': {error}"
                ))
            })?;

        Ok(())
    }

    async fn dequeue(&self, timeout_seconds: u32) -> AppResult<Option<QueuedJob>> {
        // BRPOP treats 0 as "block forever".
        let timeout_seconds = timeout_seconds.max(1);
        let mut connection = self.blocking_connection(timeout_seconds).await?;
        let popped: Option<(String, String)> = connection
            .brpop(self.queue_key(), f64::from(timeout_seconds))
            .await
            .map_err(|error| AppError::ExternalQueue(format!("failed to dequeue job: {error}")))?;

        let Some((_, raw_id)) = popped else {
            return Ok(None);
        };
        let job_id = JobId::new(raw_id)?;

        let job = self.load_job(&mut connection, &job_id).await?;
        if job.is_none() {
            debug!(job_id = %job_id, "dequeued job expired before it ran");
        }
        Ok(job)
    }
}

fn job_from_fields(job_id: JobId, fields: &HashMap<String, String>) -> AppResult<QueuedJob> {
    let field = |name: &str| {
        fields.get(name).ok_or_else(|| {
            AppError::Decode(format!("job '{job_id}' is missing field '{name}'"))
        })
    };

    let user_id = uuid::Uuid::parse_str(field("user_id")?)
        .map(UserId::from_uuid)
        .map_err(|error| AppError::Decode(format!("job '{job_id}' has a bad user id: {error}")))?;
    let args = serde_json::from_str(field("args")?)
        .map_err(|error| AppError::Decode(format!("job '{job_id}' has bad arguments: {error}")))?;
    let progress = fields
        .get("progress")
        .map(|value| value.parse::<i64>())
        .transpose()
        .map_err(|error| AppError::Decode(format!("job '{job_id}' has bad progress: {error}")))?;

    Ok(QueuedJob {
        name: field("name")?.clone(),
        id: job_id,
        user_id,
        args,
        progress,
    })
}
