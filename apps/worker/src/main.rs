//! Inkwell background task worker.

#![forbid(unsafe_code)]

mod export_posts;

use std::env;
use std::sync::Arc;
use std::time::Duration;

use inkwell_application::{NotificationService, PostService, QueuedJob, TaskService};
use inkwell_core::{AppError, AppResult};
use inkwell_domain::TaskProgress;
use inkwell_infrastructure::{
    DEFAULT_JOB_TTL_SECONDS, PostgresNotificationRepository, PostgresPostRepository,
    PostgresTaskRepository, RedisJobQueue,
};
use serde_json::json;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
struct WorkerConfig {
    database_url: String,
    redis_url: String,
    job_queue_prefix: String,
    job_ttl_seconds: u64,
    worker_id: String,
    poll_seconds: u32,
}

/// Services a job handler may call.
#[derive(Clone)]
struct WorkerServices {
    task_service: TaskService,
    post_service: PostService,
    notification_service: NotificationService,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = WorkerConfig::load()?;
    let pool = connect_pool(config.database_url.as_str()).await?;
    let services = build_services(pool, &config)?;

    info!(
        worker_id = %config.worker_id,
        queue = %config.job_queue_prefix,
        poll_seconds = config.poll_seconds,
        "inkwell-worker started"
    );

    loop {
        match services.task_service.next_job(config.poll_seconds).await {
            Ok(Some(job)) => run_job(&services, &config.worker_id, job).await,
            Ok(None) => {}
            Err(error) => {
                warn!(
                    worker_id = %config.worker_id,
                    error = %error,
                    "failed to dequeue job"
                );
                tokio::time::sleep(Duration::from_secs(u64::from(config.poll_seconds))).await;
            }
        }
    }
}

/// Runs one job and always marks its task finished, even when the job fails.
async fn run_job(services: &WorkerServices, worker_id: &str, job: QueuedJob) {
    info!(
        worker_id = %worker_id,
        job_id = %job.id,
        task = job.name.as_str(),
        "job started"
    );

    let outcome = match job.name.as_str() {
        export_posts::TASK_NAME => export_posts::run(services, &job).await,
        other => {
            warn!(worker_id = %worker_id, job_id = %job.id, task = other, "unknown task name");
            Ok(())
        }
    };

    if let Err(error) = &outcome {
        warn!(
            worker_id = %worker_id,
            job_id = %job.id,
            error = %error,
            "job failed"
        );
    }

    if let Err(error) = finish_job(services, &job).await {
        warn!(
            worker_id = %worker_id,
            job_id = %job.id,
            error = %error,
            "failed to mark job finished"
        );
        return;
    }

    info!(worker_id = %worker_id, job_id = %job.id, "job finished");
}

/// Marks the task complete. A failed final progress report is logged and
/// does not keep the task in progress.
async fn finish_job(services: &WorkerServices, job: &QueuedJob) -> AppResult<()> {
    if let Err(error) = report_progress(services, job, TaskProgress::DONE).await {
        warn!(job_id = %job.id, error = %error, "failed to report final progress");
    }

    match services.task_service.complete_task(&job.id).await {
        // Tasks launched outside the ledger have nothing to complete.
        Err(AppError::NotFound(_)) => Ok(()),
        other => other,
    }
}

/// Publishes progress on the queue and as a `task_progress` notification.
async fn report_progress(
    services: &WorkerServices,
    job: &QueuedJob,
    progress: TaskProgress,
) -> AppResult<()> {
    services
        .task_service
        .report_progress(&job.id, progress)
        .await?;

    services
        .notification_service
        .add_notification(
            job.user_id,
            "task_progress",
            &json!({
                "task_id": job.id.as_str(),
                "progress": progress.percent(),
            }),
        )
        .await?;

    Ok(())
}

async fn connect_pool(database_url: &str) -> AppResult<PgPool> {
    PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))
}

fn build_services(pool: PgPool, config: &WorkerConfig) -> AppResult<WorkerServices> {
    let redis_client = redis::Client::open(config.redis_url.as_str())
        .map_err(|error| AppError::Validation(format!("invalid REDIS_URL: {error}")))?;
    let job_queue = Arc::new(RedisJobQueue::new(
        redis_client,
        config.job_queue_prefix.clone(),
        config.job_ttl_seconds,
    ));

    Ok(WorkerServices {
        task_service: TaskService::new(
            Arc::new(PostgresTaskRepository::new(pool.clone())),
            job_queue,
        ),
        post_service: PostService::new(Arc::new(PostgresPostRepository::new(pool.clone()))),
        notification_service: NotificationService::new(Arc::new(
            PostgresNotificationRepository::new(pool),
        )),
    })
}

impl WorkerConfig {
    fn load() -> AppResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let database_url = lookup("DATABASE_URL")
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| AppError::Validation("DATABASE_URL is required".to_owned()))?;
        let redis_url =
            lookup("REDIS_URL").unwrap_or_else(|| "redis://127.0.0.1:6379".to_owned());
        let job_queue_prefix = lookup("JOB_QUEUE_PREFIX").unwrap_or_else(|| "inkwell".to_owned());
        let job_ttl_seconds = parse_or("JOB_TTL_SECONDS", &lookup, DEFAULT_JOB_TTL_SECONDS)?;
        let worker_id = lookup("WORKER_ID")
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| format!("worker-{}", std::process::id()));
        let poll_seconds = parse_or("WORKER_POLL_SECONDS", &lookup, 5_u32)?;

        if poll_seconds == 0 {
            return Err(AppError::Validation(
                "WORKER_POLL_SECONDS must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            database_url,
            redis_url,
            job_queue_prefix,
            job_ttl_seconds,
            worker_id,
            poll_seconds,
        })
    }
}

fn parse_or<T>(name: &str, lookup: &impl Fn(&str) -> Option<String>, default: T) -> AppResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|error| AppError::Validation(format!("invalid {name} '{value}': {error}"))),
        None => Ok(default),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}
