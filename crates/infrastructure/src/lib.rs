//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod argon2_password_hasher;
mod postgres_notification_repository;
mod postgres_post_repository;
mod postgres_role_repository;
mod postgres_task_repository;
mod postgres_user_repository;
mod redis_job_queue;

#[cfg(test)]
mod test_support;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use postgres_notification_repository::PostgresNotificationRepository;
pub use postgres_post_repository::PostgresPostRepository;
pub use postgres_role_repository::PostgresRoleRepository;
pub use postgres_task_repository::PostgresTaskRepository;
pub use postgres_user_repository::PostgresUserRepository;
pub use redis_job_queue::{DEFAULT_JOB_TTL_SECONDS, RedisJobQueue};
