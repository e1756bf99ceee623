use std::sync::Arc;

use inkwell_application::{
    AuthorizationService, NotificationService, PostService, RoleService, TaskService, UserService,
};
use inkwell_core::AppError;
use inkwell_infrastructure::{
    Argon2PasswordHasher, PostgresNotificationRepository, PostgresPostRepository,
    PostgresRoleRepository, PostgresTaskRepository, PostgresUserRepository, RedisJobQueue,
};
use sqlx::PgPool;

use crate::api_config::ApiConfig;
use crate::state::AppState;

use super::redis::build_redis_client;

pub fn build_app_state(pool: PgPool, config: &ApiConfig) -> Result<AppState, AppError> {
    let redis_client = build_redis_client(&config.redis_url)?;

    let role_repository = Arc::new(PostgresRoleRepository::new(pool.clone()));
    let user_repository = Arc::new(PostgresUserRepository::new(pool.clone()));
    let job_queue = Arc::new(RedisJobQueue::new(
        redis_client,
        config.job_queue_prefix.clone(),
        config.job_ttl_seconds,
    ));

    Ok(AppState {
        user_service: UserService::new(
            user_repository.clone(),
            role_repository.clone(),
            Arc::new(Argon2PasswordHasher::new()),
            config.administrator_email.clone(),
        ),
        authorization_service: AuthorizationService::new(user_repository),
        role_service: RoleService::new(role_repository),
        post_service: PostService::new(Arc::new(PostgresPostRepository::new(pool.clone()))),
        task_service: TaskService::new(
            Arc::new(PostgresTaskRepository::new(pool.clone())),
            job_queue,
        ),
        notification_service: NotificationService::new(Arc::new(
            PostgresNotificationRepository::new(pool.clone()),
        )),
        postgres_pool: pool,
    })
}
