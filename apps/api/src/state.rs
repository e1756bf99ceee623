use inkwell_application::{
    AuthorizationService, NotificationService, PostService, RoleService, TaskService, UserService,
};
use sqlx::PgPool;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub authorization_service: AuthorizationService,
    pub role_service: RoleService,
    pub post_service: PostService,
    pub task_service: TaskService,
    pub notification_service: NotificationService,
    pub postgres_pool: PgPool,
}
