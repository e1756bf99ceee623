//! Application services and ports.

#![forbid(unsafe_code)]

mod authorization_service;
mod notification_service;
mod post_service;
mod role_service;
mod task_service;
mod user_service;

pub use authorization_service::{AuthorizationService, require_permission};
pub use notification_service::{NotificationRepository, NotificationService};
pub use post_service::{
    DEFAULT_POSTS_PER_PAGE, MAX_POSTS_PER_PAGE, PostListing, PostPage, PostRepository, PostService,
    PostSummary,
};
pub use role_service::{RoleRepository, RoleService};
pub use task_service::{JobQueue, QueuedJob, TaskRepository, TaskService};
pub use user_service::{
    CreateUserInput, DEFAULT_TOKEN_LIFETIME_SECONDS, IssuedToken, PasswordHasher, RegisterParams,
    TokenOwner, UserAccount, UserRepository, UserService,
};
