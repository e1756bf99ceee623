//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod content;
mod notification;
mod role;
mod security;
mod task;
mod user;

pub use content::{
    Comment, NewComment, NewPost, POST_TITLE_MAX_LENGTH, Post, TAG_NAME_MAX_LENGTH, Tag, slugify,
    validate_post_body,
};
pub use notification::{
    NOTIFICATION_NAME_MAX_LENGTH, NewNotification, Notification, unix_timestamp_now,
};
pub use role::{
    ADMINISTRATOR_ROLE_NAME, DEFAULT_ROLE_NAME, ROLE_CATALOG, ROLE_NAME_MAX_LENGTH, Role, RoleSeed,
};
pub use security::{Permission, PermissionSet};
pub use task::{JobId, NewTask, TASK_TEXT_MAX_LENGTH, Task, TaskProgress};
pub use user::{
    EMAIL_MAX_LENGTH, EmailAddress, PASSWORD_MAX_LENGTH, PASSWORD_MIN_LENGTH, USERNAME_MAX_LENGTH,
    User, UserId, Username, validate_password, validate_username,
};
