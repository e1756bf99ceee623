use serde::Serialize;
use ts_rs::TS;

mod auth;
mod content;
mod roles;
mod tasks;

pub use auth::{LoginRequest, RegisterRequest, TokenRequest, TokenResponse, UserResponse};
pub use content::{
    CommentResponse, CreateCommentRequest, CreatePostRequest, LikeResponse, PostListQuery,
    PostPageResponse, PostResponse, SetCommentDisabledRequest, UpdatePostRequest,
};
pub use roles::RoleResponse;
pub use tasks::{
    LaunchTaskRequest, NotificationQuery, NotificationResponse, TaskProgressResponse, TaskResponse,
};

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
}
