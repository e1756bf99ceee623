use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use inkwell_core::UserIdentity;

use crate::dto::{
    CommentResponse, CreateCommentRequest, CreatePostRequest, LikeResponse, PostListQuery,
    PostPageResponse, PostResponse, SetCommentDisabledRequest, UpdatePostRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

mod engagement;
mod publishing;

pub use engagement::{
    add_comment_handler, like_post_handler, like_status_handler, set_comment_disabled_handler,
    unlike_post_handler,
};
pub use publishing::{
    create_post_handler, get_post_by_slug_handler, get_post_handler, list_posts_handler,
    update_post_handler,
};
