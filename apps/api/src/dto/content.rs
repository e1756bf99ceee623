use chrono::SecondsFormat;
use inkwell_application::{PostPage, PostSummary};
use inkwell_domain::{Comment, Post, Tag};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for post creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/create-post-request.ts"
)]
pub struct CreatePostRequest {
    #[serde(default)]
    pub title: Option<String>,
    pub body: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Incoming payload for post edits.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/update-post-request.ts"
)]
pub struct UpdatePostRequest {
    pub body: String,
}

/// Query string for the post listing.
#[derive(Debug, Default, Deserialize)]
pub struct PostListQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// API representation of a post with engagement counts.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/post-response.ts"
)]
pub struct PostResponse {
    pub id: i64,
    pub title: Option<String>,
    pub slug: Option<String>,
    pub body: String,
    pub author_id: String,
    pub created_at: String,
    pub tags: Vec<String>,
    pub comment_count: i64,
    pub like_count: i64,
}

impl PostResponse {
    fn from_post(post: Post, comment_count: i64, like_count: i64) -> Self {
        Self {
            id: post.id,
            title: post.title,
            slug: post.slug,
            body: post.body,
            author_id: post.author_id.to_string(),
            created_at: post.created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            tags: post.tags.iter().map(Tag::name).map(str::to_owned).collect(),
            comment_count,
            like_count,
        }
    }
}

impl From<PostSummary> for PostResponse {
    fn from(summary: PostSummary) -> Self {
        Self::from_post(summary.post, summary.comment_count, summary.like_count)
    }
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self::from_post(post, 0, 0)
    }
}

/// One page of the post listing.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/post-page-response.ts"
)]
pub struct PostPageResponse {
    pub items: Vec<PostResponse>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
    pub has_prev: bool,
    pub has_next: bool,
}

impl From<PostPage> for PostPageResponse {
    fn from(page: PostPage) -> Self {
        let has_prev = page.has_prev();
        let has_next = page.has_next();

        Self {
            items: page.items.into_iter().map(PostResponse::from).collect(),
            page: page.page,
            per_page: page.per_page,
            total: page.total,
            has_prev,
            has_next,
        }
    }
}

/// Incoming payload for a new comment.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/create-comment-request.ts"
)]
pub struct CreateCommentRequest {
    pub body: String,
}

/// Incoming payload for comment moderation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/set-comment-disabled-request.ts"
)]
pub struct SetCommentDisabledRequest {
    pub disabled: bool,
}

/// API representation of a comment.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/comment-response.ts"
)]
pub struct CommentResponse {
    pub id: i64,
    pub post_id: i64,
    pub author_id: String,
    pub body: String,
    pub created_at: String,
    pub disabled: bool,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            post_id: comment.post_id,
            author_id: comment.author_id.to_string(),
            body: comment.body,
            created_at: comment.created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            disabled: comment.disabled,
        }
    }
}

/// Like state of a post for the caller.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/like-response.ts"
)]
pub struct LikeResponse {
    pub post_id: i64,
    pub liked: bool,
}
