//! PostgreSQL-backed post, comment and like repository.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use inkwell_application::{PostListing, PostRepository, PostSummary};
use inkwell_core::{AppError, AppResult};
use inkwell_domain::{Comment, NewComment, NewPost, Post, Tag, UserId};

/// PostgreSQL implementation of the post repository port.
#[derive(Clone)]
pub struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SUMMARY_COLUMNS: &str = r#"
    posts.id,
    posts.title,
    posts.slug,
    posts.body,
    posts.author_id,
    posts.created_at,
    (
        SELECT COUNT(*) FROM comments
        WHERE comments.post_id = posts.id AND NOT comments.disabled
    ) AS comment_count,
    (SELECT COUNT(*) FROM likes WHERE likes.post_id = posts.id) AS like_count
"#;

#[derive(Debug, sqlx::FromRow)]
struct PostRow {
    id: i64,
    title: Option<String>,
    slug: Option<String>,
    body: String,
    author_id: uuid::Uuid,
    created_at: DateTime<Utc>,
}

impl PostRow {
    fn into_post(self, tags: Vec<Tag>) -> Post {
        Post {
            id: self.id,
            title: self.title,
            slug: self.slug,
            body: self.body,
            author_id: UserId::from_uuid(self.author_id),
            created_at: self.created_at,
            tags,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SummaryRow {
    #[sqlx(flatten)]
    post: PostRow,
    comment_count: i64,
    like_count: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct PostTagRow {
    post_id: i64,
    name: String,
}

#[derive(Debug, sqlx::FromRow)]
struct CommentRow {
    id: i64,
    body: String,
    author_id: uuid::Uuid,
    post_id: i64,
    created_at: DateTime<Utc>,
    disabled: bool,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.id,
            body: row.body,
            author_id: UserId::from_uuid(row.author_id),
            post_id: row.post_id,
            created_at: row.created_at,
            disabled: row.disabled,
        }
    }
}

mod engagement;
mod posts;

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create_post(&self, author_id: UserId, post: &NewPost) -> AppResult<Post> {
        self.create_post_impl(author_id, post).await
    }

    async fn list_posts(&self, offset: i64, limit: i64) -> AppResult<PostListing> {
        self.list_posts_impl(offset, limit).await
    }

    async fn find_post(&self, post_id: i64) -> AppResult<Option<PostSummary>> {
        self.find_post_impl(post_id).await
    }

    async fn find_post_by_slug(&self, slug: &str) -> AppResult<Option<PostSummary>> {
        self.find_post_by_slug_impl(slug).await
    }

    async fn update_post_body(&self, post_id: i64, body: &str) -> AppResult<Option<Post>> {
        self.update_post_body_impl(post_id, body).await
    }

    async fn like_post(&self, user_id: UserId, post_id: i64) -> AppResult<bool> {
        self.like_post_impl(user_id, post_id).await
    }

    async fn unlike_post(&self, user_id: UserId, post_id: i64) -> AppResult<bool> {
        self.unlike_post_impl(user_id, post_id).await
    }

    async fn has_liked_post(&self, user_id: UserId, post_id: i64) -> AppResult<bool> {
        self.has_liked_post_impl(user_id, post_id).await
    }

    async fn add_comment(
        &self,
        post_id: i64,
        author_id: UserId,
        comment: &NewComment,
    ) -> AppResult<Comment> {
        self.add_comment_impl(post_id, author_id, comment).await
    }

    async fn set_comment_disabled(
        &self,
        comment_id: i64,
        disabled: bool,
    ) -> AppResult<Option<Comment>> {
        self.set_comment_disabled_impl(comment_id, disabled).await
    }
}
