//! Post, comment and like ports and application service.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use inkwell_core::{AppError, AppResult};
use inkwell_domain::{
    Comment, NewComment, NewPost, Permission, Post, Tag, User, UserId, validate_post_body,
};

use crate::require_permission;

mod comments;
mod likes;

/// Page size used when the caller does not pick one.
pub const DEFAULT_POSTS_PER_PAGE: u32 = 10;

/// Largest accepted page size.
pub const MAX_POSTS_PER_PAGE: u32 = 100;

// ---------------------------------------------------------------------------
// Ports
// ---------------------------------------------------------------------------

/// Post with its engagement counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostSummary {
    /// The post.
    pub post: Post,
    /// Number of visible comments.
    pub comment_count: i64,
    /// Number of likes.
    pub like_count: i64,
}

/// One slice of posts plus the overall count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostListing {
    /// Posts in the slice, newest first.
    pub items: Vec<PostSummary>,
    /// Total number of posts.
    pub total: i64,
}

/// Repository port for posts, comments and likes.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Inserts a post and links its tags, creating missing tags by slug.
    async fn create_post(&self, author_id: UserId, post: &NewPost) -> AppResult<Post>;

    /// Lists posts newest first.
    async fn list_posts(&self, offset: i64, limit: i64) -> AppResult<PostListing>;

    /// Finds a post by id.
    async fn find_post(&self, post_id: i64) -> AppResult<Option<PostSummary>>;

    /// Finds a post by slug.
    async fn find_post_by_slug(&self, slug: &str) -> AppResult<Option<PostSummary>>;

    /// Replaces a post body.
    async fn update_post_body(&self, post_id: i64, body: &str) -> AppResult<Option<Post>>;

    /// Records a like. Returns false when it already existed.
    async fn like_post(&self, user_id: UserId, post_id: i64) -> AppResult<bool>;

    /// Removes a like. Returns false when there was none.
    async fn unlike_post(&self, user_id: UserId, post_id: i64) -> AppResult<bool>;

    /// Returns whether the user likes the post.
    async fn has_liked_post(&self, user_id: UserId, post_id: i64) -> AppResult<bool>;

    /// Inserts a comment.
    async fn add_comment(
        &self,
        post_id: i64,
        author_id: UserId,
        comment: &NewComment,
    ) -> AppResult<Comment>;

    /// Sets the moderation flag of a comment.
    async fn set_comment_disabled(
        &self,
        comment_id: i64,
        disabled: bool,
    ) -> AppResult<Option<Comment>>;
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// One page of posts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostPage {
    /// Posts on this page.
    pub items: Vec<PostSummary>,
    /// 1-based page number.
    pub page: u32,
    /// Page size.
    pub per_page: u32,
    /// Total number of posts.
    pub total: i64,
}

impl PostPage {
    /// Returns whether an earlier page exists.
    #[must_use]
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// Returns whether a later page exists.
    #[must_use]
    pub fn has_next(&self) -> bool {
        i64::from(self.page) * i64::from(self.per_page) < self.total
    }
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Application service for blog content.
#[derive(Clone)]
pub struct PostService {
    repository: Arc<dyn PostRepository>,
}

impl PostService {
    /// Creates a new post service.
    #[must_use]
    pub fn new(repository: Arc<dyn PostRepository>) -> Self {
        Self { repository }
    }

    /// Publishes a post. Requires the write permission.
    pub async fn create_post(
        &self,
        author: &User,
        title: Option<String>,
        body: &str,
        tag_names: &[String],
    ) -> AppResult<Post> {
        require_permission(author, Permission::Write)?;

        let tags = tag_names
            .iter()
            .filter(|name| !name.trim().is_empty())
            .map(Tag::new)
            .collect::<AppResult<Vec<_>>>()?;
        let new_post = NewPost::new(title, body, tags)?;

        let post = self.repository.create_post(author.id, &new_post).await?;
        info!(post_id = post.id, author_id = %author.id, "post created");
        Ok(post)
    }

    /// Returns one page of posts, newest first.
    pub async fn list_posts(&self, page: u32, per_page: Option<u32>) -> AppResult<PostPage> {
        if page == 0 {
            return Err(AppError::Validation("page numbers start at 1".to_owned()));
        }

        let per_page = per_page
            .unwrap_or(DEFAULT_POSTS_PER_PAGE)
            .clamp(1, MAX_POSTS_PER_PAGE);
        let offset = i64::from(page - 1) * i64::from(per_page);
        let listing = self
            .repository
            .list_posts(offset, i64::from(per_page))
            .await?;

        Ok(PostPage {
            items: listing.items,
            page,
            per_page,
            total: listing.total,
        })
    }

    /// Returns a post by id.
    pub async fn get_post(&self, post_id: i64) -> AppResult<PostSummary> {
        self.repository
            .find_post(post_id)
            .await?
            .ok_or_else(|| post_not_found(post_id))
    }

    /// Returns a post by slug.
    pub async fn get_post_by_slug(&self, slug: &str) -> AppResult<PostSummary> {
        self.repository
            .find_post_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("post '{slug}' does not exist")))
    }

    /// Replaces the body of a post. Only the author or an administrator may edit.
    pub async fn update_post(&self, editor: &User, post_id: i64, body: &str) -> AppResult<Post> {
        validate_post_body(body)?;

        let existing = self.get_post(post_id).await?;
        if existing.post.author_id != editor.id && !editor.is_administrator() {
            return Err(AppError::Forbidden(
                "only the author or an administrator may edit this post".to_owned(),
            ));
        }

        let post = self
            .repository
            .update_post_body(post_id, body)
            .await?
            .ok_or_else(|| post_not_found(post_id))?;

        info!(post_id, editor_id = %editor.id, "post updated");
        Ok(post)
    }
}

fn post_not_found(post_id: i64) -> AppError {
    AppError::NotFound(format!("post {post_id} does not exist"))
}

#[cfg(test)]
mod tests;
