use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use inkwell_core::{AppError, AppResult};
use inkwell_domain::{
    Comment, DEFAULT_ROLE_NAME, NewComment, NewPost, Post, ROLE_CATALOG, Role, User, UserId,
};
use tokio::sync::Mutex;

use super::{PostListing, PostRepository, PostService, PostSummary};

#[derive(Default)]
struct FakePostRepository {
    posts: Mutex<Vec<Post>>,
    comments: Mutex<Vec<Comment>>,
    likes: Mutex<Vec<(UserId, i64)>>,
}

impl FakePostRepository {
    async fn summarize(&self, post: Post) -> PostSummary {
        let comment_count = self
            .comments
            .lock()
            .await
            .iter()
            .filter(|comment| comment.post_id == post.id && !comment.disabled)
            .count();
        let like_count = self
            .likes
            .lock()
            .await
            .iter()
            .filter(|(_, post_id)| *post_id == post.id)
            .count();
        PostSummary {
            post,
            comment_count: i64::try_from(comment_count).unwrap_or_default(),
            like_count: i64::try_from(like_count).unwrap_or_default(),
        }
    }
}

#[async_trait]
impl PostRepository for FakePostRepository {
    async fn create_post(&self, author_id: UserId, post: &NewPost) -> AppResult<Post> {
        let mut posts = self.posts.lock().await;
        if post.slug().is_some()
            && posts
                .iter()
                .any(|existing| existing.slug.as_deref() == post.slug())
        {
            return Err(AppError::Conflict("slug already exists".to_owned()));
        }

        let stored = Post {
            id: i64::try_from(posts.len()).unwrap_or_default() + 1,
            title: post.title().map(str::to_owned),
            slug: post.slug().map(str::to_owned),
            body: post.body().to_owned(),
            author_id,
            created_at: Utc::now(),
            tags: post.tags().to_vec(),
        };
        posts.push(stored.clone());
        Ok(stored)
    }

    async fn list_posts(&self, offset: i64, limit: i64) -> AppResult<PostListing> {
        let posts = self.posts.lock().await.clone();
        let total = i64::try_from(posts.len()).unwrap_or_default();
        let page: Vec<_> = posts
            .into_iter()
            .rev()
            .skip(usize::try_from(offset).unwrap_or_default())
            .take(usize::try_from(limit).unwrap_or_default())
            .collect();

        let mut items = Vec::with_capacity(page.len());
        for post in page {
            items.push(self.summarize(post).await);
        }
        Ok(PostListing { items, total })
    }

    async fn find_post(&self, post_id: i64) -> AppResult<Option<PostSummary>> {
        let post = self
            .posts
            .lock()
            .await
            .iter()
            .find(|post| post.id == post_id)
            .cloned();
        match post {
            Some(post) => Ok(Some(self.summarize(post).await)),
            None => Ok(None),
        }
    }

    async fn find_post_by_slug(&self, slug: &str) -> AppResult<Option<PostSummary>> {
        let post = self
            .posts
            .lock()
            .await
            .iter()
            .find(|post| post.slug.as_deref() == Some(slug))
            .cloned();
        match post {
            Some(post) => Ok(Some(self.summarize(post).await)),
            None => Ok(None),
        }
    }

    async fn update_post_body(&self, post_id: i64, body: &str) -> AppResult<Option<Post>> {
        let mut posts = self.posts.lock().await;
        Ok(posts.iter_mut().find(|post| post.id == post_id).map(|post| {
            post.body = body.to_owned();
            post.clone()
        }))
    }

    async fn like_post(&self, user_id: UserId, post_id: i64) -> AppResult<bool> {
        let mut likes = self.likes.lock().await;
        if likes.contains(&(user_id, post_id)) {
            return Ok(false);
        }
        likes.push((user_id, post_id));
        Ok(true)
    }

    async fn unlike_post(&self, user_id: UserId, post_id: i64) -> AppResult<bool> {
        let mut likes = self.likes.lock().await;
        let before = likes.len();
        likes.retain(|like| *like != (user_id, post_id));
        Ok(likes.len() != before)
    }

    async fn has_liked_post(&self, user_id: UserId, post_id: i64) -> AppResult<bool> {
        Ok(self.likes.lock().await.contains(&(user_id, post_id)))
    }

    async fn add_comment(
        &self,
        post_id: i64,
        author_id: UserId,
        comment: &NewComment,
    ) -> AppResult<Comment> {
        let mut comments = self.comments.lock().await;
        let stored = Comment {
            id: i64::try_from(comments.len()).unwrap_or_default() + 1,
            body: comment.body().to_owned(),
            author_id,
            post_id,
            created_at: Utc::now(),
            disabled: false,
        };
        comments.push(stored.clone());
        Ok(stored)
    }

    async fn set_comment_disabled(
        &self,
        comment_id: i64,
        disabled: bool,
    ) -> AppResult<Option<Comment>> {
        let mut comments = self.comments.lock().await;
        Ok(comments
            .iter_mut()
            .find(|comment| comment.id == comment_id)
            .map(|comment| {
                comment.disabled = disabled;
                comment.clone()
            }))
    }
}

fn user_with_role(name: &str, role_name: Option<&str>) -> User {
    let role = role_name.map(|role_name| {
        let seed = ROLE_CATALOG
            .iter()
            .find(|seed| seed.name == role_name)
            .unwrap_or_else(|| unreachable!());
        let mut role = Role::new(seed.name).unwrap_or_else(|_| unreachable!());
        role.apply_seed(seed, DEFAULT_ROLE_NAME);
        role
    });

    User {
        id: UserId::new(),
        email: format!("{name}@example.com"),
        username: name.to_owned(),
        role,
        last_seen: Utc::now(),
    }
}

fn service() -> (Arc<FakePostRepository>, PostService) {
    let repository = Arc::new(FakePostRepository::default());
    (repository.clone(), PostService::new(repository))
}

async fn publish(service: &PostService, author: &User, title: &str) -> i64 {
    service
        .create_post(author, Some(title.to_owned()), "Some body text", &[])
        .await
        .map(|post| post.id)
        .unwrap_or_else(|_| unreachable!())
}

#[tokio::test]
async fn create_post_requires_write_permission() {
    let (_, service) = service();
    let reader = user_with_role("reader", Some("User"));

    let result = service
        .create_post(&reader, Some("Hello".to_owned()), "Body", &[])
        .await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn create_post_derives_slug_and_dedups_tags() {
    let (_, service) = service();
    let writer = user_with_role("writer", Some("Moderator"));

    let post = service
        .create_post(
            &writer,
            Some("Hello World!".to_owned()),
            "First post",
            &["rust".to_owned(), "web".to_owned(), "rust".to_owned(), " ".to_owned()],
        )
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(post.slug.as_deref(), Some("Hello-World-"));
    assert_eq!(post.tags.len(), 2);

    let by_slug = service.get_post_by_slug("Hello-World-").await;
    assert!(matches!(by_slug, Ok(summary) if summary.post.id == post.id));
}

#[tokio::test]
async fn create_post_rejects_empty_body() {
    let (repository, service) = service();
    let writer = user_with_role("writer", Some("Moderator"));

    let result = service.create_post(&writer, None, "   ", &[]).await;
    assert!(matches!(
        result,
        Err(AppError::Validation(message)) if message == "post does not have a body"
    ));
    assert!(repository.posts.lock().await.is_empty());
}

#[tokio::test]
async fn list_posts_paginates_newest_first() {
    let (_, service) = service();
    let writer = user_with_role("writer", Some("Moderator"));
    for index in 0..3 {
        publish(&service, &writer, format!("Post {index}").as_str()).await;
    }

    let first = service
        .list_posts(1, Some(2))
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(first.items.len(), 2);
    assert_eq!(first.total, 3);
    assert!(!first.has_prev());
    assert!(first.has_next());
    assert!(matches!(
        first.items.first(),
        Some(item) if item.post.title.as_deref() == Some("Post 2")
    ));

    let second = service
        .list_posts(2, Some(2))
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(second.items.len(), 1);
    assert!(second.has_prev());
    assert!(!second.has_next());

    assert!(matches!(
        service.list_posts(0, None).await,
        Err(AppError::Validation(_))
    ));
}

#[tokio::test]
async fn list_posts_clamps_page_size() {
    let (_, service) = service();

    let page = service
        .list_posts(1, Some(10_000))
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(page.per_page, super::MAX_POSTS_PER_PAGE);

    let page = service
        .list_posts(1, None)
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(page.per_page, super::DEFAULT_POSTS_PER_PAGE);
}

#[tokio::test]
async fn update_post_is_limited_to_author_and_administrators() {
    let (_, service) = service();
    let author = user_with_role("author", Some("Moderator"));
    let other = user_with_role("other", Some("Moderator"));
    let admin = user_with_role("admin", Some("Administrator"));
    let post_id = publish(&service, &author, "Editable").await;

    let denied = service.update_post(&other, post_id, "Hijacked").await;
    assert!(matches!(denied, Err(AppError::Forbidden(_))));

    let by_author = service.update_post(&author, post_id, "Edited").await;
    assert!(matches!(by_author, Ok(post) if post.body == "Edited"));

    let by_admin = service.update_post(&admin, post_id, "Moderated").await;
    assert!(matches!(by_admin, Ok(post) if post.body == "Moderated"));

    let missing = service.update_post(&admin, 999, "Nothing").await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn likes_are_idempotent_and_counted() {
    let (_, service) = service();
    let author = user_with_role("author", Some("Moderator"));
    let reader = user_with_role("reader", Some("User"));
    let post_id = publish(&service, &author, "Likeable").await;

    assert!(service.like_post(&reader, post_id).await.is_ok());
    assert!(service.like_post(&reader, post_id).await.is_ok());
    assert!(matches!(service.has_liked_post(&reader, post_id).await, Ok(true)));
    assert!(matches!(service.get_post(post_id).await, Ok(summary) if summary.like_count == 1));

    assert!(service.unlike_post(&reader, post_id).await.is_ok());
    assert!(service.unlike_post(&reader, post_id).await.is_ok());
    assert!(matches!(service.has_liked_post(&reader, post_id).await, Ok(false)));
    assert!(matches!(service.get_post(post_id).await, Ok(summary) if summary.like_count == 0));

    assert!(matches!(service.like_post(&reader, 404).await, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn comments_require_permission_and_can_be_moderated() {
    let (_, service) = service();
    let author = user_with_role("author", Some("Moderator"));
    let reader = user_with_role("reader", Some("User"));
    let roleless = user_with_role("roleless", None);
    let post_id = publish(&service, &author, "Discussed").await;

    let denied = service.add_comment(&roleless, post_id, "Hi").await;
    assert!(matches!(denied, Err(AppError::Forbidden(_))));

    let blank = service.add_comment(&reader, post_id, "").await;
    assert!(matches!(blank, Err(AppError::Validation(_))));

    let comment = service
        .add_comment(&reader, post_id, "Nice post")
        .await
        .unwrap_or_else(|_| unreachable!());
    assert!(matches!(service.get_post(post_id).await, Ok(summary) if summary.comment_count == 1));

    let not_moderator = service.set_comment_disabled(&reader, comment.id, true).await;
    assert!(matches!(not_moderator, Err(AppError::Forbidden(_))));

    let hidden = service.set_comment_disabled(&author, comment.id, true).await;
    assert!(matches!(hidden, Ok(comment) if comment.disabled));
    assert!(matches!(service.get_post(post_id).await, Ok(summary) if summary.comment_count == 0));

    let missing = service.set_comment_disabled(&author, 999, true).await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));
}
