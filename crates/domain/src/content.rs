//! Posts, tags and comments.

use chrono::{DateTime, Utc};
use inkwell_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::UserId;

/// Maximum post title (and slug) length.
pub const POST_TITLE_MAX_LENGTH: usize = 140;

/// Maximum tag name length.
pub const TAG_NAME_MAX_LENGTH: usize = 32;

/// Replaces every character that is neither a word character nor `+` with `-`.
#[must_use]
pub fn slugify(value: &str) -> String {
    value
        .chars()
        .map(|character| {
            if character.is_alphanumeric() || character == '_' || character == '+' {
                character
            } else {
                '-'
            }
        })
        .collect()
}

/// Rejects blank post bodies.
pub fn validate_post_body(body: &str) -> AppResult<()> {
    if body.trim().is_empty() {
        return Err(AppError::Validation(
            "post does not have a body".to_owned(),
        ));
    }

    Ok(())
}

/// Tag attached to posts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    name: String,
    slug: String,
}

impl Tag {
    /// Creates a tag and derives its slug.
    pub fn new(name: impl Into<String>) -> AppResult<Self> {
        let name = NonEmptyString::with_max_chars("tag name", name, TAG_NAME_MAX_LENGTH)?;
        let name = String::from(name).trim().to_owned();
        let slug = slugify(name.as_str());
        Ok(Self { name, slug })
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the unique slug.
    #[must_use]
    pub fn slug(&self) -> &str {
        self.slug.as_str()
    }
}

/// Validated post creation input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    title: Option<String>,
    slug: Option<String>,
    body: String,
    tags: Vec<Tag>,
}

impl NewPost {
    /// Validates a post. The body is required; the title is optional and drives the slug.
    pub fn new(title: Option<String>, body: impl Into<String>, tags: Vec<Tag>) -> AppResult<Self> {
        let body = body.into();
        validate_post_body(body.as_str())?;

        let title: Option<String> = match title {
            Some(title) if !title.trim().is_empty() => Some(
                NonEmptyString::with_max_chars("post title", title, POST_TITLE_MAX_LENGTH)?.into(),
            ),
            _ => None,
        };
        let slug = title.as_deref().map(slugify);

        let mut unique_tags: Vec<Tag> = Vec::with_capacity(tags.len());
        for tag in tags {
            if !unique_tags.iter().any(|existing| existing.slug == tag.slug) {
                unique_tags.push(tag);
            }
        }

        Ok(Self {
            title,
            slug,
            body,
            tags: unique_tags,
        })
    }

    /// Returns the optional title.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Returns the slug derived from the title.
    #[must_use]
    pub fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    /// Returns the body.
    #[must_use]
    pub fn body(&self) -> &str {
        self.body.as_str()
    }

    /// Returns the de-duplicated tags.
    #[must_use]
    pub fn tags(&self) -> &[Tag] {
        self.tags.as_slice()
    }
}

/// Stored post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    /// Storage-assigned identifier.
    pub id: i64,
    /// Optional title.
    pub title: Option<String>,
    /// Unique slug derived from the title.
    pub slug: Option<String>,
    /// Body text.
    pub body: String,
    /// Author.
    pub author_id: UserId,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Attached tags.
    pub tags: Vec<Tag>,
}

/// Validated comment body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment(NonEmptyString);

impl NewComment {
    /// Validates a comment body.
    pub fn new(body: impl Into<String>) -> AppResult<Self> {
        NonEmptyString::new(body)
            .map(Self)
            .map_err(|_| AppError::Validation("comment does not have a body".to_owned()))
    }

    /// Returns the body.
    #[must_use]
    pub fn body(&self) -> &str {
        self.0.as_str()
    }
}

/// Stored comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Storage-assigned identifier.
    pub id: i64,
    /// Body text.
    pub body: String,
    /// Author.
    pub author_id: UserId,
    /// Post the comment belongs to.
    pub post_id: i64,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Hidden by a moderator.
    pub disabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_replaces_non_word_characters() {
        assert_eq!(slugify("Hello World!"), "Hello-World-");
        assert_eq!(slugify("C++ tips_and tricks"), "C++-tips_and-tricks");
        assert_eq!(slugify("Привет мир"), "Привет-мир");
    }

    #[test]
    fn empty_body_is_rejected() {
        let post = NewPost::new(Some("Title".to_owned()), "   ", Vec::new());
        assert!(matches!(
            post,
            Err(AppError::Validation(message)) if message == "post does not have a body"
        ));
    }

    #[test]
    fn post_without_title_has_no_slug() {
        let post = NewPost::new(None, "body text", Vec::new()).unwrap_or_else(|_| unreachable!());
        assert_eq!(post.slug(), None);
        assert_eq!(post.title(), None);
    }

    #[test]
    fn post_slug_follows_title() {
        let post = NewPost::new(Some("Rust at work".to_owned()), "body", Vec::new())
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(post.slug(), Some("Rust-at-work"));
    }

    #[test]
    fn duplicate_tags_are_collapsed() {
        let tags = ["rust", "rust", "web dev"]
            .into_iter()
            .map(|name| Tag::new(name).unwrap_or_else(|_| unreachable!()))
            .collect();
        let post = NewPost::new(None, "body", tags).unwrap_or_else(|_| unreachable!());

        let slugs: Vec<&str> = post.tags().iter().map(Tag::slug).collect();
        assert_eq!(slugs, vec!["rust", "web-dev"]);
    }

    #[test]
    fn overlong_title_is_rejected() {
        let post = NewPost::new(Some("t".repeat(POST_TITLE_MAX_LENGTH + 1)), "body", Vec::new());
        assert!(post.is_err());
    }

    #[test]
    fn blank_comment_is_rejected() {
        assert!(NewComment::new("\n").is_err());
        assert!(NewComment::new("nice post").is_ok());
    }
}
