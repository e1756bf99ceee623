use super::*;

impl PostService {
    /// Adds a comment to a post. Requires the comment permission.
    pub async fn add_comment(
        &self,
        author: &User,
        post_id: i64,
        body: &str,
    ) -> AppResult<Comment> {
        require_permission(author, Permission::Comment)?;
        let comment = NewComment::new(body)?;
        self.get_post(post_id).await?;

        self.repository
            .add_comment(post_id, author.id, &comment)
            .await
    }

    /// Hides or restores a comment. Requires the moderate permission.
    pub async fn set_comment_disabled(
        &self,
        moderator: &User,
        comment_id: i64,
        disabled: bool,
    ) -> AppResult<Comment> {
        require_permission(moderator, Permission::Moderate)?;

        let comment = self
            .repository
            .set_comment_disabled(comment_id, disabled)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("comment {comment_id} does not exist")))?;

        info!(
            comment_id,
            moderator_id = %moderator.id,
            disabled,
            "comment moderation changed"
        );
        Ok(comment)
    }
}
