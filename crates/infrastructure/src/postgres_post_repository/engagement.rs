use super::*;

impl PostgresPostRepository {
    pub(super) async fn like_post_impl(&self, user_id: UserId, post_id: i64) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO likes (user_id, post_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, post_id) DO NOTHING
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(post_id)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to like post {post_id}: {error}")))?;

        Ok(result.rows_affected() > 0)
    }

    pub(super) async fn unlike_post_impl(&self, user_id: UserId, post_id: i64) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM likes
            WHERE user_id = $1 AND post_id = $2
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(post_id)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to unlike post {post_id}: {error}")))?;

        Ok(result.rows_affected() > 0)
    }

    pub(super) async fn has_liked_post_impl(
        &self,
        user_id: UserId,
        post_id: i64,
    ) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM likes WHERE user_id = $1 AND post_id = $2
            )
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(post_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to check like: {error}")))
    }

    pub(super) async fn add_comment_impl(
        &self,
        post_id: i64,
        author_id: UserId,
        comment: &NewComment,
    ) -> AppResult<Comment> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            INSERT INTO comments (body, author_id, post_id)
            VALUES ($1, $2, $3)
            RETURNING id, body, author_id, post_id, created_at, disabled
            "#,
        )
        .bind(comment.body())
        .bind(author_id.as_uuid())
        .bind(post_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to add comment: {error}")))?;

        Ok(row.into())
    }

    pub(super) async fn set_comment_disabled_impl(
        &self,
        comment_id: i64,
        disabled: bool,
    ) -> AppResult<Option<Comment>> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            UPDATE comments
            SET disabled = $2
            WHERE id = $1
            RETURNING id, body, author_id, post_id, created_at, disabled
            "#,
        )
        .bind(comment_id)
        .bind(disabled)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to moderate comment {comment_id}: {error}"))
        })?;

        Ok(row.map(Comment::from))
    }
}
