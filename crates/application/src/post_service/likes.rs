use super::*;

impl PostService {
    /// Likes a post. Liking twice has no further effect.
    pub async fn like_post(&self, user: &User, post_id: i64) -> AppResult<()> {
        self.get_post(post_id).await?;

        if self.repository.like_post(user.id, post_id).await? {
            info!(post_id, user_id = %user.id, "post liked");
        }
        Ok(())
    }

    /// Removes a like. Unliking a post that is not liked has no effect.
    pub async fn unlike_post(&self, user: &User, post_id: i64) -> AppResult<()> {
        self.get_post(post_id).await?;

        if self.repository.unlike_post(user.id, post_id).await? {
            info!(post_id, user_id = %user.id, "post unliked");
        }
        Ok(())
    }

    /// Returns whether the user likes the post.
    pub async fn has_liked_post(&self, user: &User, post_id: i64) -> AppResult<bool> {
        self.repository.has_liked_post(user.id, post_id).await
    }
}
