//! Driving port for comment mutations.

use async_trait::async_trait;

use crate::domain::{Comment, CommentContent, CommentId, Error, ItemId, ReviewId, UserId};

/// Comment write operations on behalf of a resolved identity.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentsCommand: Send + Sync {
    /// Comment on `review_id` as `actor`.
    ///
    /// The review must exist and belong to `item_id`.
    async fn create_comment(
        &self,
        actor: &UserId,
        item_id: &ItemId,
        review_id: &ReviewId,
        content: CommentContent,
    ) -> Result<Comment, Error>;

    /// Replace `actor`'s comment with new content under a new identifier.
    async fn update_comment(
        &self,
        actor: &UserId,
        comment_id: &CommentId,
        content: CommentContent,
    ) -> Result<Comment, Error>;

    /// Delete `actor`'s comment.
    async fn delete_comment(&self, actor: &UserId, comment_id: &CommentId) -> Result<(), Error>;
}
