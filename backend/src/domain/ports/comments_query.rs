//! Driving port for comment reads.

use async_trait::async_trait;

use crate::domain::{AuthoredComment, Comment, Error, ItemId, ReviewId, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentsQuery: Send + Sync {
    /// Comments on a review of `item_id`.
    async fn comments_for_review(
        &self,
        item_id: &ItemId,
        review_id: &ReviewId,
    ) -> Result<Vec<Comment>, Error>;

    /// Comments written by `actor`.
    async fn comments_by(&self, actor: &UserId) -> Result<Vec<AuthoredComment>, Error>;
}
