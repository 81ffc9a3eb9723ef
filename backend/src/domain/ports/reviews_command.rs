//! Driving port for review mutations.
//!
//! Every operation acts on behalf of an already-resolved identity. Updates
//! and deletes only ever touch rows owned by that identity; anything else is
//! reported as a merged not-found-or-forbidden error.

use async_trait::async_trait;

use crate::domain::{Error, ItemId, Review, ReviewContent, ReviewId, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewsCommand: Send + Sync {
    /// Review `item_id` as `actor`.
    ///
    /// Fails with `NotFound` for an unknown item and `Conflict`
    /// (`duplicate_review`) when `actor` already reviewed it.
    async fn create_review(
        &self,
        actor: &UserId,
        item_id: &ItemId,
        content: ReviewContent,
    ) -> Result<Review, Error>;

    /// Replace `actor`'s review with new content.
    ///
    /// The returned review has a new identifier; the old one no longer
    /// resolves.
    async fn update_review(
        &self,
        actor: &UserId,
        review_id: &ReviewId,
        content: ReviewContent,
    ) -> Result<Review, Error>;

    /// Delete `actor`'s review and its comments.
    async fn delete_review(&self, actor: &UserId, review_id: &ReviewId) -> Result<(), Error>;
}
