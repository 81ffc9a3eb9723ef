//! Driving port for review reads.

use async_trait::async_trait;

use crate::domain::{AuthoredReview, Error, ItemId, Review, ReviewId, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewsQuery: Send + Sync {
    /// Reviews of an item.
    async fn reviews_for_item(&self, item_id: &ItemId) -> Result<Vec<Review>, Error>;

    /// One review of an item; `NotFound` when it belongs to another item.
    async fn review_for_item(&self, item_id: &ItemId, review_id: &ReviewId)
    -> Result<Review, Error>;

    /// Reviews written by `actor`.
    async fn reviews_by(&self, actor: &UserId) -> Result<Vec<AuthoredReview>, Error>;
}
