//! Port for review persistence, including the ownership-scoped mutations.

use async_trait::async_trait;

use crate::domain::{AuthoredReview, ItemId, Review, ReviewContent, ReviewId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by review repository adapters.
    pub enum ReviewRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "review repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "review repository query failed: {message}",
        /// The author already reviewed this item.
        DuplicateReview => "a review by this user already exists for the item",
        /// The referenced item does not exist.
        ItemNotFound => "item not found",
    }
}

/// Review storage.
///
/// `replace_owned` and `delete_owned` locate the row by identifier *and*
/// owner in one lookup and run inside a single transaction. They return
/// `None`/`false` both when the row is missing and when it belongs to another
/// user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Insert a freshly created review.
    async fn create(&self, review: &Review) -> Result<(), ReviewRepositoryError>;

    /// Fetch a review by identifier, regardless of owner.
    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<Review>, ReviewRepositoryError>;

    /// Reviews of one item.
    async fn list_for_item(&self, item_id: &ItemId) -> Result<Vec<Review>, ReviewRepositoryError>;

    /// Reviews written by `author`, joined with the author's username.
    async fn list_authored_by(
        &self,
        author: &UserId,
    ) -> Result<Vec<AuthoredReview>, ReviewRepositoryError>;

    /// Replace `actor`'s review `id` with a recreated row carrying `content`.
    ///
    /// Comments on the old review move to the replacement.
    async fn replace_owned(
        &self,
        actor: &UserId,
        id: &ReviewId,
        content: ReviewContent,
    ) -> Result<Option<Review>, ReviewRepositoryError>;

    /// Delete `actor`'s review `id` together with its comments.
    async fn delete_owned(&self, actor: &UserId, id: &ReviewId)
    -> Result<bool, ReviewRepositoryError>;
}
