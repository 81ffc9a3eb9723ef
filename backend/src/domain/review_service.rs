//! Review use-cases.
//!
//! Create takes the item from the request path and the author from the
//! resolved identity. Update and delete go through the repository's
//! ownership-scoped operations; a miss is reported with the merged
//! not-found-or-forbidden error whether the review is absent or foreign.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{ReviewRepository, ReviewRepositoryError, ReviewsCommand, ReviewsQuery};
use crate::domain::{
    AuthoredReview, Error, ItemId, OwnedResource, Review, ReviewContent, ReviewId, UserId,
};

const RESOURCE: &str = "Review";

fn map_repository_error(error: ReviewRepositoryError) -> Error {
    match error {
        ReviewRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("review repository unavailable: {message}"))
        }
        ReviewRepositoryError::Query { message } => {
            Error::internal(format!("review repository error: {message}"))
        }
        ReviewRepositoryError::DuplicateReview => Error::duplicate_review(),
        ReviewRepositoryError::ItemNotFound => Error::not_found("Item not found"),
    }
}

/// Review service implementing [`ReviewsCommand`] and [`ReviewsQuery`].
#[derive(Clone)]
pub struct ReviewService<R> {
    reviews: Arc<R>,
}

impl<R> ReviewService<R> {
    pub fn new(reviews: Arc<R>) -> Self {
        Self { reviews }
    }
}

#[async_trait]
impl<R> ReviewsCommand for ReviewService<R>
where
    R: ReviewRepository,
{
    async fn create_review(
        &self,
        actor: &UserId,
        item_id: &ItemId,
        content: ReviewContent,
    ) -> Result<Review, Error> {
        let review = Review::create(*actor, *item_id, content);
        self.reviews
            .create(&review)
            .await
            .map_err(map_repository_error)?;

        info!(review_id = %review.id, item_id = %item_id, user_id = %actor, "review created");
        Ok(review)
    }

    async fn update_review(
        &self,
        actor: &UserId,
        review_id: &ReviewId,
        content: ReviewContent,
    ) -> Result<Review, Error> {
        let replacement = self
            .reviews
            .replace_owned(actor, review_id, content)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found_or_forbidden(RESOURCE))?;

        info!(
            old_review_id = %review_id,
            review_id = %replacement.resource_id(),
            user_id = %actor,
            "review replaced"
        );
        Ok(replacement)
    }

    async fn delete_review(&self, actor: &UserId, review_id: &ReviewId) -> Result<(), Error> {
        let deleted = self
            .reviews
            .delete_owned(actor, review_id)
            .await
            .map_err(map_repository_error)?;
        if !deleted {
            return Err(Error::not_found_or_forbidden(RESOURCE));
        }

        info!(review_id = %review_id, user_id = %actor, "review deleted");
        Ok(())
    }
}

#[async_trait]
impl<R> ReviewsQuery for ReviewService<R>
where
    R: ReviewRepository,
{
    async fn reviews_for_item(&self, item_id: &ItemId) -> Result<Vec<Review>, Error> {
        self.reviews
            .list_for_item(item_id)
            .await
            .map_err(map_repository_error)
    }

    async fn review_for_item(
        &self,
        item_id: &ItemId,
        review_id: &ReviewId,
    ) -> Result<Review, Error> {
        self.reviews
            .find_by_id(review_id)
            .await
            .map_err(map_repository_error)?
            .filter(|review| review.parent() == *item_id)
            .ok_or_else(|| Error::not_found("Review not found"))
    }

    async fn reviews_by(&self, actor: &UserId) -> Result<Vec<AuthoredReview>, Error> {
        self.reviews
            .list_authored_by(actor)
            .await
            .map_err(map_repository_error)
    }
}

#[cfg(test)]
#[path = "review_service_tests.rs"]
mod tests;
