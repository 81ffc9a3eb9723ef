//! Comment use-cases.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{
    CommentRepository, CommentRepositoryError, CommentsCommand, CommentsQuery, ReviewRepository,
    ReviewRepositoryError,
};
use crate::domain::{
    AuthoredComment, Comment, CommentContent, CommentId, Error, ItemId, OwnedResource, Review,
    ReviewId, UserId,
};

const RESOURCE: &str = "Comment";

fn map_comment_error(error: CommentRepositoryError) -> Error {
    match error {
        CommentRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("comment repository unavailable: {message}"))
        }
        CommentRepositoryError::Query { message } => {
            Error::internal(format!("comment repository error: {message}"))
        }
        CommentRepositoryError::ReviewNotFound => review_not_found(),
    }
}

fn map_review_error(error: ReviewRepositoryError) -> Error {
    match error {
        ReviewRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("review repository unavailable: {message}"))
        }
        other => Error::internal(format!("review repository error: {other}")),
    }
}

fn review_not_found() -> Error {
    Error::not_found("Review not found")
}

/// Comment service implementing [`CommentsCommand`] and [`CommentsQuery`].
///
/// Reads reviews to check that a comment's target sits under the item named
/// in the request path.
pub struct CommentService<C, R> {
    comments: Arc<C>,
    reviews: Arc<R>,
}

impl<C, R> Clone for CommentService<C, R> {
    fn clone(&self) -> Self {
        Self {
            comments: Arc::clone(&self.comments),
            reviews: Arc::clone(&self.reviews),
        }
    }
}

impl<C, R> CommentService<C, R> {
    pub fn new(comments: Arc<C>, reviews: Arc<R>) -> Self {
        Self { comments, reviews }
    }
}

impl<C, R> CommentService<C, R>
where
    R: ReviewRepository,
{
    async fn review_under_item(
        &self,
        item_id: &ItemId,
        review_id: &ReviewId,
    ) -> Result<Review, Error> {
        self.reviews
            .find_by_id(review_id)
            .await
            .map_err(map_review_error)?
            .filter(|review| review.parent() == *item_id)
            .ok_or_else(review_not_found)
    }
}

#[async_trait]
impl<C, R> CommentsCommand for CommentService<C, R>
where
    C: CommentRepository,
    R: ReviewRepository,
{
    async fn create_comment(
        &self,
        actor: &UserId,
        item_id: &ItemId,
        review_id: &ReviewId,
        content: CommentContent,
    ) -> Result<Comment, Error> {
        let review = self.review_under_item(item_id, review_id).await?;
        let comment = Comment::create(*actor, review.id, content);
        self.comments
            .create(&comment)
            .await
            .map_err(map_comment_error)?;

        info!(comment_id = %comment.id, review_id = %review.id, user_id = %actor, "comment created");
        Ok(comment)
    }

    async fn update_comment(
        &self,
        actor: &UserId,
        comment_id: &CommentId,
        content: CommentContent,
    ) -> Result<Comment, Error> {
        let replacement = self
            .comments
            .replace_owned(actor, comment_id, content)
            .await
            .map_err(map_comment_error)?
            .ok_or_else(|| Error::not_found_or_forbidden(RESOURCE))?;

        info!(
            old_comment_id = %comment_id,
            comment_id = %replacement.resource_id(),
            user_id = %actor,
            "comment replaced"
        );
        Ok(replacement)
    }

    async fn delete_comment(&self, actor: &UserId, comment_id: &CommentId) -> Result<(), Error> {
        if !self
            .comments
            .delete_owned(actor, comment_id)
            .await
            .map_err(map_comment_error)?
        {
            return Err(Error::not_found_or_forbidden(RESOURCE));
        }

        info!(comment_id = %comment_id, user_id = %actor, "comment deleted");
        Ok(())
    }
}

#[async_trait]
impl<C, R> CommentsQuery for CommentService<C, R>
where
    C: CommentRepository,
    R: ReviewRepository,
{
    async fn comments_for_review(
        &self,
        item_id: &ItemId,
        review_id: &ReviewId,
    ) -> Result<Vec<Comment>, Error> {
        let review = self.review_under_item(item_id, review_id).await?;
        self.comments
            .list_for_review(&review.id)
            .await
            .map_err(map_comment_error)
    }

    async fn comments_by(&self, actor: &UserId) -> Result<Vec<AuthoredComment>, Error> {
        self.comments
            .list_authored_by(actor)
            .await
            .map_err(map_comment_error)
    }
}
