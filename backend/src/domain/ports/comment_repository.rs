//! Port for comment persistence, including the ownership-scoped mutations.

use async_trait::async_trait;

use crate::domain::{AuthoredComment, Comment, CommentContent, CommentId, ReviewId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by comment repository adapters.
    pub enum CommentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "comment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "comment repository query failed: {message}",
        /// The referenced review does not exist.
        ReviewNotFound => "review not found",
    }
}

/// Comment storage. Mutations follow the same ownership protocol as
/// [`super::ReviewRepository`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Insert a freshly created comment.
    async fn create(&self, comment: &Comment) -> Result<(), CommentRepositoryError>;

    /// Comments attached to one review.
    async fn list_for_review(
        &self,
        review_id: &ReviewId,
    ) -> Result<Vec<Comment>, CommentRepositoryError>;

    /// Comments written by `author`, joined with the author's username.
    async fn list_authored_by(
        &self,
        author: &UserId,
    ) -> Result<Vec<AuthoredComment>, CommentRepositoryError>;

    /// Replace `actor`'s comment `id` with a recreated row carrying `content`.
    async fn replace_owned(
        &self,
        actor: &UserId,
        id: &CommentId,
        content: CommentContent,
    ) -> Result<Option<Comment>, CommentRepositoryError>;

    /// Delete `actor`'s comment `id`.
    async fn delete_owned(
        &self,
        actor: &UserId,
        id: &CommentId,
    ) -> Result<bool, CommentRepositoryError>;
}
