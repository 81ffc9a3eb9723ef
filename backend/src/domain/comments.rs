//! Comments left by users on reviews.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ownership::OwnedResource;
use super::{CommentId, ReviewId, UserId, Username};

/// Validation errors raised while building comment content.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommentValidationError {
    /// Comment text was blank.
    #[error("comment content must not be empty")]
    EmptyContent,
}

/// Caller-supplied fields of a comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentContent(String);

impl CommentContent {
    /// Validate comment text.
    pub fn try_new(content: impl Into<String>) -> Result<Self, CommentValidationError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(CommentValidationError::EmptyContent);
        }
        Ok(Self(content))
    }

    /// Comment text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// A stored comment.
///
/// ## Invariants
/// - `user_id` and `review_id` never change across updates; `id` does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Comment {
    /// Identifier of this version of the comment.
    pub id: CommentId,
    /// Comment text.
    #[schema(example = "I agree!")]
    pub content: String,
    /// Author.
    pub user_id: UserId,
    /// Review the comment is attached to.
    pub review_id: ReviewId,
}

impl Comment {
    /// Build a new comment on `review_id` authored by `author`.
    pub fn create(author: UserId, review_id: ReviewId, content: CommentContent) -> Self {
        Self {
            id: CommentId::random(),
            content: content.0,
            user_id: author,
            review_id,
        }
    }
}

impl OwnedResource for Comment {
    type Id = CommentId;
    type Parent = ReviewId;
    type Content = CommentContent;

    fn resource_id(&self) -> CommentId {
        self.id
    }

    fn owner(&self) -> &UserId {
        &self.user_id
    }

    fn parent(&self) -> ReviewId {
        self.review_id
    }

    fn recreated(&self, content: CommentContent) -> Self {
        Self::create(self.user_id, self.review_id, content)
    }
}

/// A comment joined with its author's username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthoredComment {
    /// The comment row.
    #[serde(flatten)]
    pub comment: Comment,
    /// Author's username.
    #[schema(value_type = String, example = "bob")]
    pub username: Username,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::locate_owned;
    use rstest::rstest;

    fn comment_by(author: UserId) -> Comment {
        Comment::create(
            author,
            ReviewId::random(),
            CommentContent::try_new("I agree!").expect("valid content"),
        )
    }

    #[rstest]
    #[case("")]
    #[case("\t\n")]
    fn blank_content_is_rejected(#[case] raw: &str) {
        assert_eq!(
            CommentContent::try_new(raw),
            Err(CommentValidationError::EmptyContent)
        );
    }

    #[rstest]
    fn recreated_keeps_owner_and_review() {
        let original = comment_by(UserId::random());
        let replacement =
            original.recreated(CommentContent::try_new("Changed my mind").expect("valid"));

        assert_ne!(replacement.id, original.id);
        assert_eq!(replacement.user_id, original.user_id);
        assert_eq!(replacement.review_id, original.review_id);
        assert_eq!(replacement.content, "Changed my mind");
    }

    #[rstest]
    fn locate_owned_treats_foreign_and_missing_rows_alike() {
        let alice = UserId::random();
        let bob = UserId::random();
        let alices = comment_by(alice);
        let rows = vec![alices.clone(), comment_by(bob)];

        assert_eq!(locate_owned(&rows, alices.id, &alice), Some(&alices));
        assert_eq!(locate_owned(&rows, alices.id, &bob), None);
        assert_eq!(locate_owned(&rows, CommentId::random(), &alice), None);
    }
}
