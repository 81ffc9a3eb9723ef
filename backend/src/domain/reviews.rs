//! Reviews: one user's rating and text for one catalogue item.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ownership::OwnedResource;
use super::{ItemId, ReviewId, UserId, Username};

/// Lowest accepted rating.
pub const RATING_MIN: i32 = 1;
/// Highest accepted rating.
pub const RATING_MAX: i32 = 5;

/// Validation errors raised while building review content.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReviewValidationError {
    /// Review text was blank.
    #[error("review content must not be empty")]
    EmptyContent,
    /// Rating fell outside the accepted range.
    #[error("rating must be between {min} and {max}")]
    RatingOutOfRange { min: i32, max: i32 },
}

/// Star rating in `RATING_MIN..=RATING_MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "i32", into = "i32")]
#[schema(value_type = i32, example = 4)]
pub struct Rating(i32);

impl Rating {
    /// Numeric value.
    pub fn get(self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for Rating {
    type Error = ReviewValidationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        if (RATING_MIN..=RATING_MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ReviewValidationError::RatingOutOfRange {
                min: RATING_MIN,
                max: RATING_MAX,
            })
        }
    }
}

impl From<Rating> for i32 {
    fn from(value: Rating) -> Self {
        value.0
    }
}

/// Caller-supplied fields of a review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewContent {
    content: String,
    rating: Rating,
}

impl ReviewContent {
    /// Validate review text and rating.
    pub fn try_new(content: impl Into<String>, rating: Rating) -> Result<Self, ReviewValidationError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(ReviewValidationError::EmptyContent);
        }
        Ok(Self { content, rating })
    }

    /// Validate raw inputs, including the numeric rating.
    pub fn try_from_parts(content: &str, rating: i32) -> Result<Self, ReviewValidationError> {
        let rating = Rating::try_from(rating)?;
        Self::try_new(content, rating)
    }

    /// Review text.
    pub fn content(&self) -> &str {
        self.content.as_str()
    }

    /// Star rating.
    pub fn rating(&self) -> Rating {
        self.rating
    }
}

/// A stored review.
///
/// ## Invariants
/// - At most one review per `(user_id, item_id)`.
/// - `user_id` and `item_id` never change across updates; `id` does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Review {
    /// Identifier of this version of the review.
    pub id: ReviewId,
    /// Review text.
    #[schema(example = "Great product!")]
    pub content: String,
    /// Star rating.
    pub rating: Rating,
    /// Author.
    pub user_id: UserId,
    /// Reviewed item.
    pub item_id: ItemId,
}

impl Review {
    /// Build a new review for `item_id` authored by `author`.
    pub fn create(author: UserId, item_id: ItemId, content: ReviewContent) -> Self {
        let ReviewContent { content, rating } = content;
        Self {
            id: ReviewId::random(),
            content,
            rating,
            user_id: author,
            item_id,
        }
    }
}

impl OwnedResource for Review {
    type Id = ReviewId;
    type Parent = ItemId;
    type Content = ReviewContent;

    fn resource_id(&self) -> ReviewId {
        self.id
    }

    fn owner(&self) -> &UserId {
        &self.user_id
    }

    fn parent(&self) -> ItemId {
        self.item_id
    }

    fn recreated(&self, content: ReviewContent) -> Self {
        Self::create(self.user_id, self.item_id, content)
    }
}

/// A review joined with its author's username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthoredReview {
    /// The review row.
    #[serde(flatten)]
    pub review: Review,
    /// Author's username.
    #[schema(value_type = String, example = "alice")]
    pub username: Username,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn content(text: &str, rating: i32) -> ReviewContent {
        ReviewContent::try_from_parts(text, rating).expect("valid content")
    }

    #[rstest]
    #[case(1)]
    #[case(5)]
    fn ratings_inside_the_range_are_accepted(#[case] value: i32) {
        assert_eq!(Rating::try_from(value).map(Rating::get), Ok(value));
    }

    #[rstest]
    #[case(0)]
    #[case(6)]
    #[case(-3)]
    fn ratings_outside_the_range_are_rejected(#[case] value: i32) {
        assert_eq!(
            Rating::try_from(value),
            Err(ReviewValidationError::RatingOutOfRange { min: 1, max: 5 })
        );
    }

    #[rstest]
    fn blank_content_is_rejected() {
        assert_eq!(
            ReviewContent::try_from_parts("   ", 3),
            Err(ReviewValidationError::EmptyContent)
        );
    }

    #[rstest]
    fn recreated_keeps_owner_and_item_but_mints_a_new_id() {
        let original = Review::create(UserId::random(), ItemId::random(), content("Great", 5));

        let replacement = original.recreated(content("Meh", 3));

        assert_ne!(replacement.id, original.id);
        assert_eq!(replacement.user_id, original.user_id);
        assert_eq!(replacement.item_id, original.item_id);
        assert_eq!(replacement.content, "Meh");
        assert_eq!(replacement.rating.get(), 3);
    }

    #[rstest]
    fn authored_review_flattens_the_row() {
        let review = Review::create(UserId::random(), ItemId::random(), content("Great", 5));
        let authored = AuthoredReview {
            review: review.clone(),
            username: Username::new("alice").expect("valid"),
        };

        let value = serde_json::to_value(&authored).expect("serialise");

        assert_eq!(value.get("id"), Some(&json!(review.id.to_string())));
        assert_eq!(value.get("rating"), Some(&json!(5)));
        assert_eq!(value.get("username"), Some(&json!("alice")));
    }
}
