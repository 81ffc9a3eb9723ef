//! Ownership-scoped mutation primitives shared by reviews and comments.
//!
//! A mutation on an owned resource follows one protocol regardless of the
//! storage adapter:
//!
//! 1. Locate the row by identifier *and* owner in a single lookup. A row that
//!    exists but belongs to someone else is indistinguishable from a missing
//!    row.
//! 2. For updates, capture the parent key from the stored row, delete it and
//!    insert [`OwnedResource::recreated`] in the same transaction.
//! 3. For deletes, remove the located row.
//!
//! Adapters own the transaction; this module owns the rules about what the
//! replacement row looks like.

use super::UserId;

/// A persisted row with a single owning user and an immutable parent key.
pub trait OwnedResource: Sized {
    /// Identifier type of the row.
    type Id: Copy + Eq;
    /// Foreign key of the row's parent (item for reviews, review for comments).
    type Parent: Copy + Eq;
    /// Caller-mutable fields.
    type Content;

    /// Identifier of this version of the row.
    fn resource_id(&self) -> Self::Id;

    /// User that created the row.
    fn owner(&self) -> &UserId;

    /// Parent key captured at creation.
    fn parent(&self) -> Self::Parent;

    /// Build the replacement row for an update.
    ///
    /// The replacement has a fresh identifier, the caller's new content, and
    /// the owner and parent key of `self`. Parent keys never come from the
    /// request body.
    fn recreated(&self, content: Self::Content) -> Self;

    /// Whether `actor` owns this row.
    fn is_owned_by(&self, actor: &UserId) -> bool {
        self.owner() == actor
    }
}

/// Find the row matching both `id` and `actor`.
///
/// Returns `None` when the row is missing *or* owned by someone else.
///
/// # Examples
/// ```
/// use reviewhub::domain::{
///     ItemId, Rating, Review, ReviewContent, UserId, locate_owned,
/// };
///
/// let alice = UserId::random();
/// let bob = UserId::random();
/// let content = ReviewContent::try_new("Great", Rating::try_from(5).unwrap()).unwrap();
/// let review = Review::create(alice, ItemId::random(), content);
/// let rows = vec![review.clone()];
///
/// assert_eq!(locate_owned(&rows, review.id, &alice), Some(&review));
/// assert_eq!(locate_owned(&rows, review.id, &bob), None);
/// ```
pub fn locate_owned<'a, R, I>(rows: I, id: R::Id, actor: &UserId) -> Option<&'a R>
where
    R: OwnedResource + 'a,
    I: IntoIterator<Item = &'a R>,
{
    rows.into_iter()
        .find(|row| row.resource_id() == id && row.is_owned_by(actor))
}
