//! Internal Diesel row structs.
//!
//! These never leave the persistence layer; repositories convert them to and
//! from domain types. Rows that fail domain validation on the way out are
//! reported as Diesel deserialisation errors.

use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    Comment, CommentId, Item, ItemId, PasswordDigest, Rating, Review, ReviewId, StoredUser, User,
    UserId, Username,
};

use super::schema::{comments, items, reviews, users};

fn invalid_row<E>(error: E) -> diesel::result::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    diesel::result::Error::DeserializationError(Box::new(error))
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub password_digest: String,
}

impl UserRow {
    pub(crate) fn into_stored(self) -> Result<StoredUser, diesel::result::Error> {
        let user = public_user(self.id, self.username)?;
        Ok(StoredUser {
            user,
            digest: PasswordDigest::new(self.password_digest),
        })
    }
}

/// Build the public identity from its two stored columns.
pub(crate) fn public_user(id: Uuid, username: String) -> Result<User, diesel::result::Error> {
    let username = Username::new(username).map_err(invalid_row)?;
    Ok(User::new(UserId::from_uuid(id), username))
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub password_digest: &'a str,
}

impl<'a> From<&'a StoredUser> for NewUserRow<'a> {
    fn from(value: &'a StoredUser) -> Self {
        Self {
            id: *value.user.id().as_uuid(),
            username: value.user.username().as_ref(),
            password_digest: value.digest.as_str(),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ItemRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

impl From<ItemRow> for Item {
    fn from(value: ItemRow) -> Self {
        Self {
            id: ItemId::from_uuid(value.id),
            name: value.name,
            description: value.description,
            image_url: value.image_url,
        }
    }
}

impl From<&Item> for ItemRow {
    fn from(value: &Item) -> Self {
        Self {
            id: *value.id.as_uuid(),
            name: value.name.clone(),
            description: value.description.clone(),
            image_url: value.image_url.clone(),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = reviews)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ReviewRow {
    pub id: Uuid,
    pub content: String,
    pub rating: i32,
    pub user_id: Uuid,
    pub item_id: Uuid,
}

impl ReviewRow {
    pub(crate) fn into_review(self) -> Result<Review, diesel::result::Error> {
        Ok(Review {
            id: ReviewId::from_uuid(self.id),
            content: self.content,
            rating: Rating::try_from(self.rating).map_err(invalid_row)?,
            user_id: UserId::from_uuid(self.user_id),
            item_id: ItemId::from_uuid(self.item_id),
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = reviews)]
pub(crate) struct NewReviewRow<'a> {
    pub id: Uuid,
    pub content: &'a str,
    pub rating: i32,
    pub user_id: Uuid,
    pub item_id: Uuid,
}

impl<'a> From<&'a Review> for NewReviewRow<'a> {
    fn from(value: &'a Review) -> Self {
        Self {
            id: *value.id.as_uuid(),
            content: value.content.as_str(),
            rating: value.rating.get(),
            user_id: *value.user_id.as_uuid(),
            item_id: *value.item_id.as_uuid(),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CommentRow {
    pub id: Uuid,
    pub content: String,
    pub user_id: Uuid,
    pub review_id: Uuid,
}

impl From<CommentRow> for Comment {
    fn from(value: CommentRow) -> Self {
        Self {
            id: CommentId::from_uuid(value.id),
            content: value.content,
            user_id: UserId::from_uuid(value.user_id),
            review_id: ReviewId::from_uuid(value.review_id),
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = comments)]
pub(crate) struct NewCommentRow<'a> {
    pub id: Uuid,
    pub content: &'a str,
    pub user_id: Uuid,
    pub review_id: Uuid,
}

impl<'a> From<&'a Comment> for NewCommentRow<'a> {
    fn from(value: &'a Comment) -> Self {
        Self {
            id: *value.id.as_uuid(),
            content: value.content.as_str(),
            user_id: *value.user_id.as_uuid(),
            review_id: *value.review_id.as_uuid(),
        }
    }
}
