//! PostgreSQL-backed `ReviewRepository` implementation using Diesel ORM.
//!
//! Updates and deletes run in one transaction that locks the target row with
//! `SELECT ... FOR UPDATE`, filtered by id *and* author. A concurrent second
//! mutation waits for the lock, then finds the row gone and reports a miss.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{ReviewRepository, ReviewRepositoryError};
use crate::domain::{
    AuthoredReview, ItemId, OwnedResource, Review, ReviewContent, ReviewId, UserId,
};

use super::diesel_helpers::{
    Violation, constraint_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{NewReviewRow, ReviewRow, public_user};
use super::pool::{DbPool, PoolError};
use super::schema::{comments, reviews, users};

const ONE_REVIEW_PER_ITEM: &str = "unique_user_id_per_review";
const REVIEW_ITEM_FKEY: &str = "reviews_item_id_fkey";

/// Diesel-backed implementation of the review repository port.
#[derive(Clone)]
pub struct DieselReviewRepository {
    pool: DbPool,
}

impl DieselReviewRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ReviewRepositoryError {
    map_basic_pool_error(error, ReviewRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ReviewRepositoryError {
    match constraint_violation(&error) {
        Some(violation @ Violation::Unique(_)) if violation.is(ONE_REVIEW_PER_ITEM) => {
            return ReviewRepositoryError::duplicate_review();
        }
        Some(violation @ Violation::ForeignKey(_)) if violation.is(REVIEW_ITEM_FKEY) => {
            return ReviewRepositoryError::item_not_found();
        }
        _ => {}
    }
    map_basic_diesel_error(
        error,
        ReviewRepositoryError::query,
        ReviewRepositoryError::connection,
    )
}

/// Lock `actor`'s review `id` for the rest of the transaction.
async fn lock_owned(
    conn: &mut AsyncPgConnection,
    actor: Uuid,
    id: Uuid,
) -> QueryResult<Option<Review>> {
    reviews::table
        .filter(reviews::id.eq(id))
        .filter(reviews::user_id.eq(actor))
        .select(ReviewRow::as_select())
        .for_update()
        .first(conn)
        .await
        .optional()?
        .map(ReviewRow::into_review)
        .transpose()
}

#[async_trait]
impl ReviewRepository for DieselReviewRepository {
    async fn create(&self, review: &Review) -> Result<(), ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(reviews::table)
            .values(NewReviewRow::from(review))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<Review>, ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        reviews::table
            .find(*id.as_uuid())
            .select(ReviewRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .and_then(|row| row.map(ReviewRow::into_review).transpose())
            .map_err(map_diesel_error)
    }

    async fn list_for_item(&self, item_id: &ItemId) -> Result<Vec<Review>, ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        reviews::table
            .filter(reviews::item_id.eq(*item_id.as_uuid()))
            .select(ReviewRow::as_select())
            .order_by((reviews::created_at.asc(), reviews::id.asc()))
            .load(&mut conn)
            .await
            .and_then(|rows| rows.into_iter().map(ReviewRow::into_review).collect())
            .map_err(map_diesel_error)
    }

    async fn list_authored_by(
        &self,
        author: &UserId,
    ) -> Result<Vec<AuthoredReview>, ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = reviews::table
            .inner_join(users::table)
            .filter(reviews::user_id.eq(*author.as_uuid()))
            .select((ReviewRow::as_select(), users::id, users::username))
            .order_by((reviews::created_at.asc(), reviews::id.asc()))
            .load::<(ReviewRow, Uuid, String)>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|(row, user_id, username)| {
                let author = public_user(user_id, username)?;
                Ok(AuthoredReview {
                    review: row.into_review()?,
                    username: author.username().clone(),
                })
            })
            .collect::<QueryResult<Vec<_>>>()
            .map_err(map_diesel_error)
    }

    async fn replace_owned(
        &self,
        actor: &UserId,
        id: &ReviewId,
        content: ReviewContent,
    ) -> Result<Option<Review>, ReviewRepositoryError> {
        let (actor, id) = (*actor.as_uuid(), *id.as_uuid());
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                let Some(existing) = lock_owned(conn, actor, id).await? else {
                    return Ok(None);
                };
                let replacement = existing.recreated(content);

                let deleted = diesel::delete(reviews::table.find(id)).execute(conn).await?;
                if deleted != 1 {
                    return Ok(None);
                }
                diesel::insert_into(reviews::table)
                    .values(NewReviewRow::from(&replacement))
                    .execute(conn)
                    .await?;
                // The foreign key is deferred, so comments may point at the
                // deleted id until this update runs.
                diesel::update(comments::table.filter(comments::review_id.eq(id)))
                    .set(comments::review_id.eq(*replacement.resource_id().as_uuid()))
                    .execute(conn)
                    .await?;

                Ok(Some(replacement))
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn delete_owned(
        &self,
        actor: &UserId,
        id: &ReviewId,
    ) -> Result<bool, ReviewRepositoryError> {
        let (actor, id) = (*actor.as_uuid(), *id.as_uuid());
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                if lock_owned(conn, actor, id).await?.is_none() {
                    return Ok(false);
                }
                diesel::delete(comments::table.filter(comments::review_id.eq(id)))
                    .execute(conn)
                    .await?;
                let deleted = diesel::delete(reviews::table.find(id)).execute(conn).await?;
                Ok(deleted == 1)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}
