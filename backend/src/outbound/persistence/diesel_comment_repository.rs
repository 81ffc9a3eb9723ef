//! PostgreSQL-backed `CommentRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{CommentRepository, CommentRepositoryError};
use crate::domain::{
    AuthoredComment, Comment, CommentContent, CommentId, OwnedResource, ReviewId, UserId,
};

use super::diesel_helpers::{
    Violation, constraint_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{CommentRow, NewCommentRow, public_user};
use super::pool::{DbPool, PoolError};
use super::schema::{comments, users};

const COMMENT_REVIEW_FKEY: &str = "comments_review_id_fkey";

/// Diesel-backed implementation of the comment repository port.
#[derive(Clone)]
pub struct DieselCommentRepository {
    pool: DbPool,
}

impl DieselCommentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CommentRepositoryError {
    map_basic_pool_error(error, CommentRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> CommentRepositoryError {
    if let Some(violation @ Violation::ForeignKey(_)) = constraint_violation(&error)
        && violation.is(COMMENT_REVIEW_FKEY)
    {
        return CommentRepositoryError::review_not_found();
    }
    map_basic_diesel_error(
        error,
        CommentRepositoryError::query,
        CommentRepositoryError::connection,
    )
}

async fn lock_owned(
    conn: &mut AsyncPgConnection,
    actor: Uuid,
    id: Uuid,
) -> QueryResult<Option<Comment>> {
    let row = comments::table
        .filter(comments::id.eq(id))
        .filter(comments::user_id.eq(actor))
        .select(CommentRow::as_select())
        .for_update()
        .first(conn)
        .await
        .optional()?;
    Ok(row.map(Comment::from))
}

#[async_trait]
impl CommentRepository for DieselCommentRepository {
    async fn create(&self, comment: &Comment) -> Result<(), CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(comments::table)
            .values(NewCommentRow::from(comment))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn list_for_review(
        &self,
        review_id: &ReviewId,
    ) -> Result<Vec<Comment>, CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = comments::table
            .filter(comments::review_id.eq(*review_id.as_uuid()))
            .select(CommentRow::as_select())
            .order_by((comments::created_at.asc(), comments::id.asc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Comment::from).collect())
    }

    async fn list_authored_by(
        &self,
        author: &UserId,
    ) -> Result<Vec<AuthoredComment>, CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = comments::table
            .inner_join(users::table)
            .filter(comments::user_id.eq(*author.as_uuid()))
            .select((CommentRow::as_select(), users::id, users::username))
            .order_by((comments::created_at.asc(), comments::id.asc()))
            .load::<(CommentRow, Uuid, String)>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|(row, user_id, username)| {
                let author = public_user(user_id, username)?;
                Ok(AuthoredComment {
                    comment: Comment::from(row),
                    username: author.username().clone(),
                })
            })
            .collect::<QueryResult<Vec<_>>>()
            .map_err(map_diesel_error)
    }

    async fn replace_owned(
        &self,
        actor: &UserId,
        id: &CommentId,
        content: CommentContent,
    ) -> Result<Option<Comment>, CommentRepositoryError> {
        let (actor, id) = (*actor.as_uuid(), *id.as_uuid());
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                let Some(existing) = lock_owned(conn, actor, id).await? else {
                    return Ok(None);
                };
                let replacement = existing.recreated(content);

                let deleted = diesel::delete(comments::table.find(id)).execute(conn).await?;
                if deleted != 1 {
                    return Ok(None);
                }
                diesel::insert_into(comments::table)
                    .values(NewCommentRow::from(&replacement))
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
        id: &CommentId,
    ) -> Result<bool, CommentRepositoryError> {
        let (actor, id) = (*actor.as_uuid(), *id.as_uuid());
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                if lock_owned(conn, actor, id).await?.is_none() {
                    return Ok(false);
                }
                let deleted = diesel::delete(comments::table.find(id)).execute(conn).await?;
                Ok(deleted == 1)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}
