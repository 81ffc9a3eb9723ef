//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{StoredUser, User, UserId, Username};

use super::diesel_helpers::{constraint_violation, map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewUserRow, UserRow, public_user};
use super::pool::{DbPool, PoolError};
use super::schema::users;

const USERNAME_UNIQUE: &str = "users_username_key";

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    map_basic_pool_error(error, UserPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    if constraint_violation(&error).is_some_and(|violation| violation.is(USERNAME_UNIQUE)) {
        return UserPersistenceError::duplicate_username();
    }
    map_basic_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, user: &StoredUser) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(users::table)
            .values(NewUserRow::from(user))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<StoredUser>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        users::table
            .filter(users::username.eq(username.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .and_then(|row| row.map(UserRow::into_stored).transpose())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        users::table
            .find(*id.as_uuid())
            .select((users::id, users::username))
            .first::<(uuid::Uuid, String)>(&mut conn)
            .await
            .optional()
            .and_then(|row| row.map(|(id, name)| public_user(id, name)).transpose())
            .map_err(map_diesel_error)
    }
}
