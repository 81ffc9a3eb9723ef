//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{StoredUser, User, UserId, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another user already holds the username.
        DuplicateUsername => "username is already taken",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user with their password digest.
    async fn create(&self, user: &StoredUser) -> Result<(), UserPersistenceError>;

    /// Fetch a user and digest by exact (case-sensitive) username.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<StoredUser>, UserPersistenceError>;

    /// Fetch the public identity for `id`.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;
}
