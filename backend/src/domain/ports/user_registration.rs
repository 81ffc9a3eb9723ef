//! Driving port for account creation.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, User};

/// Domain use-case port for registering new users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRegistration: Send + Sync {
    /// Create a user with a hashed password.
    ///
    /// A taken username fails with `Conflict` and details code
    /// `duplicate_username`.
    async fn register(&self, credentials: &LoginCredentials) -> Result<User, Error>;
}
