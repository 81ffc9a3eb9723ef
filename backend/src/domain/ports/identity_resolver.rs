//! Driving port for login and bearer-token resolution.
//!
//! In hexagonal terms this is a *driving* port: inbound adapters call it to
//! turn credentials into a token and a token back into an identity without
//! knowing how users, digests or signing keys are stored. The authorization
//! gate depends on this trait only, so HTTP tests can substitute a double.

use async_trait::async_trait;

use crate::domain::{BearerToken, Error, LoginCredentials, User};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Check credentials and issue a bearer token.
    ///
    /// Unknown usernames and wrong passwords fail with the same
    /// `Unauthorized` error.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<BearerToken, Error>;

    /// Resolve the raw `Authorization` value to a live user.
    ///
    /// Fails with `Unauthorized` when the token is missing, invalid, expired,
    /// or names a user that no longer exists.
    async fn resolve(&self, token: &str) -> Result<User, Error>;
}
