//! Identity use-cases: registration, login and bearer-token resolution.
//!
//! Password hashing and verification are CPU-bound, so they run on Tokio's
//! blocking pool with the request trace id carried across.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::domain::ports::{
    CredentialHashError, CredentialHasher, IdentityResolver, TokenCodec, TokenError,
    UserPersistenceError, UserRegistration, UserRepository,
};
use crate::domain::{
    BearerToken, Error, LoginCredentials, PasswordDigest, StoredUser, TraceId, User, UserId,
    Username,
};

const INVALID_CREDENTIALS: &str = "invalid credentials";

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateUsername => Error::duplicate_username(),
    }
}

fn map_hash_error(error: CredentialHashError) -> Error {
    match error {
        CredentialHashError::EmptyPlaintext => Error::invalid_request(error.to_string()),
        CredentialHashError::Backend { .. } => Error::internal(error.to_string()),
    }
}

fn map_token_error(error: TokenError) -> Error {
    match error {
        TokenError::Invalid => Error::unauthorized("invalid token"),
        TokenError::Expired => Error::unauthorized("token expired"),
        TokenError::Signing { .. } => Error::internal(error.to_string()),
    }
}

async fn run_blocking<F, R>(f: F) -> Result<R, Error>
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    TraceId::in_blocking_scope(f)
        .await
        .map_err(|err| Error::internal(format!("credential task failed: {err}")))
}

/// Identity service implementing [`UserRegistration`] and
/// [`IdentityResolver`].
pub struct IdentityService<U, H, T> {
    users: Arc<U>,
    hasher: Arc<H>,
    tokens: Arc<T>,
}

impl<U, H, T> Clone for IdentityService<U, H, T> {
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
            hasher: Arc::clone(&self.hasher),
            tokens: Arc::clone(&self.tokens),
        }
    }
}

impl<U, H, T> IdentityService<U, H, T> {
    pub fn new(users: Arc<U>, hasher: Arc<H>, tokens: Arc<T>) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }
}

impl<U, H, T> IdentityService<U, H, T>
where
    H: CredentialHasher + 'static,
{
    async fn hash(&self, credentials: &LoginCredentials) -> Result<PasswordDigest, Error> {
        let hasher = Arc::clone(&self.hasher);
        let password = Zeroizing::new(credentials.password().to_owned());
        run_blocking(move || hasher.hash(password.as_str()))
            .await?
            .map_err(map_hash_error)
    }
}

#[async_trait]
impl<U, H, T> UserRegistration for IdentityService<U, H, T>
where
    U: UserRepository,
    H: CredentialHasher + 'static,
    T: TokenCodec,
{
    async fn register(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let username = Username::new(credentials.username())
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let digest = self.hash(credentials).await?;
        let user = User::new(UserId::random(), username);

        self.users
            .create(&StoredUser {
                user: user.clone(),
                digest,
            })
            .await
            .map_err(map_user_error)?;

        info!(user_id = %user.id(), "registered user");
        Ok(user)
    }
}

#[async_trait]
impl<U, H, T> IdentityResolver for IdentityService<U, H, T>
where
    U: UserRepository,
    H: CredentialHasher + 'static,
    T: TokenCodec,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<BearerToken, Error> {
        // A name registration would refuse cannot belong to anyone.
        let stored = match Username::new(credentials.username()) {
            Ok(username) => self
                .users
                .find_by_username(&username)
                .await
                .map_err(map_user_error)?,
            Err(_) => None,
        };

        let Some(StoredUser { user, digest }) = stored else {
            // Spend a hash on unknown usernames so response time does not
            // reveal which usernames exist.
            if let Err(error) = self.hash(credentials).await {
                debug!(code = ?error.code(), "dummy hash failed");
            }
            debug!("login rejected");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let hasher = Arc::clone(&self.hasher);
        let password = Zeroizing::new(credentials.password().to_owned());
        let verified = run_blocking(move || hasher.verify(password.as_str(), &digest)).await?;
        if !verified {
            debug!(user_id = %user.id(), "login rejected");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        let token = self.tokens.issue(user.id()).map_err(map_token_error)?;
        info!(user_id = %user.id(), "issued bearer token");
        Ok(token)
    }

    async fn resolve(&self, token: &str) -> Result<User, Error> {
        let user_id = self.tokens.verify(token).map_err(|err| {
            debug!(reason = %err, "bearer token rejected");
            map_token_error(err)
        })?;

        self.users
            .find_by_id(&user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| {
                debug!(user_id = %user_id, "token subject no longer exists");
                Error::unauthorized("invalid token")
            })
    }
}

#[cfg(test)]
#[path = "identity_service_tests.rs"]
mod tests;
