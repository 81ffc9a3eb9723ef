//! Port for issuing and verifying stateless bearer tokens.

use crate::domain::{BearerToken, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by token codec adapters.
    ///
    /// `Invalid` covers every structural or cryptographic failure so callers
    /// cannot distinguish a forged token from a truncated one.
    pub enum TokenError {
        /// Malformed, wrongly signed, or carrying an unusable subject.
        Invalid => "token is invalid",
        /// Well-formed and correctly signed, but past its expiry.
        Expired => "token has expired",
        /// The adapter failed to sign a token.
        Signing { message: String } => "token signing failed: {message}",
    }
}

/// Signs identity claims with a server-held secret and verifies them later
/// without any server-side session state.
#[cfg_attr(test, mockall::automock)]
pub trait TokenCodec: Send + Sync {
    /// Issue a token asserting `user_id`.
    fn issue(&self, user_id: &UserId) -> Result<BearerToken, TokenError>;

    /// Verify `token` and return the user identifier it asserts.
    ///
    /// Depends only on the token, the secret and the current time.
    fn verify(&self, token: &str) -> Result<UserId, TokenError>;
}
