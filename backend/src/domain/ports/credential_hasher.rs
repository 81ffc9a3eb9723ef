//! Port for one-way password hashing.
//!
//! Adapters produce self-describing digests: everything needed to verify a
//! password (algorithm, version, cost parameters, salt) travels inside the
//! [`PasswordDigest`] string.

use crate::domain::PasswordDigest;

use super::define_port_error;

define_port_error! {
    /// Errors raised while deriving a password digest.
    ///
    /// Messages never echo the plaintext.
    pub enum CredentialHashError {
        /// The plaintext was empty.
        EmptyPlaintext => "password must not be empty",
        /// The hashing backend rejected its parameters or failed internally.
        Backend { message: String } => "password hashing failed: {message}",
    }
}

/// Salted, deliberately slow password hashing.
///
/// Both operations are CPU-bound and synchronous; async callers should move
/// them onto a blocking thread.
#[cfg_attr(test, mockall::automock)]
pub trait CredentialHasher: Send + Sync {
    /// Derive a fresh digest with a newly generated salt.
    ///
    /// Hashing the same plaintext twice yields two different digests that
    /// both verify.
    fn hash(&self, plaintext: &str) -> Result<PasswordDigest, CredentialHashError>;

    /// Check `plaintext` against a stored digest.
    ///
    /// A malformed digest verifies as `false`.
    fn verify(&self, plaintext: &str, digest: &PasswordDigest) -> bool;
}
