//! Credential and token adapters.
//!
//! - [`Argon2CredentialHasher`] implements `CredentialHasher` with Argon2id
//!   PHC strings.
//! - [`JwtTokenCodec`] implements `TokenCodec` with HS256 JSON Web Tokens.
//! - [`token_secret`] loads the HMAC signing secret from disk with the same
//!   release/debug policy the service applies to every secret it reads.

mod argon2_hasher;
mod jwt_codec;
pub mod token_secret;

pub use argon2_hasher::{Argon2CredentialHasher, HashingParams};
pub use jwt_codec::JwtTokenCodec;
pub use token_secret::{BuildMode, TokenSecret, TokenSecretError, token_secret_from_env};
