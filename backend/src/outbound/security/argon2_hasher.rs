//! Argon2id implementation of the `CredentialHasher` port.

use argon2::{Algorithm, Argon2, Params, Version};
use password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use rand::RngCore;
use rand::rngs::OsRng;

use crate::domain::PasswordDigest;
use crate::domain::ports::{CredentialHashError, CredentialHasher};

const SALT_LEN: usize = 16;

/// Argon2 cost parameters applied to newly created digests.
///
/// Existing digests keep the parameters they were created with; verification
/// reads them back out of the PHC string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashingParams {
    /// Memory cost in KiB.
    pub memory_kib: u32,
    /// Number of passes.
    pub iterations: u32,
    /// Degree of parallelism.
    pub parallelism: u32,
}

impl Default for HashingParams {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

/// Argon2id credential hasher.
#[derive(Clone)]
pub struct Argon2CredentialHasher {
    argon2: Argon2<'static>,
}

impl Argon2CredentialHasher {
    /// Build a hasher with explicit cost parameters.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialHashError::Backend`] when Argon2 rejects the
    /// parameters (for example a memory cost below `8 * parallelism`).
    pub fn new(params: HashingParams) -> Result<Self, CredentialHashError> {
        let params = Params::new(
            params.memory_kib,
            params.iterations,
            params.parallelism,
            None,
        )
        .map_err(|err| CredentialHashError::backend(err.to_string()))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl CredentialHasher for Argon2CredentialHasher {
    fn hash(&self, plaintext: &str) -> Result<PasswordDigest, CredentialHashError> {
        if plaintext.is_empty() {
            return Err(CredentialHashError::empty_plaintext());
        }

        let mut salt_bytes = [0_u8; SALT_LEN];
        OsRng.fill_bytes(&mut salt_bytes);
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|err| CredentialHashError::backend(err.to_string()))?;

        let digest = self
            .argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|err| CredentialHashError::backend(err.to_string()))?;
        Ok(PasswordDigest::new(digest.to_string()))
    }

    fn verify(&self, plaintext: &str, digest: &PasswordDigest) -> bool {
        PasswordHash::new(digest.as_str()).is_ok_and(|parsed| {
            self.argon2
                .verify_password(plaintext.as_bytes(), &parsed)
                .is_ok()
        })
    }
}
