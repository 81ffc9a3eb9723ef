//! Token signing secret loading and validation.
//!
//! The secret is read once at start-up from the file named by
//! `REVIEWHUB_TOKEN_SECRET_FILE` (default `/var/run/secrets/token_secret`).
//! Release builds insist on a readable secret of at least
//! [`TOKEN_SECRET_MIN_LEN`] bytes. Debug builds accept shorter secrets and
//! fall back to a random per-process secret when the file is missing, which
//! invalidates every token on restart.

use std::fmt;
use std::path::PathBuf;

use mockable::Env;
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};
use tracing::warn;
use zeroize::Zeroizing;

/// Minimum secret length accepted by release builds.
pub const TOKEN_SECRET_MIN_LEN: usize = 32;

const TOKEN_SECRET_DEFAULT_PATH: &str = "/var/run/secrets/token_secret";
const SECRET_FILE_ENV: &str = "REVIEWHUB_TOKEN_SECRET_FILE";
const ALLOW_EPHEMERAL_ENV: &str = "REVIEWHUB_TOKEN_ALLOW_EPHEMERAL";
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const EPHEMERAL_LEN: usize = 64;
const FINGERPRINT_BYTES: usize = 8;

/// Build mode used to pick between strict and lenient secret handling.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Tolerate missing or short secrets with a warning.
    Debug,
    /// Require a readable secret of adequate length.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reviewhub::outbound::security::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// assert_eq!(mode == BuildMode::Debug, cfg!(debug_assertions));
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// HMAC signing secret. Wiped from memory on drop; never printed.
#[derive(Clone)]
pub struct TokenSecret {
    bytes: Zeroizing<Vec<u8>>,
    ephemeral: bool,
}

impl TokenSecret {
    /// Wrap secret material loaded by the caller.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Zeroizing::new(bytes),
            ephemeral: false,
        }
    }

    /// Generate a random secret that lives only as long as the process.
    pub fn ephemeral() -> Self {
        let mut bytes = Zeroizing::new(vec![0_u8; EPHEMERAL_LEN]);
        OsRng.fill_bytes(bytes.as_mut_slice());
        Self {
            bytes,
            ephemeral: true,
        }
    }

    /// Raw secret bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.bytes.as_slice()
    }

    /// Whether the secret was generated for this process only.
    pub fn is_ephemeral(&self) -> bool {
        self.ephemeral
    }

    /// Truncated SHA-256 fingerprint for logs and rotation runbooks.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reviewhub::outbound::security::TokenSecret;
    ///
    /// let fp = TokenSecret::from_bytes(vec![b'a'; 32]).fingerprint();
    /// assert_eq!(fp.len(), 16);
    /// assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
    /// ```
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.as_bytes());
        hex::encode(digest.get(..FINGERPRINT_BYTES).unwrap_or_default())
    }
}

impl fmt::Debug for TokenSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSecret")
            .field("fingerprint", &self.fingerprint())
            .field("ephemeral", &self.ephemeral)
            .finish()
    }
}

/// Errors raised while loading the token secret.
#[derive(thiserror::Error, Debug)]
pub enum TokenSecretError {
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// Reading the secret file failed.
    #[error("failed to read token secret at {path}: {source}")]
    SecretRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The secret file is too short for release builds.
    #[error("token secret at {path} too short: need >= {min_len} bytes, got {length}")]
    SecretTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    /// Release builds must not sign with a per-process secret.
    #[error("REVIEWHUB_TOKEN_ALLOW_EPHEMERAL must be 0 in release builds")]
    EphemeralNotAllowed,
}

/// Load the token secret according to environment variables and build mode.
///
/// # Examples
///
/// ```rust
/// use mockable::MockEnv;
/// use reviewhub::outbound::security::{BuildMode, token_secret_from_env};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let path = std::env::temp_dir().join("reviewhub_token_secret_example");
/// std::fs::write(&path, vec![b'k'; 32])?;
///
/// let path_value = path.to_string_lossy().into_owned();
/// let mut env = MockEnv::new();
/// env.expect_string().returning(move |name| match name {
///     "REVIEWHUB_TOKEN_SECRET_FILE" => Some(path_value.clone()),
///     _ => None,
/// });
///
/// let secret = token_secret_from_env(&env, BuildMode::Release)?;
/// assert!(!secret.is_ephemeral());
///
/// std::fs::remove_file(&path)?;
/// # Ok(())
/// # }
/// ```
pub fn token_secret_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<TokenSecret, TokenSecretError> {
    let allow_ephemeral = allow_ephemeral_from_env(env, mode)?;
    let path = PathBuf::from(
        env.string(SECRET_FILE_ENV)
            .unwrap_or_else(|| TOKEN_SECRET_DEFAULT_PATH.to_owned()),
    );

    match std::fs::read(&path).map(Zeroizing::new) {
        Ok(bytes) if !bytes.is_empty() => {
            let length = bytes.len();
            if length < TOKEN_SECRET_MIN_LEN {
                if !mode.is_debug() {
                    return Err(TokenSecretError::SecretTooShort {
                        path,
                        length,
                        min_len: TOKEN_SECRET_MIN_LEN,
                    });
                }
                warn!(
                    path = %path.display(),
                    length,
                    "token secret shorter than recommended (dev only)"
                );
            }
            Ok(TokenSecret {
                bytes,
                ephemeral: false,
            })
        }
        result => {
            let source = match result {
                Err(error) => error,
                Ok(_) => std::io::Error::new(std::io::ErrorKind::InvalidData, "secret file is empty"),
            };
            if mode.is_debug() || allow_ephemeral {
                warn!(
                    path = %path.display(),
                    error = %source,
                    "using temporary token secret (dev only)"
                );
                Ok(TokenSecret::ephemeral())
            } else {
                Err(TokenSecretError::SecretRead { path, source })
            }
        }
    }
}

fn allow_ephemeral_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<bool, TokenSecretError> {
    let Some(value) = env.string(ALLOW_EPHEMERAL_ENV) else {
        return Ok(false);
    };
    match parse_bool(&value) {
        Some(true) if mode.is_debug() => Ok(true),
        Some(true) => Err(TokenSecretError::EphemeralNotAllowed),
        Some(false) => Ok(false),
        None if mode.is_debug() => {
            warn!(value = %value, "invalid {ALLOW_EPHEMERAL_ENV}; defaulting to disabled");
            Ok(false)
        }
        None => Err(TokenSecretError::InvalidEnv {
            name: ALLOW_EPHEMERAL_ENV,
            value,
            expected: BOOL_EXPECTED,
        }),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}
