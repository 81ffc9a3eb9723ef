//! Application settings loaded via OrthoConfig.
//!
//! Values come from `REVIEWHUB_*` environment variables, configuration files
//! and command-line flags, in OrthoConfig's usual precedence. The token
//! signing secret is deliberately not a setting; see
//! [`token_secret_from_env`](crate::outbound::security::token_secret_from_env).

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::outbound::security::HashingParams;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// No database URL was configured.
    #[error("REVIEWHUB_DATABASE_URL must be set")]
    MissingDatabaseUrl,
    /// The bind address did not parse.
    #[error("invalid bind address {value:?}: {message}")]
    InvalidBindAddr { value: String, message: String },
}

/// Runtime configuration for the review service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "REVIEWHUB")]
pub struct AppSettings {
    /// PostgreSQL connection URL.
    pub database_url: Option<String>,
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// Maximum pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Token lifetime in seconds. Tokens never expire when unset.
    pub token_ttl_seconds: Option<u64>,
    /// Seed demo users, items, a review and a comment into an empty catalogue.
    #[ortho_config(default = false)]
    pub seed_demo_data: bool,
    /// Argon2 memory cost in KiB.
    pub hash_memory_kib: Option<u32>,
    /// Argon2 pass count.
    pub hash_iterations: Option<u32>,
    /// Argon2 parallelism.
    pub hash_parallelism: Option<u32>,
}

impl AppSettings {
    /// Configured database URL.
    pub fn database_url(&self) -> Result<&str, SettingsError> {
        self.database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(SettingsError::MissingDatabaseUrl)
    }

    /// Address to bind, defaulting to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value
            .parse()
            .map_err(|err: std::net::AddrParseError| SettingsError::InvalidBindAddr {
                value: value.to_owned(),
                message: err.to_string(),
            })
    }

    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }

    /// Token lifetime; `None` means tokens are valid until the secret rotates.
    pub fn token_ttl(&self) -> Option<Duration> {
        self.token_ttl_seconds.map(Duration::from_secs)
    }

    /// Argon2 parameters, with unset fields taken from the defaults.
    pub fn hashing_params(&self) -> HashingParams {
        let defaults = HashingParams::default();
        HashingParams {
            memory_kib: self.hash_memory_kib.unwrap_or(defaults.memory_kib),
            iterations: self.hash_iterations.unwrap_or(defaults.iterations),
            parallelism: self.hash_parallelism.unwrap_or(defaults.parallelism),
        }
    }
}
