//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::time::Duration;

use reviewhub::outbound::persistence::DbPool;
use reviewhub::outbound::security::{HashingParams, TokenSecret};

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) token_secret: TokenSecret,
    pub(crate) token_ttl: Option<Duration>,
    pub(crate) hashing: HashingParams,
}

impl ServerConfig {
    /// Construct a server configuration with default hashing costs and
    /// non-expiring tokens.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, db_pool: DbPool, token_secret: TokenSecret) -> Self {
        Self {
            bind_addr,
            db_pool,
            token_secret,
            token_ttl: None,
            hashing: HashingParams::default(),
        }
    }

    /// Expire issued tokens after `ttl`.
    #[must_use]
    pub fn with_token_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.token_ttl = ttl;
        self
    }

    /// Override the Argon2 cost parameters for new digests.
    #[must_use]
    pub fn with_hashing(mut self, hashing: HashingParams) -> Self {
        self.hashing = hashing;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
