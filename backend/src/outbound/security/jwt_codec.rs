//! HS256 JSON Web Token implementation of the `TokenCodec` port.
//!
//! Claims are `{ sub, iat, exp? }`. `exp` is only written when a lifetime is
//! configured; without one tokens stay valid until the signing secret
//! changes. Expiry is checked against the injected clock with zero leeway,
//! so verification depends only on the token, the secret and "now".

use std::sync::Arc;
use std::time::Duration;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{TokenCodec, TokenError};
use crate::domain::{BearerToken, UserId};

use super::TokenSecret;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: Uuid,
    iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    exp: Option<i64>,
}

/// Bearer token codec signing with a shared HMAC secret.
pub struct JwtTokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Option<Duration>,
    clock: Arc<dyn Clock>,
}

impl JwtTokenCodec {
    /// Build a codec from a loaded secret.
    ///
    /// `ttl` of `None` issues tokens without an `exp` claim.
    pub fn new(secret: &TokenSecret, ttl: Option<Duration>, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is optional and checked against `clock` below.
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
            clock,
        }
    }

    fn now(&self) -> i64 {
        self.clock.utc().timestamp()
    }
}

impl TokenCodec for JwtTokenCodec {
    fn issue(&self, user_id: &UserId) -> Result<BearerToken, TokenError> {
        let iat = self.now();
        let exp = self
            .ttl
            .map(|ttl| iat.saturating_add(i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX)));
        let claims = Claims {
            sub: *user_id.as_uuid(),
            iat,
            exp,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map(BearerToken::new)
            .map_err(|err| TokenError::signing(err.to_string()))
    }

    fn verify(&self, token: &str) -> Result<UserId, TokenError> {
        if token.is_empty() {
            return Err(TokenError::invalid());
        }

        let claims = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|err| {
                debug!(kind = ?err.kind(), "token failed validation");
                TokenError::invalid()
            })?
            .claims;

        if claims.exp.is_some_and(|exp| exp <= self.now()) {
            return Err(TokenError::expired());
        }

        Ok(UserId::from_uuid(claims.sub))
    }
}
