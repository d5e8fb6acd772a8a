//! Bearer token signing for calls to the statistics service.
//!
//! This module provides utilities for:
//! - Minting short-lived HS256 tokens from the configured secret
//! - Verifying tokens (diagnostics and tests)
//! - Formatting the `Authorization` header value

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::debug;

use crate::config::{Config, MIN_SECRET_LEN};
use crate::error::SigningError;
use crate::metrics;

/// Claims carried by every token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Always `true` for tokens minted here.
    pub authorized: bool,
    /// Identity of the calling service.
    pub user_id: String,
    /// Expiry as unix seconds.
    pub exp: i64,
}

/// Mints and verifies HS256 tokens.
#[derive(Clone)]
pub struct TokenSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    subject: String,
    ttl_seconds: u64,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("subject", &self.subject)
            .field("ttl_seconds", &self.ttl_seconds)
            .finish_non_exhaustive()
    }
}

impl TokenSigner {
    /// Create a signer from raw secret bytes.
    pub fn new(
        secret: &[u8],
        subject: impl Into<String>,
        ttl_seconds: u64,
    ) -> Result<Self, SigningError> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(SigningError::InvalidSecret(format!(
                "secret must be at least {} bytes, got {}",
                MIN_SECRET_LEN,
                secret.len()
            )));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            subject: subject.into(),
            ttl_seconds,
        })
    }

    /// Create a signer from application config.
    pub fn from_config(config: &Config) -> Result<Self, SigningError> {
        Self::new(
            config.jwt_secret.as_bytes(),
            config.jwt_subject.clone(),
            config.token_ttl_seconds,
        )
    }

    /// Build the claims for a token issued at `now`.
    pub fn claims_at(&self, now: OffsetDateTime) -> Result<TokenClaims, SigningError> {
        let out_of_range = || SigningError::ExpiryOutOfRange {
            ttl_seconds: self.ttl_seconds,
        };
        let ttl = i64::try_from(self.ttl_seconds).map_err(|_| out_of_range())?;
        let exp = now
            .checked_add(time::Duration::seconds(ttl))
            .ok_or_else(out_of_range)?;

        Ok(TokenClaims {
            authorized: true,
            user_id: self.subject.clone(),
            exp: exp.unix_timestamp(),
        })
    }

    /// Sign a fresh token valid for the configured lifetime.
    pub fn sign(&self) -> Result<String, SigningError> {
        let _timer = metrics::timer_signing();
        let claims = self.claims_at(OffsetDateTime::now_utc())?;
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(SigningError::Encode)?;
        debug!(exp = claims.exp, "Signed bearer token");
        Ok(token)
    }

    /// Decode a token and check its signature and expiry.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, SigningError> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(SigningError::Verify)
    }
}

/// Format a token as an `Authorization` header value.
pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}
