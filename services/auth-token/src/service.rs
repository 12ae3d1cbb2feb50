//! Token service facade.
//!
//! The only entry point login handlers call. Holds the derived signing key
//! and the two TTLs, fixed at construction; every operation is a pure
//! function of its input plus that immutable state, so one instance can be
//! shared across threads without locking.
//!
//! Verification failures are collapsed: `validate` returns `false` and
//! `extract_subject` returns `None` without telling the caller whether the
//! token was tampered with, malformed, or merely expired.

use crate::config::JwtConfig;
use crate::error::TokenError;
use crate::jwt::{build_access_claims, build_refresh_claims, Claims, TokenCodec, TokenType};
use crate::key::{KeySource, SigningKey};
use crate::metrics;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Access and refresh token issued together at login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Signed access token
    pub access_token: String,
    /// Signed refresh token
    pub refresh_token: String,
    /// Always `Bearer`
    pub token_type: String,
    /// Seconds until the access token expires
    pub expires_in: u64,
}

/// Issues and validates signed tokens.
#[derive(Debug, Clone)]
pub struct TokenService {
    key: SigningKey,
    codec: TokenCodec,
    access_token_ttl: Duration,
    refresh_token_ttl: Duration,
}

impl TokenService {
    /// Build the service from configuration, deriving the signing key once.
    #[must_use]
    pub fn new(config: &JwtConfig) -> Self {
        let key = SigningKey::derive(config.secret.expose_secret());
        Self::with_key(key, config.access_token_ttl, config.refresh_token_ttl)
    }

    /// Build the service around an already derived key.
    #[must_use]
    pub fn with_key(key: SigningKey, access_token_ttl: Duration, refresh_token_ttl: Duration) -> Self {
        info!(
            key_source = key.source().as_str(),
            key_len = key.len(),
            access_ttl_ms = access_token_ttl.as_millis() as u64,
            refresh_ttl_ms = refresh_token_ttl.as_millis() as u64,
            "Token service initialized"
        );

        Self {
            key,
            codec: TokenCodec::new(),
            access_token_ttl,
            refresh_token_ttl,
        }
    }

    /// Issue an access token carrying the subject and profile fields.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Encoding`] only if claim serialization fails.
    pub fn issue_access_token(
        &self,
        user_id: i64,
        email: Option<&str>,
        nickname: Option<&str>,
    ) -> Result<String, TokenError> {
        let claims = build_access_claims(user_id, email, nickname);
        self.issue(claims, self.access_token_ttl)
    }

    /// Issue a refresh token carrying only the subject.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Encoding`] only if claim serialization fails.
    pub fn issue_refresh_token(&self, user_id: i64) -> Result<String, TokenError> {
        let claims = build_refresh_claims(user_id);
        self.issue(claims, self.refresh_token_ttl)
    }

    /// Issue the access/refresh pair returned by a successful login.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Encoding`] only if claim serialization fails.
    pub fn issue_token_pair(
        &self,
        user_id: i64,
        email: Option<&str>,
        nickname: Option<&str>,
    ) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            access_token: self.issue_access_token(user_id, email, nickname)?,
            refresh_token: self.issue_refresh_token(user_id)?,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_ttl.as_secs(),
        })
    }

    /// `true` iff the token verifies and has not expired.
    #[must_use]
    pub fn validate(&self, token: &str) -> bool {
        self.verify(token).is_ok()
    }

    /// Subject id of a valid, unexpired token; `None` on any failure.
    #[must_use]
    pub fn extract_subject(&self, token: &str) -> Option<i64> {
        self.verify(token).ok().map(|claims| claims.user_id())
    }

    /// Verified claims with the failure reason preserved.
    ///
    /// Meant for diagnostics inside the service boundary; do not forward the
    /// error detail to clients.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidSignature`], [`TokenError::MalformedToken`]
    /// or [`TokenError::Expired`].
    pub fn claims(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify(token)
    }

    /// Claims decoded without verification, for display only.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::MalformedToken`] if the payload cannot be decoded.
    pub fn peek_claims(&self, token: &str) -> Result<Claims, TokenError> {
        self.codec.decode_unverified(token)
    }

    /// Source of the signing key in use.
    #[must_use]
    pub const fn key_source(&self) -> KeySource {
        self.key.source()
    }

    /// Configured access token TTL.
    #[must_use]
    pub const fn access_token_ttl(&self) -> Duration {
        self.access_token_ttl
    }

    /// Configured refresh token TTL.
    #[must_use]
    pub const fn refresh_token_ttl(&self) -> Duration {
        self.refresh_token_ttl
    }

    fn issue(&self, claims: Claims, ttl: Duration) -> Result<String, TokenError> {
        let token_type: TokenType = claims.token_type();
        let user_id = claims.user_id();
        let token = self.codec.encode(claims, ttl, &self.key)?;

        metrics::record_token_issued(token_type.as_str());
        debug!(user_id, token_type = %token_type, "Issued token");

        Ok(token)
    }

    fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        match self.codec.decode_verified(token, &self.key) {
            Ok(claims) => {
                metrics::record_validation("valid");
                Ok(claims)
            }
            Err(e) => {
                metrics::record_validation(e.code());
                debug!(reason = e.code(), "Token rejected");
                Err(e)
            }
        }
    }
}
