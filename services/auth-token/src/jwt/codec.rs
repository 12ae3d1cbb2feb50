//! HS256 compact token encoding and verification.

use crate::error::TokenError;
use crate::jwt::claims::Claims;
use crate::key::SigningKey;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, Header, Validation};
use std::time::Duration;

/// Compact JWS codec pinned to HS256.
///
/// Expiry is checked here rather than by `jsonwebtoken` so the boundary is
/// `now >= exp` with no leeway.
#[derive(Debug, Clone)]
pub struct TokenCodec {
    header: Header,
    validation: Validation,
}

impl TokenCodec {
    /// The only accepted signing algorithm.
    pub const ALGORITHM: Algorithm = Algorithm::HS256;

    /// Create a codec with HS256 header and validation rules.
    #[must_use]
    pub fn new() -> Self {
        let mut validation = Validation::new(Self::ALGORITHM);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        TokenCodec {
            header: Header::new(Self::ALGORITHM),
            validation,
        }
    }

    /// Stamp `iat`/`exp` from the current time and sign.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Encoding`] if signing fails.
    pub fn encode(&self, claims: Claims, ttl: Duration, key: &SigningKey) -> Result<String, TokenError> {
        self.encode_at(claims, ttl, key, Utc::now())
    }

    /// Stamp `iat`/`exp` from `now` and sign.
    ///
    /// `exp` is truncated to whole seconds, so a TTL under one second may
    /// yield `exp == iat` and a token that is already expired.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Encoding`] if signing fails.
    pub fn encode_at(
        &self,
        mut claims: Claims,
        ttl: Duration,
        key: &SigningKey,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let now_ms = now.timestamp_millis();
        let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);

        claims.iat = now_ms.div_euclid(1000);
        claims.exp = now_ms.saturating_add(ttl_ms).div_euclid(1000);

        encode(&self.header, &claims, key.encoding_key())
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    /// Verify signature and expiry against the current time.
    ///
    /// # Errors
    ///
    /// Returns the verification failure as a [`TokenError`].
    pub fn decode_verified(&self, token: &str, key: &SigningKey) -> Result<Claims, TokenError> {
        self.decode_verified_at(token, key, Utc::now())
    }

    /// Verify signature and expiry against `now`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidSignature`], [`TokenError::MalformedToken`]
    /// or [`TokenError::Expired`].
    pub fn decode_verified_at(
        &self,
        token: &str,
        key: &SigningKey,
        now: DateTime<Utc>,
    ) -> Result<Claims, TokenError> {
        let token_data = decode::<Claims>(token, key.decoding_key(), &self.validation)?;
        let claims = token_data.claims;

        if claims.is_expired_at(now.timestamp()) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }

    /// Decode the payload without checking signature or expiry.
    ///
    /// For display and diagnostics only; never base an authorization
    /// decision on the result.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::MalformedToken`] if the payload cannot be read.
    pub fn decode_unverified(&self, token: &str) -> Result<Claims, TokenError> {
        let parts: Vec<&str> = token.split('.').collect();
        if parts.len() != 3 {
            return Err(TokenError::malformed("Invalid token format"));
        }

        let payload = URL_SAFE_NO_PAD
            .decode(parts[1])
            .map_err(|e| TokenError::malformed(e.to_string()))?;

        serde_json::from_slice(&payload).map_err(|e| TokenError::malformed(e.to_string()))
    }
}

impl Default for TokenCodec {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::builder::{build_access_claims, build_refresh_claims};
    use chrono::TimeZone;

    fn test_key() -> SigningKey {
        SigningKey::derive("test-secret-key-for-testing-only-32bytes")
    }

    fn at(secs: i64, millis: u32) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, millis * 1_000_000).single().unwrap()
    }

    #[test]
    fn test_round_trip_hs256() {
        let codec = TokenCodec::new();
        let key = test_key();
        let claims = build_access_claims(42, Some("a@b.com"), None);

        let token = codec.encode(claims.clone(), Duration::from_secs(3600), &key).unwrap();
        let decoded = codec.decode_verified(&token, &key).unwrap();

        assert_eq!(decoded.sub, claims.sub);
        assert_eq!(decoded.user_id, 42);
        assert_eq!(decoded.email, claims.email);
        assert_eq!(decoded.exp - decoded.iat, 3600);
    }

    #[test]
    fn test_timestamps_in_seconds() {
        let codec = TokenCodec::new();
        let key = test_key();
        let now = at(1_700_000_000, 900);

        let token = codec
            .encode_at(build_refresh_claims(1), Duration::from_millis(1500), &key, now)
            .unwrap();
        let claims = codec.decode_unverified(&token).unwrap();

        assert_eq!(claims.iat, 1_700_000_000);
        assert_eq!(claims.exp, 1_700_000_002);
    }

    #[test]
    fn test_expiry_checked_against_clock() {
        let codec = TokenCodec::new();
        let key = test_key();
        let issued = at(1_700_000_000, 0);

        let token = codec
            .encode_at(build_access_claims(1, None, None), Duration::from_secs(60), &key, issued)
            .unwrap();

        assert!(codec.decode_verified_at(&token, &key, at(1_700_000_059, 999)).is_ok());
        assert_eq!(
            codec.decode_verified_at(&token, &key, at(1_700_000_060, 0)),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_zero_ttl_is_expired_immediately() {
        let codec = TokenCodec::new();
        let key = test_key();

        let token = codec.encode(build_access_claims(1, None, None), Duration::ZERO, &key).unwrap();

        assert_eq!(codec.decode_verified(&token, &key), Err(TokenError::Expired));
    }

    #[test]
    fn test_sub_second_ttl_truncates_to_issue_second() {
        let codec = TokenCodec::new();
        let key = test_key();
        let now = at(1_700_000_000, 100);

        let short = codec
            .encode_at(build_access_claims(1, None, None), Duration::from_millis(500), &key, now)
            .unwrap();
        let claims = codec.decode_unverified(&short).unwrap();
        assert_eq!(claims.exp, claims.iat);
        assert_eq!(codec.decode_verified_at(&short, &key, now), Err(TokenError::Expired));

        let one_second = codec
            .encode_at(build_access_claims(1, None, None), Duration::from_secs(1), &key, now)
            .unwrap();
        assert!(codec.decode_verified_at(&one_second, &key, now).is_ok());
    }

    #[test]
    fn test_wrong_key_is_invalid_signature() {
        let codec = TokenCodec::new();
        let token = codec
            .encode(build_refresh_claims(9), Duration::from_secs(60), &test_key())
            .unwrap();
        let other = SigningKey::derive("another-secret-key-for-testing-only-32b");

        assert_eq!(codec.decode_verified(&token, &other), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_garbage_is_malformed() {
        let codec = TokenCodec::new();
        let key = test_key();

        assert!(matches!(
            codec.decode_verified("not.a.token", &key),
            Err(TokenError::MalformedToken(_))
        ));
        assert!(matches!(
            codec.decode_unverified("only-one-part"),
            Err(TokenError::MalformedToken(_))
        ));
    }

    #[test]
    fn test_unverified_ignores_signature_and_expiry() {
        let codec = TokenCodec::new();
        let token = codec
            .encode(build_refresh_claims(3), Duration::ZERO, &test_key())
            .unwrap();

        let claims = codec.decode_unverified(&token).unwrap();
        assert_eq!(claims.user_id, 3);
        assert!(claims.is_refresh());
    }

    #[test]
    fn test_header_is_hs256_jwt() {
        let codec = TokenCodec::new();
        let token = codec
            .encode(build_refresh_claims(3), Duration::from_secs(1), &test_key())
            .unwrap();

        let header = jsonwebtoken::decode_header(&token).unwrap();
        assert_eq!(header.alg, Algorithm::HS256);
        assert_eq!(header.typ.as_deref(), Some("JWT"));
    }
}
