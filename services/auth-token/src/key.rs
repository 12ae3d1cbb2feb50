//! Signing key derivation.
//!
//! Turns the configured secret into HMAC-SHA256 key material of at least
//! [`MIN_KEY_LEN`] bytes. Derivation never fails: an empty secret falls back
//! to a development key and a short secret is padded by cyclic repetition.
//! Both cases are logged at warn level.

use crate::metrics;
use jsonwebtoken::{DecodingKey, EncodingKey};
use std::fmt;
use tracing::warn;
use zeroize::Zeroizing;

/// Minimum key length for HS256 (256 bits).
pub const MIN_KEY_LEN: usize = 32;

/// Secret substituted when none is configured. Development only.
pub const DEV_FALLBACK_SECRET: &str =
    "default-jwt-secret-key-for-development-only-change-in-production";

/// Where the key material came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    /// Configured secret used unchanged.
    Configured,
    /// Configured secret shorter than [`MIN_KEY_LEN`], repeated to fill it.
    Padded {
        /// Byte length of the configured secret
        original_len: usize,
    },
    /// No secret configured; [`DEV_FALLBACK_SECRET`] used.
    Fallback,
}

impl KeySource {
    /// Label for logs and metrics.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Configured => "configured",
            Self::Padded { .. } => "padded",
            Self::Fallback => "fallback",
        }
    }
}

/// Symmetric signing key shared by every token one service instance issues.
///
/// Immutable after derivation. The `bytes` copy is zeroized on drop; the
/// `jsonwebtoken` encoding and decoding keys hold their own copies that are not.
#[derive(Clone)]
pub struct SigningKey {
    bytes: Zeroizing<Vec<u8>>,
    encoding: EncodingKey,
    decoding: DecodingKey,
    source: KeySource,
}

impl SigningKey {
    /// Derive a signing key from a configured secret.
    #[must_use]
    pub fn derive(secret: &str) -> Self {
        let (secret, fallback) = if secret.trim().is_empty() {
            warn!("JWT secret is not configured, using development fallback key");
            (DEV_FALLBACK_SECRET, true)
        } else {
            (secret, false)
        };

        let encoded = secret.as_bytes();
        let (bytes, source) = if encoded.len() < MIN_KEY_LEN {
            warn!(
                original_len = encoded.len(),
                padded_len = MIN_KEY_LEN,
                "JWT secret is too short, padding by repetition"
            );
            (
                pad_cyclic(encoded, MIN_KEY_LEN),
                KeySource::Padded {
                    original_len: encoded.len(),
                },
            )
        } else if fallback {
            (encoded.to_vec(), KeySource::Fallback)
        } else {
            (encoded.to_vec(), KeySource::Configured)
        };

        metrics::record_key_derivation(source.as_str());
        Self::from_parts(bytes, source)
    }

    fn from_parts(bytes: Vec<u8>, source: KeySource) -> Self {
        let bytes = Zeroizing::new(bytes);
        Self {
            encoding: EncodingKey::from_secret(&bytes),
            decoding: DecodingKey::from_secret(&bytes),
            bytes,
            source,
        }
    }

    /// Raw key bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Key length in bytes; always at least [`MIN_KEY_LEN`].
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the key has no bytes. Never true for a derived key.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// How the key was obtained.
    #[must_use]
    pub const fn source(&self) -> KeySource {
        self.source
    }

    /// Key for signing.
    #[must_use]
    pub const fn encoding_key(&self) -> &EncodingKey {
        &self.encoding
    }

    /// Key for verification.
    #[must_use]
    pub const fn decoding_key(&self) -> &DecodingKey {
        &self.decoding
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("len", &self.bytes.len())
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

/// Fill `len` bytes with `input` repeated; `input` must be non-empty.
fn pad_cyclic(input: &[u8], len: usize) -> Vec<u8> {
    input.iter().copied().cycle().take(len).collect()
}
