//! Error taxonomy for token issuance and validation.
//!
//! Verification failures (`InvalidSignature`, `MalformedToken`, `Expired`)
//! are kept distinct internally and collapse to `false`/`None` at the
//! [`TokenService`](crate::service::TokenService) boundary.

use jsonwebtoken::errors::ErrorKind;
use thiserror::Error;

/// Token service error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Signature does not match the signing key.
    #[error("Token signature invalid")]
    InvalidSignature,

    /// Token is not a well-formed compact JWT or its claims do not parse.
    #[error("Token malformed: {0}")]
    MalformedToken(String),

    /// Token `exp` has been reached.
    #[error("Token expired")]
    Expired,

    /// Claims could not be serialized or signed.
    #[error("JWT encoding error: {0}")]
    Encoding(String),

    /// Configuration value missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl TokenError {
    /// Create a malformed token error.
    #[must_use]
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedToken(msg.into())
    }

    /// Create a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether this error came from checking a presented token
    /// (as opposed to issuing one or loading configuration).
    #[must_use]
    pub const fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            Self::InvalidSignature | Self::MalformedToken(_) | Self::Expired
        )
    }

    /// Stable error code for logs and metrics labels.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidSignature => TOKEN_INVALID_SIGNATURE,
            Self::MalformedToken(_) => TOKEN_MALFORMED,
            Self::Expired => TOKEN_EXPIRED,
            Self::Encoding(_) => TOKEN_ENCODING_ERROR,
            Self::Config(_) => TOKEN_CONFIG_ERROR,
        }
    }
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature => Self::InvalidSignature,
            ErrorKind::ExpiredSignature => Self::Expired,
            _ => Self::MalformedToken(err.to_string()),
        }
    }
}

// Error codes for logs and metrics
pub const TOKEN_INVALID_SIGNATURE: &str = "TOKEN_INVALID_SIGNATURE";
pub const TOKEN_MALFORMED: &str = "TOKEN_MALFORMED";
pub const TOKEN_EXPIRED: &str = "TOKEN_EXPIRED";
pub const TOKEN_ENCODING_ERROR: &str = "TOKEN_ENCODING_ERROR";
pub const TOKEN_CONFIG_ERROR: &str = "TOKEN_CONFIG_ERROR";
