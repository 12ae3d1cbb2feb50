//! Token claim set and token category.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Token category carried in the `type` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Short-lived token presented on API calls.
    Access,
    /// Long-lived token exchanged for a new pair.
    Refresh,
}

impl TokenType {
    /// Wire value of the `type` claim.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Refresh => "refresh",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Claim set embedded in every issued token.
///
/// Access tokens always carry `email` and `nickname` (possibly `null`);
/// refresh tokens never carry them. `iat`/`exp` are NumericDate seconds and
/// are stamped by the codec at encode time.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Claims {
    /// Subject: decimal string of the user id
    pub sub: String,
    /// Numeric user id
    #[serde(rename = "userId")]
    pub user_id: i64,
    /// User email (access tokens only)
    #[serde(default)]
    pub email: Option<String>,
    /// User nickname (access tokens only)
    #[serde(default)]
    pub nickname: Option<String>,
    /// Access or refresh
    #[serde(rename = "type")]
    pub token_type: TokenType,
    /// Issued at (seconds)
    pub iat: i64,
    /// Expiration (seconds)
    pub exp: i64,
}

impl Claims {
    pub(crate) fn new(user_id: i64, token_type: TokenType) -> Self {
        Claims {
            sub: user_id.to_string(),
            user_id,
            email: None,
            nickname: None,
            token_type,
            iat: 0,
            exp: 0,
        }
    }

    /// The user id this token was issued for.
    #[must_use]
    pub const fn user_id(&self) -> i64 {
        self.user_id
    }

    /// Token category.
    #[must_use]
    pub const fn token_type(&self) -> TokenType {
        self.token_type
    }

    /// Check if this is an access token.
    #[must_use]
    pub fn is_access(&self) -> bool {
        self.token_type == TokenType::Access
    }

    /// Check if this is a refresh token.
    #[must_use]
    pub fn is_refresh(&self) -> bool {
        self.token_type == TokenType::Refresh
    }

    /// A token is expired from the second its `exp` is reached.
    #[must_use]
    pub const fn is_expired_at(&self, timestamp: i64) -> bool {
        timestamp >= self.exp
    }

    /// Check expiry against the current time.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(chrono::Utc::now().timestamp())
    }
}

impl Serialize for Claims {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let profile = self.token_type == TokenType::Access;
        let mut map = serializer.serialize_map(Some(if profile { 7 } else { 5 }))?;
        map.serialize_entry("sub", &self.sub)?;
        map.serialize_entry("userId", &self.user_id)?;
        if profile {
            map.serialize_entry("email", &self.email)?;
            map.serialize_entry("nickname", &self.nickname)?;
        }
        map.serialize_entry("type", &self.token_type)?;
        map.serialize_entry("iat", &self.iat)?;
        map.serialize_entry("exp", &self.exp)?;
        map.end()
    }
}
