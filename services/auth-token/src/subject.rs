//! Numeric subject ids for OAuth provider accounts.
//!
//! Providers identify accounts with strings. Kakao and Naver ids are usually
//! numeric, Google ids are decimal strings too long for `i64`. Ids that parse
//! as a non-negative `i64` are used as-is; anything else is hashed with
//! SHA-256 and reduced into `[0, 10^10)` so the same account maps to the
//! same subject in every process.

use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Upper bound (exclusive) for hashed subject ids.
pub const HASHED_SUBJECT_BOUND: u64 = 10_000_000_000;

/// OAuth login provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    /// Kakao
    Kakao,
    /// Google
    Google,
    /// Naver
    Naver,
}

impl Provider {
    /// Lowercase provider name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Kakao => "kakao",
            Self::Google => "google",
            Self::Naver => "naver",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "kakao" => Ok(Self::Kakao),
            "google" => Ok(Self::Google),
            "naver" => Ok(Self::Naver),
            other => Err(format!("unknown provider '{other}'")),
        }
    }
}

/// Map a provider account id onto a stable numeric subject id.
#[must_use]
pub fn subject_id_from_provider(provider_id: &str) -> i64 {
    let trimmed = provider_id.trim();
    match trimmed.parse::<i64>() {
        Ok(id) if id >= 0 => id,
        _ => hashed_subject_id(trimmed),
    }
}

fn hashed_subject_id(input: &str) -> i64 {
    let digest = Sha256::digest(input.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    let reduced = u64::from_be_bytes(prefix) % HASHED_SUBJECT_BOUND;
    // reduced < 10^10, always fits
    i64::try_from(reduced).unwrap_or_default()
}
