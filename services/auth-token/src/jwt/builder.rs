//! Claim set construction for access and refresh tokens.

use crate::jwt::claims::{Claims, TokenType};

/// Claims for an access token. Missing profile fields are kept as `null`.
#[must_use]
pub fn build_access_claims(user_id: i64, email: Option<&str>, nickname: Option<&str>) -> Claims {
    let mut claims = Claims::new(user_id, TokenType::Access);
    claims.email = email.map(str::to_string);
    claims.nickname = nickname.map(str::to_string);
    claims
}

/// Claims for a refresh token: subject only, no profile data.
#[must_use]
pub fn build_refresh_claims(user_id: i64) -> Claims {
    Claims::new(user_id, TokenType::Refresh)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_access_claims() {
        let claims = build_access_claims(42, Some("a@b.com"), Some("Al"));

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.email.as_deref(), Some("a@b.com"));
        assert_eq!(claims.nickname.as_deref(), Some("Al"));
        assert!(claims.is_access());
    }

    #[test]
    fn test_build_access_claims_without_profile() {
        let claims = build_access_claims(-5, None, None);

        assert_eq!(claims.sub, "-5");
        assert_eq!(claims.email, None);
        assert_eq!(claims.nickname, None);
    }

    #[test]
    fn test_build_refresh_claims() {
        let claims = build_refresh_claims(7);

        assert_eq!(claims.sub, "7");
        assert!(claims.is_refresh());
        assert_eq!(claims.email, None);
        assert_eq!(claims.nickname, None);
    }
}
