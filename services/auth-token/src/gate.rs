//! Bearer-token access gate for protected routes.
//!
//! Public prefixes pass through untouched. Everything else needs an
//! `Authorization: Bearer <token>` header carrying a valid, unexpired access
//! token. Refresh tokens are not accepted as credentials.

use crate::service::TokenService;
use std::sync::Arc;
use tracing::{debug, warn};

/// Path prefixes that skip authentication.
pub const PUBLIC_PATH_PREFIXES: &[&str] = &[
    "/api/auth/",
    "/oauth2/",
    "/actuator/",
    "/api/ml/",
    "/api/titanic/",
    "/openapi.json",
    "/docs",
    "/redoc",
    "/nlp/",
    "/samsung/",
    "/us_map/",
    "/seoul_map/",
    "/swagger-ui/",
    "/v3/api-docs/",
];

const BEARER_PREFIX: &str = "Bearer ";

/// Why a request was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnauthorizedReason {
    /// No bearer credential was presented.
    MissingToken,
    /// The credential did not verify, expired, or is not an access token.
    InvalidToken,
}

/// Result of checking one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// Path does not require authentication.
    Public,
    /// Valid access token for this subject.
    Authenticated {
        /// Subject id from the token
        user_id: i64,
    },
    /// Reject with 401.
    Unauthorized(UnauthorizedReason),
}

impl AccessDecision {
    /// Whether the request may proceed.
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        !matches!(self, Self::Unauthorized(_))
    }
}

/// Whether `path` is served without authentication.
#[must_use]
pub fn is_public_path(path: &str) -> bool {
    PUBLIC_PATH_PREFIXES
        .iter()
        .any(|prefix| path.starts_with(prefix))
}

/// Token part of an `Authorization: Bearer` header value.
#[must_use]
pub fn extract_bearer(header: &str) -> Option<&str> {
    header
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Checks requests against the token service.
#[derive(Debug, Clone)]
pub struct AccessGate {
    tokens: Arc<TokenService>,
}

impl AccessGate {
    /// Create a gate backed by the shared token service.
    #[must_use]
    pub const fn new(tokens: Arc<TokenService>) -> Self {
        Self { tokens }
    }

    /// Decide whether a request for `path` with the given `Authorization`
    /// header value may proceed.
    #[must_use]
    pub fn check(&self, path: &str, authorization: Option<&str>) -> AccessDecision {
        if is_public_path(path) {
            return AccessDecision::Public;
        }

        let Some(token) = authorization.and_then(extract_bearer) else {
            warn!(path, "Missing bearer token");
            return AccessDecision::Unauthorized(UnauthorizedReason::MissingToken);
        };

        match self.tokens.claims(token) {
            Ok(claims) if claims.is_access() => {
                debug!(path, user_id = claims.user_id(), "Authenticated request");
                AccessDecision::Authenticated {
                    user_id: claims.user_id(),
                }
            }
            Ok(_) => {
                warn!(path, "Refresh token presented as access credential");
                AccessDecision::Unauthorized(UnauthorizedReason::InvalidToken)
            }
            Err(e) => {
                warn!(path, reason = e.code(), "Rejected bearer token");
                AccessDecision::Unauthorized(UnauthorizedReason::InvalidToken)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JwtConfig;

    fn gate() -> (AccessGate, Arc<TokenService>) {
        let tokens = Arc::new(TokenService::new(&JwtConfig::new(
            "gate-test-secret-key-that-is-long-enough",
        )));
        (AccessGate::new(Arc::clone(&tokens)), tokens)
    }

    #[test]
    fn test_public_paths() {
        assert!(is_public_path("/api/auth/kakao/callback"));
        assert!(is_public_path("/docs"));
        assert!(is_public_path("/swagger-ui/index.html"));
        assert!(!is_public_path("/api/users/me"));
        assert!(!is_public_path("/"));
    }

    #[test]
    fn test_extract_bearer() {
        assert_eq!(extract_bearer("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(extract_bearer("Bearer   "), None);
        assert_eq!(extract_bearer("Basic dXNlcjpwYXNz"), None);
        assert_eq!(extract_bearer("bearer abc"), None);
    }

    #[test]
    fn test_public_path_needs_no_token() {
        let (gate, _) = gate();
        assert_eq!(gate.check("/oauth2/google", None), AccessDecision::Public);
    }

    #[test]
    fn test_missing_token_rejected() {
        let (gate, _) = gate();
        assert_eq!(
            gate.check("/api/users/me", None),
            AccessDecision::Unauthorized(UnauthorizedReason::MissingToken)
        );
        assert_eq!(
            gate.check("/api/users/me", Some("Token abc")),
            AccessDecision::Unauthorized(UnauthorizedReason::MissingToken)
        );
    }

    #[test]
    fn test_valid_access_token_admitted() {
        let (gate, tokens) = gate();
        let token = tokens.issue_access_token(42, None, None).unwrap();
        let header = format!("Bearer {token}");

        let decision = gate.check("/api/users/me", Some(&header));
        assert_eq!(decision, AccessDecision::Authenticated { user_id: 42 });
        assert!(decision.is_allowed());
    }

    #[test]
    fn test_refresh_token_rejected() {
        let (gate, tokens) = gate();
        let token = tokens.issue_refresh_token(42).unwrap();
        let header = format!("Bearer {token}");

        assert_eq!(
            gate.check("/api/users/me", Some(&header)),
            AccessDecision::Unauthorized(UnauthorizedReason::InvalidToken)
        );
    }

    #[test]
    fn test_invalid_token_rejected() {
        let (gate, _) = gate();
        let decision = gate.check("/api/users/me", Some("Bearer not.a.token"));
        assert_eq!(
            decision,
            AccessDecision::Unauthorized(UnauthorizedReason::InvalidToken)
        );
        assert!(!decision.is_allowed());
    }
}
