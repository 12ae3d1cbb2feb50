//! Centralized configuration for the auth token service.
//!
//! All configuration is loaded from environment variables (optionally via a
//! `.env` file) and validated at startup. TTLs are configured in
//! milliseconds to stay compatible with the existing deployment settings.

use crate::error::TokenError;
use crate::observability::{LogFormat, TracingConfig};
use secrecy::SecretString;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Smallest non-zero TTL accepted from the environment. `exp` is stamped in
/// whole seconds, so a shorter TTL would issue tokens that are already expired.
pub const MIN_TOKEN_TTL_MS: u64 = 1_000;

/// Default access token lifetime: one hour.
pub const DEFAULT_ACCESS_TOKEN_TTL_MS: u64 = 3_600_000;

/// Default refresh token lifetime: thirty days.
pub const DEFAULT_REFRESH_TOKEN_TTL_MS: u64 = 2_592_000_000;

/// JWT settings.
#[derive(Debug)]
pub struct JwtConfig {
    /// Raw signing secret. May be empty; key derivation substitutes a
    /// development fallback in that case.
    pub secret: SecretString,
    /// Access token TTL
    pub access_token_ttl: Duration,
    /// Refresh token TTL
    pub refresh_token_ttl: Duration,
}

impl JwtConfig {
    /// Create JWT settings with the given secret and default TTLs.
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: SecretString::from(secret.into()),
            access_token_ttl: Duration::from_millis(DEFAULT_ACCESS_TOKEN_TTL_MS),
            refresh_token_ttl: Duration::from_millis(DEFAULT_REFRESH_TOKEN_TTL_MS),
        }
    }

    /// Override the access token TTL.
    #[must_use]
    pub const fn with_access_token_ttl(mut self, ttl: Duration) -> Self {
        self.access_token_ttl = ttl;
        self
    }

    /// Override the refresh token TTL.
    #[must_use]
    pub const fn with_refresh_token_ttl(mut self, ttl: Duration) -> Self {
        self.refresh_token_ttl = ttl;
        self
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self::new(String::new())
    }
}

/// Service configuration.
#[derive(Debug)]
pub struct Config {
    /// Service name used in logs
    pub service_name: String,
    /// JWT settings
    pub jwt: JwtConfig,
    /// Tracing subscriber settings
    pub tracing: TracingConfig,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but cannot be parsed, or if
    /// a TTL is positive but below [`MIN_TOKEN_TTL_MS`].
    pub fn from_env() -> Result<Self, TokenError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but cannot be parsed, or if
    /// a TTL is positive but below [`MIN_TOKEN_TTL_MS`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, TokenError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let service_name =
            lookup("SERVICE_NAME").unwrap_or_else(|| "auth-token-service".to_string());

        let secret = lookup("JWT_SECRET").unwrap_or_default();
        let access_ms = parse_ttl(&lookup, "JWT_ACCESS_TOKEN_EXPIRATION", DEFAULT_ACCESS_TOKEN_TTL_MS)?;
        let refresh_ms =
            parse_ttl(&lookup, "JWT_REFRESH_TOKEN_EXPIRATION", DEFAULT_REFRESH_TOKEN_TTL_MS)?;

        let jwt = JwtConfig::new(secret)
            .with_access_token_ttl(Duration::from_millis(access_ms))
            .with_refresh_token_ttl(Duration::from_millis(refresh_ms));

        let log_level = lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string());
        let log_format: LogFormat = parse_var(&lookup, "LOG_FORMAT", LogFormat::Text)?;

        let tracing = TracingConfig::default()
            .with_service_name(service_name.clone())
            .with_log_level(log_level)
            .with_format(log_format);

        Ok(Self {
            service_name,
            jwt,
            tracing,
        })
    }
}

/// Parse a millisecond TTL. Zero is kept; sub-second values are rejected.
fn parse_ttl<F>(lookup: &F, name: &str, default: u64) -> Result<u64, TokenError>
where
    F: Fn(&str) -> Option<String>,
{
    let ttl_ms = parse_var(lookup, name, default)?;
    if ttl_ms != 0 && ttl_ms < MIN_TOKEN_TTL_MS {
        return Err(TokenError::config(format!(
            "Invalid {name}: {ttl_ms} ms is below the {MIN_TOKEN_TTL_MS} ms minimum"
        )));
    }
    Ok(ttl_ms)
}

/// Parse a variable with default value.
fn parse_var<F, T>(lookup: &F, name: &str, default: T) -> Result<T, TokenError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        Some(val) => val
            .trim()
            .parse()
            .map_err(|e| TokenError::config(format!("Invalid {name}: {e}"))),
        None => Ok(default),
    }
}
