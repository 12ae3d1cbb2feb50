//! Auth token service library.
//!
//! Derives the HMAC signing key, builds access/refresh claim sets, signs
//! and verifies compact JWTs, and exposes the [`TokenService`] facade used by
//! the OAuth login handlers.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod gate;
pub mod jwt;
pub mod key;
pub mod metrics;
pub mod observability;
pub mod service;
pub mod subject;

// Re-exports for convenience
pub use config::{Config, JwtConfig};
pub use error::TokenError;
pub use key::{KeySource, SigningKey};
pub use service::{TokenPair, TokenService};
