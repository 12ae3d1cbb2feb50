//! JWT claim construction and the HS256 compact codec.

pub mod builder;
pub mod claims;
pub mod codec;

pub use builder::{build_access_claims, build_refresh_claims};
pub use claims::{Claims, TokenType};
pub use codec::TokenCodec;
