//! Prometheus metrics for the auth token service.

use once_cell::sync::Lazy;
use prometheus::{register_counter_vec, CounterVec};

/// Tokens issued counter.
pub static TOKENS_ISSUED: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "auth_token_tokens_issued_total",
        "Total number of tokens issued",
        &["token_type"]
    )
    .expect("Failed to register tokens_issued metric")
});

/// Token validations counter.
pub static VALIDATIONS: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "auth_token_validations_total",
        "Total number of token validations by outcome",
        &["outcome"]
    )
    .expect("Failed to register validations metric")
});

/// Signing key derivations counter.
pub static KEY_DERIVATIONS: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "auth_token_key_derivations_total",
        "Total number of signing key derivations by key source",
        &["source"]
    )
    .expect("Failed to register key_derivations metric")
});

/// Record a token issuance.
pub fn record_token_issued(token_type: &str) {
    TOKENS_ISSUED.with_label_values(&[token_type]).inc();
}

/// Record a validation outcome (`valid` or an error code).
pub fn record_validation(outcome: &str) {
    VALIDATIONS.with_label_values(&[outcome]).inc();
}

/// Record a signing key derivation.
pub fn record_key_derivation(source: &str) {
    KEY_DERIVATIONS.with_label_values(&[source]).inc();
}
