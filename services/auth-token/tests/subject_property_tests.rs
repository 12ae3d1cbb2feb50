//! Property-based tests for provider id to subject id mapping.

use auth_token::subject::{subject_id_from_provider, HASHED_SUBJECT_BOUND};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Non-negative numeric ids map to themselves.
    #[test]
    fn prop_numeric_ids_pass_through(id in 0i64..=i64::MAX) {
        prop_assert_eq!(subject_id_from_provider(&id.to_string()), id);
    }

    /// Other ids land in [0, 10^10) and map the same way every time.
    #[test]
    fn prop_hashed_ids_bounded_and_stable(id in "[a-zA-Z_-][a-zA-Z0-9_-]{0,64}") {
        let first = subject_id_from_provider(&id);
        let second = subject_id_from_provider(&id);

        prop_assert!(first >= 0);
        prop_assert!(first < HASHED_SUBJECT_BOUND as i64);
        prop_assert_eq!(first, second);
    }
}
