// SPDX-License-Identifier: Apache-2.0

use fra_atlas_model::{generate_claim_id, state_prefix, validate_claim_id};
use proptest::prelude::*;

proptest! {
    #[test]
    fn generated_claim_ids_are_always_valid(state in ".{0,40}", millis in 0_u64..u64::MAX) {
        let id = generate_claim_id(&state, u128::from(millis));
        prop_assert!(validate_claim_id(&id).is_ok());
        let mut parts = id.splitn(3, '_');
        prop_assert_eq!(parts.next(), Some("FRA"));
        let prefix = parts.next().expect("prefix segment");
        prop_assert_eq!(prefix.len(), 2);
        prop_assert!(prefix.chars().all(|c| c.is_ascii_uppercase()));
        let digits = parts.next().expect("timestamp segment");
        prop_assert!(!digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn state_prefix_ignores_case_of_input(state in "[a-zA-Z]{2,20}") {
        prop_assert_eq!(state_prefix(&state), state_prefix(&state.to_ascii_uppercase()));
    }
}
