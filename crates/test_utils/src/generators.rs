//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random test data
//! that maintains domain invariants.

use domain_claims::{ClaimType, NewClaim};
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Strategy for generating claim types
pub fn claim_type_strategy() -> impl Strategy<Value = ClaimType> {
    proptest::sample::select(ClaimType::ALL.to_vec())
}

/// Strategy for generating non-negative amounts with two decimal places
pub fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for generating customer names
pub fn customer_strategy() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{1,12} [A-Z][a-z]{1,12}"
}

/// Strategy for generating descriptions, occasionally seeded with risk keywords
pub fn description_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => "[a-z ]{0,300}",
        1 => ("[a-z ]{0,80}", prop_oneof![Just("urgent"), Just("cash"), Just("stolen")])
            .prop_map(|(text, keyword)| format!("{text} {keyword}")),
    ]
}

/// Strategy for generating valid claim submissions
pub fn new_claim_strategy() -> impl Strategy<Value = NewClaim> {
    (
        customer_strategy(),
        claim_type_strategy(),
        amount_strategy(),
        description_strategy(),
    )
        .prop_map(|(customer, claim_type, amount, description)| NewClaim {
            customer,
            claim_type,
            amount,
            description,
        })
}
