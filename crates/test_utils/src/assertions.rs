//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for domain types and API envelopes
//! that give more meaningful error messages than standard assertions.

use domain_claims::RiskAssessment;
use domain_tunnel::TunnelSession;
use serde_json::Value;

/// Tolerance for comparing floating point scores
pub const SCORE_EPSILON: f64 = 1e-9;

/// Asserts that a score lies in `[0, 1]`
pub fn assert_score_in_range(score: f64) {
    assert!(
        (0.0..=1.0).contains(&score),
        "Expected score in [0, 1], got {}",
        score
    );
}

/// Asserts that the contribution breakdown sums to the reported score
pub fn assert_contributions_reconstruct(assessment: &RiskAssessment) {
    let reconstructed = assessment.reconstructed_score();
    assert!(
        (reconstructed - assessment.score).abs() < SCORE_EPSILON,
        "Contributions sum to {} but score is {}",
        reconstructed,
        assessment.score
    );
}

/// Asserts that a tunnel's history only ever moves forward
///
/// # Panics
///
/// Panics if the history is discontinuous, goes backwards in state order or in
/// time, or does not end in the session's current state
pub fn assert_forward_only_history(session: &TunnelSession) {
    for pair in session.transitions.windows(2) {
        assert_eq!(
            pair[0].to, pair[1].from,
            "Discontinuous history for tunnel {}",
            session.id
        );
        assert!(
            pair[0].at <= pair[1].at,
            "Transition timestamps go backwards for tunnel {}",
            session.id
        );
    }
    for transition in &session.transitions {
        assert!(
            transition.from < transition.to,
            "Backward transition {} -> {} for tunnel {}",
            transition.from,
            transition.to,
            session.id
        );
    }
    if let Some(last) = session.transitions.last() {
        assert_eq!(last.to, session.state, "History does not end in current state");
    }
}

/// Asserts a success envelope and returns its `data`
pub fn assert_success_envelope(body: &Value) -> &Value {
    assert_eq!(
        body["success"],
        Value::Bool(true),
        "Expected success envelope, got {}",
        body
    );
    body.get("data")
        .unwrap_or_else(|| panic!("Success envelope without data: {}", body))
}

/// Asserts an error envelope carrying `code`
pub fn assert_error_envelope(body: &Value, code: &str) {
    assert_eq!(
        body["success"],
        Value::Bool(false),
        "Expected error envelope, got {}",
        body
    );
    assert_eq!(
        body["error"]["code"].as_str(),
        Some(code),
        "Unexpected error code in {}",
        body
    );
    assert!(
        body["error"]["message"].as_str().is_some_and(|m| !m.is_empty()),
        "Error envelope without message: {}",
        body
    );
}
