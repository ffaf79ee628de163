//! Claim aggregate

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use core_kernel::ClaimId;
use crate::error::ClaimError;
use crate::scoring::{InsightTag, RiskAssessment};

/// Largest amount accepted on a claim
pub const MAX_CLAIM_AMOUNT: Decimal = dec!(1000000000000);

/// Claim status
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    /// Received, not yet looked at
    Submitted,
    /// Scored or picked up by a reviewer
    UnderReview,
    /// Risk score at or above the fraud cutoff
    Flagged,
    /// Approved by a reviewer
    Approved,
    /// Rejected by a reviewer
    Rejected,
}

impl ClaimStatus {
    pub const ALL: [ClaimStatus; 5] = [
        ClaimStatus::Submitted,
        ClaimStatus::UnderReview,
        ClaimStatus::Flagged,
        ClaimStatus::Approved,
        ClaimStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Submitted => "submitted",
            ClaimStatus::UnderReview => "under_review",
            ClaimStatus::Flagged => "flagged",
            ClaimStatus::Approved => "approved",
            ClaimStatus::Rejected => "rejected",
        }
    }

    /// Flagged, approved and rejected claims never move again
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ClaimStatus::Flagged | ClaimStatus::Approved | ClaimStatus::Rejected
        )
    }

    /// Checks if transition is valid
    pub fn can_transition_to(&self, target: ClaimStatus) -> bool {
        use ClaimStatus::*;
        matches!(
            (self, target),
            (Submitted, UnderReview)
                | (UnderReview, Flagged)
                | (UnderReview, Approved)
                | (UnderReview, Rejected)
        )
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClaimStatus {
    type Err = ClaimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        ClaimStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| ClaimError::validation(format!("unknown claim status: {s}")))
    }
}

/// Type of claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimType {
    Medical,
    Auto,
    Property,
    Other,
}

impl ClaimType {
    pub const ALL: [ClaimType; 4] = [
        ClaimType::Medical,
        ClaimType::Auto,
        ClaimType::Property,
        ClaimType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimType::Medical => "medical",
            ClaimType::Auto => "auto",
            ClaimType::Property => "property",
            ClaimType::Other => "other",
        }
    }
}

impl fmt::Display for ClaimType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClaimType {
    type Err = ClaimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        ClaimType::ALL
            .into_iter()
            .find(|claim_type| claim_type.as_str() == normalized)
            .ok_or_else(|| ClaimError::validation(format!("unknown claim type: {s}")))
    }
}

/// Input for submitting a claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewClaim {
    pub customer: String,
    pub claim_type: ClaimType,
    pub amount: Decimal,
    pub description: String,
}

impl NewClaim {
    /// Checks the domain invariants of a submission
    pub fn validate(&self) -> Result<(), ClaimError> {
        if self.customer.trim().is_empty() {
            return Err(ClaimError::validation("customer must not be empty"));
        }
        if self.amount < Decimal::ZERO {
            return Err(ClaimError::validation(format!(
                "amount must be non-negative, got {}",
                self.amount
            )));
        }
        if self.amount > MAX_CLAIM_AMOUNT {
            return Err(ClaimError::validation(format!(
                "amount must not exceed {MAX_CLAIM_AMOUNT}, got {}",
                self.amount
            )));
        }
        Ok(())
    }
}

/// An insurance claim tracked through review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    /// Unique identifier
    pub id: ClaimId,
    /// Customer name
    pub customer: String,
    /// Type of claim
    pub claim_type: ClaimType,
    /// Claimed amount
    pub amount: Decimal,
    /// Free-text description
    pub description: String,
    /// Status
    pub status: ClaimStatus,
    /// Last risk score written by the scoring engine
    pub risk_score: Option<f64>,
    /// Last insight tags written by the scoring engine
    pub insight_tags: BTreeSet<InsightTag>,
    /// When the claim was last analyzed
    pub analyzed_at: Option<DateTime<Utc>>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Claim {
    /// Creates a submitted claim after validating the input
    pub fn submit(new_claim: NewClaim, now: DateTime<Utc>) -> Result<Self, ClaimError> {
        new_claim.validate()?;

        Ok(Self {
            id: ClaimId::new_v7(),
            customer: new_claim.customer.trim().to_string(),
            claim_type: new_claim.claim_type,
            amount: new_claim.amount,
            description: new_claim.description,
            status: ClaimStatus::Submitted,
            risk_score: None,
            insight_tags: BTreeSet::new(),
            analyzed_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Updates the status
    pub fn update_status(&mut self, status: ClaimStatus, now: DateTime<Utc>) -> Result<(), ClaimError> {
        if !self.status.can_transition_to(status) {
            return Err(ClaimError::InvalidStatusTransition {
                from: self.status,
                to: status,
            });
        }
        self.status = status;
        self.updated_at = now;
        Ok(())
    }

    /// Writes a risk assessment onto the claim and advances its status
    ///
    /// Submitted claims move to under review; under-review claims move to
    /// flagged when the assessment crossed the fraud cutoff. Claims already
    /// in a terminal status keep it.
    pub fn apply_assessment(&mut self, assessment: &RiskAssessment, now: DateTime<Utc>) {
        self.risk_score = Some(assessment.score);
        self.insight_tags = assessment.tags.clone();
        self.analyzed_at = Some(now);
        self.updated_at = now;

        if self.status == ClaimStatus::Submitted {
            self.status = ClaimStatus::UnderReview;
        }
        if self.status == ClaimStatus::UnderReview && assessment.flagged {
            self.status = ClaimStatus::Flagged;
        }
    }

    pub fn is_analyzed(&self) -> bool {
        self.risk_score.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_claim() -> NewClaim {
        NewClaim {
            customer: "Jane Roe".to_string(),
            claim_type: ClaimType::Auto,
            amount: dec!(1200),
            description: "Rear bumper damage in parking lot".to_string(),
        }
    }

    #[test]
    fn test_submit_starts_submitted() {
        let claim = Claim::submit(new_claim(), Utc::now()).unwrap();
        assert_eq!(claim.status, ClaimStatus::Submitted);
        assert!(claim.risk_score.is_none());
        assert!(claim.insight_tags.is_empty());
    }

    #[test]
    fn test_negative_amount_rejected() {
        let mut input = new_claim();
        input.amount = dec!(-1);
        assert!(matches!(
            Claim::submit(input, Utc::now()),
            Err(ClaimError::Validation(_))
        ));
    }

    #[test]
    fn test_zero_amount_accepted() {
        let mut input = new_claim();
        input.amount = dec!(0);
        assert!(Claim::submit(input, Utc::now()).is_ok());
    }

    #[test]
    fn test_amount_upper_bound() {
        assert_eq!(MAX_CLAIM_AMOUNT, Decimal::from(1_000_000_000_000i64));

        let mut input = new_claim();
        input.amount = MAX_CLAIM_AMOUNT;
        assert!(Claim::submit(input, Utc::now()).is_ok());

        let mut input = new_claim();
        input.amount = Decimal::MAX;
        assert!(matches!(
            Claim::submit(input, Utc::now()),
            Err(ClaimError::Validation(_))
        ));
    }

    #[test]
    fn test_claim_type_parsing() {
        assert_eq!("Medical".parse::<ClaimType>().unwrap(), ClaimType::Medical);
        assert!("dental".parse::<ClaimType>().is_err());
    }

    #[test]
    fn test_terminal_statuses_do_not_move() {
        for from in [ClaimStatus::Flagged, ClaimStatus::Approved, ClaimStatus::Rejected] {
            for to in ClaimStatus::ALL {
                assert!(!from.can_transition_to(to));
            }
        }
    }
}
