//! Claim risk scoring
//!
//! The [`RiskScoringEngine`] turns a claim snapshot into a score in `[0, 1]`,
//! a per-factor breakdown, and a set of insight tags. It is a pure function of
//! the claim and the engine configuration.
//!
//! # Weighting
//!
//! | factor         | weight | signal                                             |
//! |----------------|--------|----------------------------------------------------|
//! | `claim_type`   | 0.20   | type prior (medical 0.45, auto 0.55, property 0.60, other 0.70) |
//! | `amount`       | 0.40   | `min(amount / baseline / 3, 1)`                    |
//! | `description`  | 0.20   | 1.0 below 20 chars, 0.5 below 60, 0.2 below 200    |
//! | `keywords`     | 0.15   | `min(hits / 3, 1)` over [`SUSPICIOUS_KEYWORDS`]    |
//! | `round_amount` | 0.05   | 1.0 for exact multiples of 1 000 (at least 1 000)  |
//!
//! Weights sum to 1.0 and every signal lies in `[0, 1]`, so the score needs no
//! clamping and the contributions add back up to it exactly. Changing any
//! number in this table changes every stored score; bump `model_version`
//! when doing so.

use std::collections::BTreeSet;
use std::fmt;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use core_kernel::{ClaimId, CoreError};
use crate::claim::{Claim, ClaimType};
use crate::error::ClaimError;

/// Phrases that raise the keyword signal
pub const SUSPICIOUS_KEYWORDS: [&str; 12] = [
    "urgent",
    "cash",
    "total loss",
    "stolen",
    "theft",
    "fire",
    "no receipt",
    "lost receipt",
    "immediately",
    "wire transfer",
    "untraceable",
    "prepaid card",
];

/// Scores at or above this floor (and below the fraud cutoff) are medium risk
pub const MEDIUM_RISK_FLOOR: f64 = 0.4;

/// Scoring engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Minimum confidence the engine trusts its own assessment at
    pub accuracy_threshold: f64,
    /// Score at or above which a claim is flagged
    pub fraud_cutoff: f64,
    /// Maximum number of claims processed per bulk-analyze batch
    pub batch_size: usize,
    /// Version label reported with every assessment
    pub model_version: String,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            accuracy_threshold: 0.85,
            fraud_cutoff: 0.7,
            batch_size: 50,
            model_version: "1.0.0".to_string(),
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<(), CoreError> {
        if !(0.0..=1.0).contains(&self.accuracy_threshold) {
            return Err(CoreError::configuration(format!(
                "AI_ACCURACY_THRESHOLD must be within [0, 1], got {}",
                self.accuracy_threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.fraud_cutoff) {
            return Err(CoreError::configuration(format!(
                "AI_FRAUD_CUTOFF must be within [0, 1], got {}",
                self.fraud_cutoff
            )));
        }
        if self.batch_size == 0 {
            return Err(CoreError::configuration("AI_BATCH_SIZE must be at least 1"));
        }
        Ok(())
    }
}

/// Fixed insight-tag vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightTag {
    HighAmount,
    ElevatedAmount,
    ShortDescription,
    SuspiciousKeywords,
    RoundAmount,
    HighRiskType,
    LowRisk,
    MediumRisk,
    HighRisk,
    LowConfidence,
}

impl InsightTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightTag::HighAmount => "high_amount",
            InsightTag::ElevatedAmount => "elevated_amount",
            InsightTag::ShortDescription => "short_description",
            InsightTag::SuspiciousKeywords => "suspicious_keywords",
            InsightTag::RoundAmount => "round_amount",
            InsightTag::HighRiskType => "high_risk_type",
            InsightTag::LowRisk => "low_risk",
            InsightTag::MediumRisk => "medium_risk",
            InsightTag::HighRisk => "high_risk",
            InsightTag::LowConfidence => "low_confidence",
        }
    }
}

impl fmt::Display for InsightTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse risk band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// Signals feeding the score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    ClaimType,
    Amount,
    Description,
    Keywords,
    RoundAmount,
}

impl RiskFactor {
    /// Evaluation order; contributions are summed in this order
    pub const ALL: [RiskFactor; 5] = [
        RiskFactor::ClaimType,
        RiskFactor::Amount,
        RiskFactor::Description,
        RiskFactor::Keywords,
        RiskFactor::RoundAmount,
    ];

    pub fn weight(&self) -> f64 {
        match self {
            RiskFactor::ClaimType => 0.20,
            RiskFactor::Amount => 0.40,
            RiskFactor::Description => 0.20,
            RiskFactor::Keywords => 0.15,
            RiskFactor::RoundAmount => 0.05,
        }
    }
}

/// One line of the insight breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub factor: RiskFactor,
    pub weight: f64,
    /// Normalized signal in `[0, 1]`
    pub signal: f64,
    /// `weight * signal`
    pub contribution: f64,
    /// Human-readable explanation
    pub detail: String,
}

/// Result of scoring a claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub claim_id: ClaimId,
    pub model_version: String,
    pub score: f64,
    pub confidence: f64,
    pub risk_level: RiskLevel,
    pub fraud_cutoff: f64,
    pub accuracy_threshold: f64,
    /// Score reached the fraud cutoff
    pub flagged: bool,
    /// Confidence fell below the accuracy threshold
    pub requires_manual_review: bool,
    pub tags: BTreeSet<InsightTag>,
    pub contributions: Vec<Contribution>,
}

impl RiskAssessment {
    /// Sum of the breakdown, which equals `score`
    pub fn reconstructed_score(&self) -> f64 {
        self.contributions.iter().map(|c| c.contribution).sum()
    }
}

/// Intermediate features extracted from a claim
struct Features {
    type_prior: f64,
    baseline: Decimal,
    amount_ratio: f64,
    description_len: usize,
    keyword_hits: Vec<&'static str>,
    round_amount: bool,
}

/// Deterministic, rule-based claim scorer
#[derive(Debug, Clone, Default)]
pub struct RiskScoringEngine {
    config: ScoringConfig,
}

impl RiskScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Risk prior per claim type
    pub fn type_prior(claim_type: ClaimType) -> f64 {
        match claim_type {
            ClaimType::Medical => 0.45,
            ClaimType::Auto => 0.55,
            ClaimType::Property => 0.60,
            ClaimType::Other => 0.70,
        }
    }

    /// Typical claim amount per claim type
    pub fn amount_baseline(claim_type: ClaimType) -> Decimal {
        match claim_type {
            ClaimType::Medical => dec!(10000),
            ClaimType::Auto => dec!(8000),
            ClaimType::Property => dec!(25000),
            ClaimType::Other => dec!(5000),
        }
    }

    /// Scores a claim snapshot
    ///
    /// # Errors
    ///
    /// Returns `ClaimError::Validation` if the amount is negative.
    pub fn analyze(&self, claim: &Claim) -> Result<RiskAssessment, ClaimError> {
        if claim.amount < Decimal::ZERO {
            return Err(ClaimError::validation(format!(
                "amount must be non-negative, got {}",
                claim.amount
            )));
        }

        let features = Self::extract(claim);
        let contributions: Vec<Contribution> = RiskFactor::ALL
            .iter()
            .map(|factor| Self::contribution(*factor, &features))
            .collect();

        let score: f64 = contributions.iter().map(|c| c.contribution).sum();
        let cutoff = self.config.fraud_cutoff;
        let confidence = 0.5 + 0.5 * (score - cutoff).abs() / cutoff.max(1.0 - cutoff);

        let risk_level = if score >= cutoff {
            RiskLevel::High
        } else if score >= MEDIUM_RISK_FLOOR {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        };

        let flagged = risk_level == RiskLevel::High;
        let requires_manual_review = confidence < self.config.accuracy_threshold;
        let tags = Self::tags(&features, risk_level, requires_manual_review);

        Ok(RiskAssessment {
            claim_id: claim.id,
            model_version: self.config.model_version.clone(),
            score,
            confidence,
            risk_level,
            fraud_cutoff: cutoff,
            accuracy_threshold: self.config.accuracy_threshold,
            flagged,
            requires_manual_review,
            tags,
            contributions,
        })
    }

    fn extract(claim: &Claim) -> Features {
        let baseline = Self::amount_baseline(claim.claim_type);
        let amount_ratio = (claim.amount / baseline).to_f64().unwrap_or(f64::MAX);
        let lowered = claim.description.to_lowercase();

        Features {
            type_prior: Self::type_prior(claim.claim_type),
            baseline,
            amount_ratio,
            description_len: claim.description.trim().chars().count(),
            keyword_hits: SUSPICIOUS_KEYWORDS
                .iter()
                .copied()
                .filter(|keyword| lowered.contains(keyword))
                .collect(),
            round_amount: claim.amount >= dec!(1000) && (claim.amount % dec!(1000)).is_zero(),
        }
    }

    fn description_signal(len: usize) -> f64 {
        match len {
            0..=19 => 1.0,
            20..=59 => 0.5,
            60..=199 => 0.2,
            _ => 0.0,
        }
    }

    fn contribution(factor: RiskFactor, features: &Features) -> Contribution {
        let (signal, detail) = match factor {
            RiskFactor::ClaimType => (
                features.type_prior,
                format!("claim type prior {:.2}", features.type_prior),
            ),
            RiskFactor::Amount => (
                (features.amount_ratio / 3.0).min(1.0),
                format!(
                    "amount is {:.2}x the {} baseline",
                    features.amount_ratio, features.baseline
                ),
            ),
            RiskFactor::Description => (
                Self::description_signal(features.description_len),
                format!("description has {} characters", features.description_len),
            ),
            RiskFactor::Keywords => {
                let hits = features.keyword_hits.len();
                let detail = if hits == 0 {
                    "no suspicious keywords".to_string()
                } else {
                    format!("suspicious keywords: {}", features.keyword_hits.join(", "))
                };
                ((hits as f64 / 3.0).min(1.0), detail)
            }
            RiskFactor::RoundAmount => {
                if features.round_amount {
                    (1.0, "amount is an exact multiple of 1000".to_string())
                } else {
                    (0.0, "amount is not a round figure".to_string())
                }
            }
        };

        let weight = factor.weight();
        Contribution {
            factor,
            weight,
            signal,
            contribution: weight * signal,
            detail,
        }
    }

    fn tags(features: &Features, level: RiskLevel, low_confidence: bool) -> BTreeSet<InsightTag> {
        let mut tags = BTreeSet::new();

        if features.amount_ratio >= 2.0 {
            tags.insert(InsightTag::HighAmount);
        } else if features.amount_ratio >= 1.0 {
            tags.insert(InsightTag::ElevatedAmount);
        }
        if Self::description_signal(features.description_len) >= 0.5 {
            tags.insert(InsightTag::ShortDescription);
        }
        if !features.keyword_hits.is_empty() {
            tags.insert(InsightTag::SuspiciousKeywords);
        }
        if features.round_amount {
            tags.insert(InsightTag::RoundAmount);
        }
        if features.type_prior >= 0.6 {
            tags.insert(InsightTag::HighRiskType);
        }
        tags.insert(match level {
            RiskLevel::Low => InsightTag::LowRisk,
            RiskLevel::Medium => InsightTag::MediumRisk,
            RiskLevel::High => InsightTag::HighRisk,
        });
        if low_confidence {
            tags.insert(InsightTag::LowConfidence);
        }

        tags
    }
}
