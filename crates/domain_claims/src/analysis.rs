//! Claim analysis service
//!
//! Orchestrates the scoring engine and the claim store: the engine computes,
//! the store persists. Scoring runs inside [`ClaimStore::update_claim`], so the
//! assessment written back always matches the snapshot it was computed from.
//!
//! # Batch mode
//!
//! [`ClaimAnalysisService::analyze_batch`] splits the requested ids into
//! chunks of `batch_size` and processes them one chunk at a time. Every claim
//! commits on its own, so a failure never rolls back earlier work. A
//! [`BatchControl`] can stop the run between chunks.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use core_kernel::{ClaimId, ErrorKind, SharedClock};

use crate::claim::{Claim, ClaimStatus};
use crate::error::ClaimError;
use crate::ports::ClaimStore;
use crate::scoring::{RiskAssessment, RiskScoringEngine};

/// Outcome of analyzing one claim
#[derive(Debug, Clone, Serialize)]
pub struct ClaimAnalysis {
    /// Claim as persisted after the analysis
    pub claim: Claim,
    pub assessment: RiskAssessment,
    /// Status before the analysis
    pub previous_status: ClaimStatus,
}

impl ClaimAnalysis {
    pub fn status_changed(&self) -> bool {
        self.previous_status != self.claim.status
    }
}

/// Handle for interrupting a running batch between chunks
#[derive(Debug, Clone, Default)]
pub struct BatchControl {
    interrupted: Arc<AtomicBool>,
}

impl BatchControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests that no further chunks are started
    pub fn interrupt(&self) {
        self.interrupted.store(true, Ordering::SeqCst);
    }

    pub fn is_interrupted(&self) -> bool {
        self.interrupted.load(Ordering::SeqCst)
    }
}

/// A claim that was scored and committed
#[derive(Debug, Clone, Serialize)]
pub struct BatchSuccess {
    pub claim_id: ClaimId,
    pub score: f64,
    pub status: ClaimStatus,
}

/// A claim that could not be analyzed
#[derive(Debug, Clone, Serialize)]
pub struct BatchFailure {
    pub claim_id: ClaimId,
    pub code: ErrorKind,
    pub message: String,
}

/// Results of one chunk
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    pub index: usize,
    pub succeeded: Vec<BatchSuccess>,
    pub failed: Vec<BatchFailure>,
}

/// Results of a bulk analysis run
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub batch_size: usize,
    pub requested: usize,
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Set when the run stopped early
    pub interrupted: bool,
    /// Ids never attempted because of an interruption
    pub skipped: Vec<ClaimId>,
    pub batches: Vec<BatchOutcome>,
}

/// Service for analyzing claims
pub struct ClaimAnalysisService {
    store: Arc<dyn ClaimStore>,
    engine: RiskScoringEngine,
    clock: SharedClock,
}

impl ClaimAnalysisService {
    pub fn new(store: Arc<dyn ClaimStore>, engine: RiskScoringEngine, clock: SharedClock) -> Self {
        Self { store, engine, clock }
    }

    pub fn engine(&self) -> &RiskScoringEngine {
        &self.engine
    }

    /// Scores a claim and writes score, tags and status back to the store
    ///
    /// # Errors
    ///
    /// Returns `ClaimNotFound` for an unknown id and `Validation` for a claim
    /// the engine cannot score.
    pub async fn analyze(&self, claim_id: ClaimId) -> Result<ClaimAnalysis, ClaimError> {
        let engine = &self.engine;
        let now = self.clock.now();
        let mut computed: Option<(RiskAssessment, ClaimStatus)> = None;

        let claim = self
            .store
            .update_claim(claim_id, &mut |claim: &mut Claim| {
                let assessment = engine.analyze(claim)?;
                let previous = claim.status;
                claim.apply_assessment(&assessment, now);
                computed = Some((assessment, previous));
                Ok(())
            })
            .await?;

        let (assessment, previous_status) = computed.ok_or_else(|| {
            ClaimError::Internal(format!("analysis of {claim_id} produced no assessment"))
        })?;

        info!(
            claim_id = %claim_id,
            score = assessment.score,
            flagged = assessment.flagged,
            from = %previous_status,
            to = %claim.status,
            "Claim analyzed"
        );

        Ok(ClaimAnalysis {
            claim,
            assessment,
            previous_status,
        })
    }

    /// Recomputes the assessment breakdown without touching the store
    pub async fn insights(&self, claim_id: ClaimId) -> Result<RiskAssessment, ClaimError> {
        let claim = self.store.get_claim(claim_id).await?;
        self.engine.analyze(&claim)
    }

    /// Analyzes many claims in sequential chunks of the configured batch size
    ///
    /// # Errors
    ///
    /// Returns `Validation` when `claim_ids` is empty. Per-claim failures are
    /// reported in the returned [`BatchReport`], not as an error.
    pub async fn analyze_batch(
        &self,
        claim_ids: &[ClaimId],
        control: &BatchControl,
    ) -> Result<BatchReport, ClaimError> {
        if claim_ids.is_empty() {
            return Err(ClaimError::validation("claim_ids must not be empty"));
        }

        let batch_size = self.engine.config().batch_size.max(1);
        let mut report = BatchReport {
            batch_size,
            requested: claim_ids.len(),
            processed: 0,
            succeeded: 0,
            failed: 0,
            interrupted: false,
            skipped: Vec::new(),
            batches: Vec::new(),
        };

        for (index, chunk) in claim_ids.chunks(batch_size).enumerate() {
            if control.is_interrupted() {
                report.interrupted = true;
                report.skipped = claim_ids[index * batch_size..].to_vec();
                warn!(
                    batch = index,
                    skipped = report.skipped.len(),
                    "Batch analysis interrupted"
                );
                break;
            }

            let mut outcome = BatchOutcome {
                index,
                succeeded: Vec::new(),
                failed: Vec::new(),
            };

            for claim_id in chunk {
                match self.analyze(*claim_id).await {
                    Ok(analysis) => outcome.succeeded.push(BatchSuccess {
                        claim_id: *claim_id,
                        score: analysis.assessment.score,
                        status: analysis.claim.status,
                    }),
                    Err(e) => {
                        debug!(claim_id = %claim_id, error = %e, "Claim analysis failed in batch");
                        outcome.failed.push(BatchFailure {
                            claim_id: *claim_id,
                            code: e.kind(),
                            message: e.to_string(),
                        });
                    }
                }
            }

            report.processed += chunk.len();
            report.succeeded += outcome.succeeded.len();
            report.failed += outcome.failed.len();
            report.batches.push(outcome);
        }

        info!(
            requested = report.requested,
            succeeded = report.succeeded,
            failed = report.failed,
            batches = report.batches.len(),
            interrupted = report.interrupted,
            "Batch analysis finished"
        );

        Ok(report)
    }
}
