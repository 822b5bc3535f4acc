//! Orchestration results

use crate::strategy::CandidateStrategy;
use anneal_artifact::Artifact;
use anneal_convergence::{ConvergencePhase, ConvergenceResult};
use chrono::{DateTime, Utc};
use std::time::Duration;

/// The two quality dimensions under orchestration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackKind {
    /// Rule-based structural quality
    Structural,
    /// Judge-backed content authenticity
    Content,
}

impl std::fmt::Display for TrackKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Structural => write!(f, "structural"),
            Self::Content => write!(f, "content"),
        }
    }
}

/// Outcome of one dual-track orchestration run
#[derive(Debug, Clone)]
pub struct OrchestrationResult {
    /// Whether every track that ran met its target
    pub success: bool,
    /// Structural track run, if one was performed
    pub structural: Option<ConvergenceResult>,
    /// Content track run, if one was performed
    pub content: Option<ConvergenceResult>,
    /// Final observed structural score (initial assessment when the
    /// track was skipped, 0 when it failed)
    pub structural_score: f64,
    /// Final observed content score (same conventions)
    pub content_score: f64,
    /// The selected artifact revision
    pub chosen_artifact: Artifact,
    /// Human-readable record of what happened, in order
    pub improvement_path: Vec<String>,
    /// Wall-clock duration
    pub elapsed: Duration,
    /// When the run started
    pub started_at: DateTime<Utc>,
}

impl OrchestrationResult {
    /// Sum of both tracks' observed final scores
    ///
    /// Benchmark mode maximizes this value across strategies.
    #[inline]
    #[must_use]
    pub fn combined_score(&self) -> f64 {
        self.structural_score + self.content_score
    }

    /// Total refine/re-assess cycles across both tracks
    #[inline]
    #[must_use]
    pub fn total_iterations(&self) -> usize {
        self.structural.as_ref().map_or(0, |r| r.iterations_used)
            + self.content.as_ref().map_or(0, |r| r.iterations_used)
    }
}

/// The score a track contributes to comparisons
///
/// A failed track scores 0; exhausted runs keep their best-seen score.
#[inline]
#[must_use]
pub(crate) fn comparison_score(result: &ConvergenceResult) -> f64 {
    if result.phase == ConvergencePhase::Failed {
        0.0
    } else {
        result.final_score
    }
}

/// One benchmark candidate's outcome
#[derive(Debug, Clone)]
pub struct StrategyOutcome {
    /// Which candidate configuration ran
    pub strategy: CandidateStrategy,
    /// Its full orchestration result
    pub result: OrchestrationResult,
}

impl StrategyOutcome {
    /// The value benchmark mode ranks by
    #[inline]
    #[must_use]
    pub fn combined_score(&self) -> f64 {
        self.result.combined_score()
    }
}

/// Offline tuning report over every candidate strategy
#[derive(Debug, Clone)]
pub struct BenchmarkReport {
    /// Per-candidate outcomes in evaluation order
    pub outcomes: Vec<StrategyOutcome>,
    /// The candidate maximizing the combined score
    ///
    /// Ties prefer fewer total iterations, then evaluation order.
    pub recommended: CandidateStrategy,
}

impl BenchmarkReport {
    /// The recommended candidate's outcome
    #[must_use]
    pub fn recommended_outcome(&self) -> Option<&StrategyOutcome> {
        self.outcomes
            .iter()
            .find(|o| o.strategy == self.recommended)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_kind_display() {
        assert_eq!(TrackKind::Structural.to_string(), "structural");
        assert_eq!(TrackKind::Content.to_string(), "content");
    }
}
