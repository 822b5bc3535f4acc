//! Convergence run results

use anneal_artifact::Artifact;
use std::time::Duration;
use ulid::Ulid;

/// Unique convergence run identifier (ULID for sortability)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunId(pub Ulid);

impl RunId {
    /// Generate a new run id
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Phases of the convergence state machine
///
/// `Init → Validated → (Correcting → Revalidated)* →
/// {Converged | Exhausted | Failed | Cancelled}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConvergencePhase {
    /// Run created, nothing assessed yet
    Init,
    /// Initial assessment complete
    Validated,
    /// A refinement step is in flight
    Correcting,
    /// A refined revision has been re-assessed
    Revalidated,
    /// Target reached (possibly within the acceptance margin)
    Converged,
    /// Iteration budget or improvement floor hit below target
    Exhausted,
    /// A track error ended the run
    Failed,
    /// Cancellation was requested between step boundaries
    Cancelled,
}

impl ConvergencePhase {
    /// Whether the phase ends a run
    #[inline]
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Converged | Self::Exhausted | Self::Failed | Self::Cancelled
        )
    }
}

/// Outcome of one convergence run
///
/// # Invariants
/// - `final_score >= initial_score` (best-seen, never a regression)
/// - `final_artifact` is the best-scoring revision observed, with ties
///   resolved in favor of the earlier revision
#[derive(Debug, Clone)]
pub struct ConvergenceResult {
    /// Run identifier
    pub run_id: RunId,
    /// Terminal phase of the run
    pub phase: ConvergencePhase,
    /// Whether the run met its target (within the acceptance margin)
    pub success: bool,
    /// Score of the input artifact
    pub initial_score: f64,
    /// Score of the returned artifact
    pub final_score: f64,
    /// Refine/re-assess cycles performed
    pub iterations_used: usize,
    /// Labels of every fix that changed the text, in application order
    pub applied_fixes: Vec<String>,
    /// Outstanding issues on the returned revision (plus any run error)
    pub remaining_issues: Vec<String>,
    /// Best-seen artifact revision
    pub final_artifact: Artifact,
    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

impl ConvergenceResult {
    /// Whether the run converged
    #[inline]
    #[must_use]
    pub fn is_converged(&self) -> bool {
        self.phase == ConvergencePhase::Converged
    }

    /// Total score gained over the run
    #[inline]
    #[must_use]
    pub fn improvement(&self) -> f64 {
        self.final_score - self.initial_score
    }
}
