//! Convergence loop configuration

use serde::{Deserialize, Serialize};

/// Configuration for one convergence run
///
/// All thresholds are injected per run; nothing is read from process-wide
/// state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceConfig {
    /// Score (0–100) at which the run converges
    pub target_score: f64,
    /// Maximum refine/re-assess cycles after the initial assessment
    pub max_iterations: usize,
    /// Minimum per-iteration score gain; a smaller gain exhausts the run
    pub min_improvement_delta: f64,
    /// Whether refinement is attempted at all
    ///
    /// With `auto_fix = false` the run is assess-only: a below-target
    /// artifact exhausts immediately with zero iterations.
    pub auto_fix: bool,
    /// "Exhausted but close enough" margin
    ///
    /// An exhausted run still counts as success when
    /// `final_score >= target_score - acceptance_margin`. Zero means
    /// strict.
    pub acceptance_margin: f64,
}

impl ConvergenceConfig {
    /// Create the default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target score
    #[inline]
    #[must_use]
    pub fn with_target_score(mut self, target: f64) -> Self {
        self.target_score = target;
        self
    }

    /// Set the iteration budget
    #[inline]
    #[must_use]
    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    /// Set the minimum per-iteration improvement
    #[inline]
    #[must_use]
    pub fn with_min_improvement_delta(mut self, delta: f64) -> Self {
        self.min_improvement_delta = delta;
        self
    }

    /// Enable or disable refinement
    #[inline]
    #[must_use]
    pub fn with_auto_fix(mut self, auto_fix: bool) -> Self {
        self.auto_fix = auto_fix;
        self
    }

    /// Set the exhausted-but-close-enough margin
    #[inline]
    #[must_use]
    pub fn with_acceptance_margin(mut self, margin: f64) -> Self {
        self.acceptance_margin = margin;
        self
    }

    /// The lowest final score an exhausted run may report as success
    #[inline]
    #[must_use]
    pub fn acceptance_floor(&self) -> f64 {
        self.target_score - self.acceptance_margin
    }
}

impl Default for ConvergenceConfig {
    fn default() -> Self {
        Self {
            target_score: 90.0,
            max_iterations: 5,
            min_improvement_delta: 1.0,
            auto_fix: true,
            acceptance_margin: 0.0,
        }
    }
}
