//! Orchestration strategies
//!
//! How the two quality tracks are scheduled against each other.

use serde::{Deserialize, Serialize};

/// Scheduling strategy for the two quality tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum StrategyKind {
    /// Run the larger-gap track first, then the other on its output
    ///
    /// With `stop_on_first_success` the second track is skipped once the
    /// prioritized track converges. A prioritized track that fails to
    /// converge still triggers the other track as a rescue attempt.
    Sequential {
        /// Stop after the prioritized track converges
        stop_on_first_success: bool,
    },
    /// Run both tracks independently from the same input and keep the
    /// higher-scoring result
    Parallel,
    /// Try every candidate strategy and report the best (offline tuning)
    Benchmark,
}

impl StrategyKind {
    /// Human-readable label for logging and improvement paths
    #[inline]
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Sequential {
                stop_on_first_success: true,
            } => "sequential (stop on first success)",
            Self::Sequential {
                stop_on_first_success: false,
            } => "sequential",
            Self::Parallel => "parallel",
            Self::Benchmark => "benchmark",
        }
    }
}

impl Default for StrategyKind {
    fn default() -> Self {
        Self::Sequential {
            stop_on_first_success: false,
        }
    }
}

/// Concrete configurations the benchmark mode evaluates
///
/// The baseline runs no iterations at all; its presence makes the tuning
/// question "does iteration pay for this workload?" directly answerable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateStrategy {
    /// Assess-only, no iteration
    Baseline,
    /// Sequential with `stop_on_first_success = true`
    SequentialStopOnFirst,
    /// Sequential, both tracks always
    SequentialFull,
    /// Parallel select-best
    Parallel,
}

impl CandidateStrategy {
    /// Every candidate, in evaluation (and tie-break) order
    #[inline]
    #[must_use]
    pub const fn all() -> [Self; 4] {
        [
            Self::Baseline,
            Self::SequentialStopOnFirst,
            Self::SequentialFull,
            Self::Parallel,
        ]
    }

    /// Human-readable label
    #[inline]
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Baseline => "baseline (no iteration)",
            Self::SequentialStopOnFirst => "sequential (stop on first success)",
            Self::SequentialFull => "sequential",
            Self::Parallel => "parallel",
        }
    }
}
