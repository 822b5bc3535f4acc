//! The single-dimension convergence loop
//!
//! Drives one [`QualityTrack`] toward its target score through repeated
//! refine/re-assess cycles, tracking the best-seen revision throughout.

use crate::cancel::CancelToken;
use crate::config::ConvergenceConfig;
use crate::result::{ConvergencePhase, ConvergenceResult, RunId};
use crate::track::{QualityTrack, TrackAssessment};
use anneal_artifact::Artifact;
use std::time::Instant;

/// Best-scoring revision observed so far
///
/// Replacement requires a strictly higher score, so ties keep the
/// earlier revision.
struct BestSeen {
    score: f64,
    artifact: Artifact,
    issues: Vec<String>,
}

impl BestSeen {
    fn offer(&mut self, score: f64, artifact: &Artifact, issues: &[String]) {
        if score > self.score {
            self.score = score;
            self.artifact = artifact.clone();
            self.issues = issues.to_vec();
        }
    }
}

/// Iterate/assess/refine loop over one quality dimension
///
/// # State machine
/// `Init → Validated → (Correcting → Revalidated)* →
/// {Converged | Exhausted | Failed | Cancelled}`
///
/// # Guarantees
/// - Never returns an artifact scoring below the initial score
/// - Track errors end the run as `Failed`; they are never propagated
/// - Cancellation is observed between every step boundary and returns
///   the last fully-assessed revision
#[derive(Debug)]
pub struct ConvergenceController<T: QualityTrack> {
    track: T,
    config: ConvergenceConfig,
    cancel: CancelToken,
}

impl<T: QualityTrack> ConvergenceController<T> {
    /// Create a controller over a track
    #[inline]
    #[must_use]
    pub fn new(track: T, config: ConvergenceConfig) -> Self {
        Self {
            track,
            config,
            cancel: CancelToken::new(),
        }
    }

    /// Observe an external cancellation token (builder style)
    #[inline]
    #[must_use]
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// The controller's configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ConvergenceConfig {
        &self.config
    }

    /// The underlying track
    #[inline]
    #[must_use]
    pub fn track(&self) -> &T {
        &self.track
    }

    /// Run the loop to a terminal phase
    ///
    /// Never returns an error: every failure mode is folded into the
    /// returned [`ConvergenceResult`].
    pub async fn run(&self, artifact: &Artifact) -> ConvergenceResult {
        let run_id = RunId::new();
        let started = Instant::now();

        let initial = match self.track.assess(artifact).await {
            Ok(assessment) => assessment,
            Err(err) => {
                tracing::warn!(
                    track = self.track.name(),
                    run = %run_id,
                    error = %err,
                    "initial assessment failed"
                );
                return ConvergenceResult {
                    run_id,
                    phase: ConvergencePhase::Failed,
                    success: false,
                    initial_score: 0.0,
                    final_score: 0.0,
                    iterations_used: 0,
                    applied_fixes: Vec::new(),
                    remaining_issues: vec![err.to_string()],
                    final_artifact: artifact.clone(),
                    elapsed: started.elapsed(),
                };
            }
        };

        let initial_score = initial.score;
        tracing::info!(
            track = self.track.name(),
            run = %run_id,
            initial_score,
            target = self.config.target_score,
            "convergence started"
        );

        let mut best = BestSeen {
            score: initial_score,
            artifact: artifact.clone(),
            issues: initial.issues.clone(),
        };

        if initial_score >= self.config.target_score {
            return self.finish(
                run_id,
                ConvergencePhase::Converged,
                initial_score,
                best,
                0,
                Vec::new(),
                None,
                started,
            );
        }

        if !self.config.auto_fix {
            return self.finish(
                run_id,
                ConvergencePhase::Exhausted,
                initial_score,
                best,
                0,
                Vec::new(),
                None,
                started,
            );
        }

        let mut current = artifact.clone();
        let mut assessment: TrackAssessment = initial;
        let mut applied_fixes = Vec::new();
        let mut iterations_used = 0;
        let mut phase = ConvergencePhase::Validated;
        let mut run_error = None;

        for iteration in 1..=self.config.max_iterations {
            if self.cancel.is_cancelled() {
                phase = ConvergencePhase::Cancelled;
                break;
            }

            match self.track.refine(&current, &assessment).await {
                Ok(Some(refinement)) => {
                    applied_fixes.extend(refinement.applied);
                    current = refinement.artifact;
                }
                Ok(None) => {
                    // Track has nothing further to offer.
                    phase = ConvergencePhase::Exhausted;
                    break;
                }
                Err(err) => {
                    phase = ConvergencePhase::Failed;
                    run_error = Some(err.to_string());
                    break;
                }
            }

            if self.cancel.is_cancelled() {
                // The refined revision was never assessed; discard it.
                phase = ConvergencePhase::Cancelled;
                break;
            }

            let next = match self.track.assess(&current).await {
                Ok(next) => next,
                Err(err) => {
                    phase = ConvergencePhase::Failed;
                    run_error = Some(err.to_string());
                    break;
                }
            };

            iterations_used = iteration;
            let delta = next.score - assessment.score;
            best.offer(next.score, &current, &next.issues);
            tracing::debug!(
                track = self.track.name(),
                run = %run_id,
                iteration,
                score = next.score,
                delta,
                "iteration complete"
            );

            if next.score >= self.config.target_score {
                phase = ConvergencePhase::Converged;
                break;
            }
            if delta < self.config.min_improvement_delta {
                phase = ConvergencePhase::Exhausted;
                break;
            }
            assessment = next;
        }

        if !phase.is_terminal() {
            phase = if best.score >= self.config.target_score {
                ConvergencePhase::Converged
            } else {
                ConvergencePhase::Exhausted
            };
        }

        self.finish(
            run_id,
            phase,
            initial_score,
            best,
            iterations_used,
            applied_fixes,
            run_error,
            started,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn finish(
        &self,
        run_id: RunId,
        phase: ConvergencePhase,
        initial_score: f64,
        best: BestSeen,
        iterations_used: usize,
        applied_fixes: Vec<String>,
        run_error: Option<String>,
        started: Instant,
    ) -> ConvergenceResult {
        let success = match phase {
            ConvergencePhase::Converged => true,
            ConvergencePhase::Exhausted => best.score >= self.config.acceptance_floor(),
            _ => false,
        };

        let mut remaining_issues = best.issues;
        if let Some(error) = run_error {
            remaining_issues.push(error);
        }
        if phase == ConvergencePhase::Cancelled {
            remaining_issues.push("run cancelled; returning last assessed revision".to_string());
        }

        tracing::info!(
            track = self.track.name(),
            run = %run_id,
            ?phase,
            success,
            initial_score,
            final_score = best.score,
            iterations_used,
            "convergence finished"
        );

        ConvergenceResult {
            run_id,
            phase,
            success,
            initial_score,
            final_score: best.score,
            iterations_used,
            applied_fixes,
            remaining_issues,
            final_artifact: best.artifact,
            elapsed: started.elapsed(),
        }
    }
}
