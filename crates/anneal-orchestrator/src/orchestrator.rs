//! The dual-track orchestrator
//!
//! Schedules the structural and content-authenticity tracks against each
//! other toward independent targets and produces one final artifact.
//! Failures stay local to a track: the orchestrator proceeds with
//! whatever succeeded and errors only when every track fails hard.

use crate::content::{AuthenticityJudge, ContentTrack};
use crate::error::OrchestratorError;
use crate::external::{Generator, Judge};
use crate::result::{
    comparison_score, BenchmarkReport, OrchestrationResult, StrategyOutcome, TrackKind,
};
use crate::strategy::{CandidateStrategy, StrategyKind};
use anneal_artifact::Artifact;
use anneal_convergence::{
    CancelToken, ConvergenceConfig, ConvergenceController, ConvergencePhase, ConvergenceResult,
    QualityTrack, StructuralTrack,
};
use anneal_rules::RuleEngine;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

/// Orchestrator configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Structural track policy
    pub structural: ConvergenceConfig,
    /// Content track policy
    pub content: ConvergenceConfig,
    /// Scheduling strategy
    pub strategy: StrategyKind,
    /// Per-track wall-clock budget in parallel mode
    ///
    /// A timed-out track is aborted and scored 0. `None` waits
    /// indefinitely.
    pub track_timeout: Option<Duration>,
}

impl OrchestratorConfig {
    /// Create the default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the structural track policy
    #[inline]
    #[must_use]
    pub fn with_structural(mut self, config: ConvergenceConfig) -> Self {
        self.structural = config;
        self
    }

    /// Set the content track policy
    #[inline]
    #[must_use]
    pub fn with_content(mut self, config: ConvergenceConfig) -> Self {
        self.content = config;
        self
    }

    /// Set the scheduling strategy
    #[inline]
    #[must_use]
    pub fn with_strategy(mut self, strategy: StrategyKind) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the per-track timeout for parallel mode
    #[inline]
    #[must_use]
    pub fn with_track_timeout(mut self, timeout: Duration) -> Self {
        self.track_timeout = Some(timeout);
        self
    }
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            structural: ConvergenceConfig::default(),
            content: ConvergenceConfig::default(),
            strategy: StrategyKind::default(),
            track_timeout: None,
        }
    }
}

/// Runs both quality tracks toward independent targets
///
/// Owns no persisted or global state; everything is injected at
/// construction and each run works on its own artifact copies.
pub struct DualTrackOrchestrator {
    structural: Arc<StructuralTrack>,
    judge: Arc<dyn Judge>,
    generator: Option<Arc<dyn Generator>>,
    config: OrchestratorConfig,
    cancel: CancelToken,
}

impl DualTrackOrchestrator {
    /// Create an orchestrator over a rule engine
    ///
    /// The content track defaults to the local [`AuthenticityJudge`];
    /// wire in an external judge with [`Self::with_judge`].
    #[must_use]
    pub fn new(engine: RuleEngine, config: OrchestratorConfig) -> Self {
        Self {
            structural: Arc::new(StructuralTrack::new(engine)),
            judge: Arc::new(AuthenticityJudge::default()),
            generator: None,
            config,
            cancel: CancelToken::new(),
        }
    }

    /// Use an external judge for the content track (builder style)
    #[must_use]
    pub fn with_judge(mut self, judge: Arc<dyn Judge>) -> Self {
        self.judge = judge;
        self
    }

    /// Wire in a generator for content refinement (builder style)
    #[must_use]
    pub fn with_generator(mut self, generator: Arc<dyn Generator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Observe an external cancellation token (builder style)
    #[must_use]
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// The orchestrator's configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Run the configured strategy
    ///
    /// # Errors
    /// [`OrchestratorError::AllTracksFailed`] only when every track fails
    /// irrecoverably; exhaustion is reported through
    /// `OrchestrationResult::success`, not as an error.
    pub async fn run(
        &self,
        artifact: &Artifact,
        original_prompt: &str,
    ) -> Result<OrchestrationResult, OrchestratorError> {
        match self.config.strategy {
            StrategyKind::Sequential {
                stop_on_first_success,
            } => {
                self.run_sequential(
                    artifact,
                    original_prompt,
                    stop_on_first_success,
                    self.config.structural,
                    self.config.content,
                )
                .await
            }
            StrategyKind::Parallel => self.run_parallel(artifact, original_prompt).await,
            StrategyKind::Benchmark => {
                let report = self.benchmark(artifact, original_prompt).await?;
                let recommended = report.recommended;
                let outcome = report
                    .outcomes
                    .into_iter()
                    .find(|o| o.strategy == recommended);
                // benchmark() only recommends strategies it ran
                let Some(outcome) = outcome else {
                    unreachable!("recommended strategy missing from outcomes")
                };
                let mut result = outcome.result;
                result
                    .improvement_path
                    .insert(0, format!("benchmark recommends {}", recommended.label()));
                Ok(result)
            }
        }
    }

    /// Evaluate every candidate strategy and rank by combined score
    ///
    /// Offline tuning aid, not a per-request mode: each candidate runs
    /// the full pipeline from the same input.
    ///
    /// # Errors
    /// Propagates the last candidate error only if every candidate fails.
    pub async fn benchmark(
        &self,
        artifact: &Artifact,
        original_prompt: &str,
    ) -> Result<BenchmarkReport, OrchestratorError> {
        let mut outcomes = Vec::new();
        let mut last_error = None;

        for candidate in CandidateStrategy::all() {
            tracing::info!(strategy = candidate.label(), "benchmark candidate started");
            let run = match candidate {
                CandidateStrategy::Baseline => {
                    self.run_sequential(
                        artifact,
                        original_prompt,
                        false,
                        self.config.structural.with_auto_fix(false),
                        self.config.content.with_auto_fix(false),
                    )
                    .await
                }
                CandidateStrategy::SequentialStopOnFirst => {
                    self.run_sequential(
                        artifact,
                        original_prompt,
                        true,
                        self.config.structural,
                        self.config.content,
                    )
                    .await
                }
                CandidateStrategy::SequentialFull => {
                    self.run_sequential(
                        artifact,
                        original_prompt,
                        false,
                        self.config.structural,
                        self.config.content,
                    )
                    .await
                }
                CandidateStrategy::Parallel => {
                    self.run_parallel(artifact, original_prompt).await
                }
            };

            match run {
                Ok(result) => outcomes.push(StrategyOutcome {
                    strategy: candidate,
                    result,
                }),
                Err(err) => {
                    tracing::warn!(
                        strategy = candidate.label(),
                        error = %err,
                        "benchmark candidate failed"
                    );
                    last_error = Some(err);
                }
            }
        }

        let Some(first) = outcomes.first() else {
            // Every candidate failed the same way; surface the cause.
            return Err(last_error.unwrap_or(OrchestratorError::AllTracksFailed {
                structural: "no candidate completed".to_string(),
                content: "no candidate completed".to_string(),
            }));
        };

        let mut recommended = first.strategy;
        let mut best_score = first.combined_score();
        let mut best_iterations = first.result.total_iterations();
        for outcome in outcomes.iter().skip(1) {
            let score = outcome.combined_score();
            let iterations = outcome.result.total_iterations();
            let better = score > best_score
                || (score == best_score && iterations < best_iterations);
            if better {
                recommended = outcome.strategy;
                best_score = score;
                best_iterations = iterations;
            }
        }

        tracing::info!(
            recommended = recommended.label(),
            combined_score = best_score,
            "benchmark complete"
        );

        Ok(BenchmarkReport {
            outcomes,
            recommended,
        })
    }

    /// Largest-gap-first sequential scheduling with rescue
    async fn run_sequential(
        &self,
        artifact: &Artifact,
        original_prompt: &str,
        stop_on_first_success: bool,
        structural_config: ConvergenceConfig,
        content_config: ConvergenceConfig,
    ) -> Result<OrchestrationResult, OrchestratorError> {
        let started_at = Utc::now();
        let started = Instant::now();
        let content_track = self.content_track(original_prompt);
        let mut path = Vec::new();

        let (structural_initial, content_initial) = self
            .initial_scores(&content_track, artifact, &mut path)
            .await;

        if structural_initial >= structural_config.target_score
            && content_initial >= content_config.target_score
        {
            return Ok(self.accept_unchanged(
                artifact,
                structural_initial,
                content_initial,
                path,
                started,
                started_at,
            ));
        }

        // Greedy policy: the track further from its target runs first;
        // equal gaps break toward structural.
        let structural_gap = (structural_config.target_score - structural_initial).max(0.0);
        let content_gap = (content_config.target_score - content_initial).max(0.0);
        let first = if content_gap > structural_gap {
            TrackKind::Content
        } else {
            TrackKind::Structural
        };
        path.push(format!(
            "sequential: {first} track first (structural gap {structural_gap:.1}, content gap {content_gap:.1})"
        ));

        let mut structural_result: Option<ConvergenceResult> = None;
        let mut content_result: Option<ConvergenceResult> = None;

        let first_result = match first {
            TrackKind::Structural => {
                self.structural_controller(structural_config)
                    .run(artifact)
                    .await
            }
            TrackKind::Content => {
                self.content_controller(Arc::clone(&content_track), content_config)
                    .run(artifact)
                    .await
            }
        };
        path.push(describe_track(first, &first_result));

        let second = match first {
            TrackKind::Structural => TrackKind::Content,
            TrackKind::Content => TrackKind::Structural,
        };

        if first_result.success && stop_on_first_success {
            path.push("stopped on first success".to_string());
            let handoff = first_result.clone();
            match first {
                TrackKind::Structural => structural_result = Some(first_result),
                TrackKind::Content => content_result = Some(first_result),
            }
            return self.assemble_sequential(
                artifact,
                structural_result,
                content_result,
                structural_initial,
                content_initial,
                handoff.final_artifact,
                path,
                started,
                started_at,
            );
        }

        if !first_result.success {
            path.push(format!("{second} track running as rescue attempt"));
        }

        // The second track starts from the first track's best revision.
        let handoff = first_result.final_artifact.clone();
        match first {
            TrackKind::Structural => structural_result = Some(first_result),
            TrackKind::Content => content_result = Some(first_result),
        }

        let second_result = match second {
            TrackKind::Structural => {
                self.structural_controller(structural_config)
                    .run(&handoff)
                    .await
            }
            TrackKind::Content => {
                self.content_controller(content_track, content_config)
                    .run(&handoff)
                    .await
            }
        };
        path.push(describe_track(second, &second_result));

        let chosen = second_result.final_artifact.clone();
        match second {
            TrackKind::Structural => structural_result = Some(second_result),
            TrackKind::Content => content_result = Some(second_result),
        }

        self.assemble_sequential(
            artifact,
            structural_result,
            content_result,
            structural_initial,
            content_initial,
            chosen,
            path,
            started,
            started_at,
        )
    }

    /// Independent tracks from the same input; the better result wins
    async fn run_parallel(
        &self,
        artifact: &Artifact,
        original_prompt: &str,
    ) -> Result<OrchestrationResult, OrchestratorError> {
        let started_at = Utc::now();
        let started = Instant::now();
        let content_track = self.content_track(original_prompt);
        let mut path = Vec::new();

        let (structural_initial, content_initial) = self
            .initial_scores(&content_track, artifact, &mut path)
            .await;

        if structural_initial >= self.config.structural.target_score
            && content_initial >= self.config.content.target_score
        {
            return Ok(self.accept_unchanged(
                artifact,
                structural_initial,
                content_initial,
                path,
                started,
                started_at,
            ));
        }

        // No shared mutable state: each task owns its artifact copy and
        // results join at this barrier.
        let structural_controller = self.structural_controller(self.config.structural);
        let content_controller =
            self.content_controller(content_track, self.config.content);
        let structural_input = artifact.clone();
        let content_input = artifact.clone();

        let structural_handle =
            tokio::spawn(async move { structural_controller.run(&structural_input).await });
        let content_handle =
            tokio::spawn(async move { content_controller.run(&content_input).await });

        let structural_outcome = self
            .join_track(structural_handle, TrackKind::Structural, &mut path)
            .await;
        let content_outcome = self
            .join_track(content_handle, TrackKind::Content, &mut path)
            .await;

        let structural_hard_failure = structural_outcome
            .as_ref()
            .map_or(true, |r| r.phase == ConvergencePhase::Failed);
        let content_hard_failure = content_outcome
            .as_ref()
            .map_or(true, |r| r.phase == ConvergencePhase::Failed);
        if structural_hard_failure && content_hard_failure {
            return Err(OrchestratorError::AllTracksFailed {
                structural: failure_cause(structural_outcome.as_ref()),
                content: failure_cause(content_outcome.as_ref()),
            });
        }

        let structural_score = structural_outcome
            .as_ref()
            .map(comparison_score)
            .unwrap_or(0.0);
        let content_score = content_outcome.as_ref().map(comparison_score).unwrap_or(0.0);

        // Failed or timed-out tracks score 0; ties select structural.
        let winner = match (&structural_outcome, &content_outcome) {
            (Some(_), None) => TrackKind::Structural,
            (None, Some(_)) => TrackKind::Content,
            _ => {
                if content_score > structural_score {
                    TrackKind::Content
                } else {
                    TrackKind::Structural
                }
            }
        };

        if structural_hard_failure || content_hard_failure {
            let failed = if structural_hard_failure {
                TrackKind::Structural
            } else {
                TrackKind::Content
            };
            path.push(format!("{failed} track failed, {winner} track selected"));
        } else {
            path.push(format!(
                "parallel: structural {structural_score:.1} vs content {content_score:.1}, {winner} track selected"
            ));
        }

        let winning = match winner {
            TrackKind::Structural => structural_outcome.as_ref(),
            TrackKind::Content => content_outcome.as_ref(),
        };
        // The winner always has a result here: a missing result means
        // the other side was present and won the match above.
        let (chosen_artifact, success) = winning
            .map(|r| (r.final_artifact.clone(), r.success))
            .unwrap_or((artifact.clone(), false));

        Ok(OrchestrationResult {
            success,
            structural: structural_outcome,
            content: content_outcome,
            structural_score,
            content_score,
            chosen_artifact,
            improvement_path: path,
            elapsed: started.elapsed(),
            started_at,
        })
    }

    /// Await a spawned track, applying the per-track timeout
    async fn join_track(
        &self,
        mut handle: JoinHandle<ConvergenceResult>,
        kind: TrackKind,
        path: &mut Vec<String>,
    ) -> Option<ConvergenceResult> {
        let joined = match self.config.track_timeout {
            Some(limit) => match tokio::time::timeout(limit, &mut handle).await {
                Ok(joined) => joined,
                Err(_) => {
                    handle.abort();
                    path.push(format!(
                        "{kind} track timed out after {limit:?}, scored 0"
                    ));
                    return None;
                }
            },
            None => handle.await,
        };
        match joined {
            Ok(result) => Some(result),
            Err(err) => {
                path.push(format!("{kind} track task aborted: {err}, scored 0"));
                None
            }
        }
    }

    /// Build the immediate-accept result: unchanged artifact, zero work
    #[allow(clippy::too_many_arguments)]
    fn accept_unchanged(
        &self,
        artifact: &Artifact,
        structural_score: f64,
        content_score: f64,
        mut path: Vec<String>,
        started: Instant,
        started_at: chrono::DateTime<Utc>,
    ) -> OrchestrationResult {
        path.push(format!(
            "immediate accept: structural {structural_score:.1} and content {content_score:.1} already meet targets"
        ));
        tracing::info!(structural_score, content_score, "immediate accept");
        OrchestrationResult {
            success: true,
            structural: None,
            content: None,
            structural_score,
            content_score,
            chosen_artifact: artifact.clone(),
            improvement_path: path,
            elapsed: started.elapsed(),
            started_at,
        }
    }

    /// Final assembly and failure accounting for sequential mode
    #[allow(clippy::too_many_arguments)]
    fn assemble_sequential(
        &self,
        original: &Artifact,
        structural: Option<ConvergenceResult>,
        content: Option<ConvergenceResult>,
        structural_initial: f64,
        content_initial: f64,
        chosen_artifact: Artifact,
        path: Vec<String>,
        started: Instant,
        started_at: chrono::DateTime<Utc>,
    ) -> Result<OrchestrationResult, OrchestratorError> {
        let structural_hard_failure = structural
            .as_ref()
            .is_some_and(|r| r.phase == ConvergencePhase::Failed);
        let content_hard_failure = content
            .as_ref()
            .is_some_and(|r| r.phase == ConvergencePhase::Failed);
        if structural_hard_failure && content_hard_failure {
            return Err(OrchestratorError::AllTracksFailed {
                structural: failure_cause(structural.as_ref()),
                content: failure_cause(content.as_ref()),
            });
        }

        let success = structural.as_ref().map_or(true, |r| r.success)
            && content.as_ref().map_or(true, |r| r.success);
        let structural_score = structural
            .as_ref()
            .map(comparison_score)
            .unwrap_or(structural_initial);
        let content_score = content
            .as_ref()
            .map(comparison_score)
            .unwrap_or(content_initial);

        // A run where both tracks failed hard never reaches this point;
        // a single hard failure falls back to the other track's output,
        // and if nothing ran the original input is returned untouched.
        let chosen_artifact = if structural.is_none() && content.is_none() {
            original.clone()
        } else {
            chosen_artifact
        };

        Ok(OrchestrationResult {
            success,
            structural,
            content,
            structural_score,
            content_score,
            chosen_artifact,
            improvement_path: path,
            elapsed: started.elapsed(),
            started_at,
        })
    }

    /// Pre-assess both tracks for gap ordering and immediate accept
    ///
    /// An assessment failure degrades to score 0 so ordering and rescue
    /// still work; the controller run will surface the real error.
    async fn initial_scores(
        &self,
        content_track: &Arc<ContentTrack>,
        artifact: &Artifact,
        path: &mut Vec<String>,
    ) -> (f64, f64) {
        let structural = match self.structural.assess(artifact).await {
            Ok(assessment) => assessment.score,
            Err(err) => {
                path.push(format!("structural assessment failed ({err}), treated as 0"));
                0.0
            }
        };
        let content = match content_track.assess(artifact).await {
            Ok(assessment) => assessment.score,
            Err(err) => {
                path.push(format!("content assessment failed ({err}), treated as 0"));
                0.0
            }
        };
        (structural, content)
    }

    fn content_track(&self, original_prompt: &str) -> Arc<ContentTrack> {
        let mut track = ContentTrack::new(Arc::clone(&self.judge), original_prompt);
        if let Some(generator) = &self.generator {
            track = track.with_generator(Arc::clone(generator));
        }
        Arc::new(track)
    }

    fn structural_controller(
        &self,
        config: ConvergenceConfig,
    ) -> ConvergenceController<Arc<StructuralTrack>> {
        ConvergenceController::new(Arc::clone(&self.structural), config)
            .with_cancel_token(self.cancel.clone())
    }

    fn content_controller(
        &self,
        track: Arc<ContentTrack>,
        config: ConvergenceConfig,
    ) -> ConvergenceController<Arc<ContentTrack>> {
        ConvergenceController::new(track, config).with_cancel_token(self.cancel.clone())
    }
}

impl std::fmt::Debug for DualTrackOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DualTrackOrchestrator")
            .field("config", &self.config)
            .field("has_generator", &self.generator.is_some())
            .finish()
    }
}

/// One-line summary of a track run for the improvement path
fn describe_track(kind: TrackKind, result: &ConvergenceResult) -> String {
    format!(
        "{kind} track {:?}: {:.1} → {:.1} in {} iteration(s)",
        result.phase, result.initial_score, result.final_score, result.iterations_used
    )
}

/// Extract a failure cause for error reporting
fn failure_cause(result: Option<&ConvergenceResult>) -> String {
    match result {
        Some(result) if result.remaining_issues.is_empty() => "unknown failure".to_string(),
        Some(result) => result.remaining_issues.join("; "),
        None => "timed out or aborted".to_string(),
    }
}
