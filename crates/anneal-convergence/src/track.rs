//! Quality track abstraction
//!
//! A [`QualityTrack`] is one independently scored quality dimension:
//! something that can assess an artifact on a 0–100 scale and optionally
//! refine it. The convergence controller only ever talks to this trait;
//! external collaborators (judges, generators) are wired in behind it by
//! higher layers.

use anneal_artifact::Artifact;
use anneal_rules::{Corrector, RuleEngine};
use async_trait::async_trait;

/// One track's normalized verdict for an artifact revision
#[derive(Debug, Clone, PartialEq)]
pub struct TrackAssessment {
    /// Normalized score on the track's own 0–100 scale
    pub score: f64,
    /// Human-readable outstanding issues
    pub issues: Vec<String>,
}

impl TrackAssessment {
    /// Create an assessment
    #[inline]
    #[must_use]
    pub fn new(score: f64, issues: Vec<String>) -> Self {
        Self { score, issues }
    }

    /// An assessment with no outstanding issues
    #[inline]
    #[must_use]
    pub fn clean(score: f64) -> Self {
        Self {
            score,
            issues: Vec::new(),
        }
    }
}

/// One refinement step's output
#[derive(Debug, Clone)]
pub struct Refinement {
    /// The new artifact revision
    pub artifact: Artifact,
    /// Labels of the fixes that produced it
    pub applied: Vec<String>,
}

/// Errors raised inside a track
///
/// A track error converts the convergence run to the `Failed` phase; it
/// never propagates as a panic or poisons other tracks.
#[derive(Debug, thiserror::Error)]
pub enum TrackError {
    /// Assessing the artifact failed
    #[error("assessment failed: {0}")]
    Assessment(String),

    /// Refining the artifact failed
    #[error("refinement failed: {0}")]
    Refinement(String),

    /// An external collaborator failed
    #[error("external collaborator failed: {0}")]
    External(#[from] anyhow::Error),
}

/// An independently scored quality dimension
#[async_trait]
pub trait QualityTrack: Send + Sync {
    /// Track name for logging and result records
    fn name(&self) -> &'static str;

    /// Score an artifact revision on this track's 0–100 scale
    async fn assess(&self, artifact: &Artifact) -> Result<TrackAssessment, TrackError>;

    /// Attempt one refinement step
    ///
    /// Returns `Ok(None)` when the track has nothing further to offer
    /// (no fixable findings, no generator wired in); the controller
    /// treats that as exhaustion, not failure.
    async fn refine(
        &self,
        artifact: &Artifact,
        assessment: &TrackAssessment,
    ) -> Result<Option<Refinement>, TrackError>;
}

// Tracks are shared across spawned tasks in parallel orchestration.
#[async_trait]
impl<T: QualityTrack + ?Sized> QualityTrack for std::sync::Arc<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    async fn assess(&self, artifact: &Artifact) -> Result<TrackAssessment, TrackError> {
        (**self).assess(artifact).await
    }

    async fn refine(
        &self,
        artifact: &Artifact,
        assessment: &TrackAssessment,
    ) -> Result<Option<Refinement>, TrackError> {
        (**self).refine(artifact, assessment).await
    }
}

/// The structural quality dimension: rule engine + corrector
///
/// Assessment is the rule engine's overall score; refinement is one
/// deterministic correction pass over the failing, autofixable rules.
#[derive(Debug)]
pub struct StructuralTrack {
    engine: RuleEngine,
    corrector: Corrector,
}

impl StructuralTrack {
    /// Create a structural track over a rule engine
    #[inline]
    #[must_use]
    pub fn new(engine: RuleEngine) -> Self {
        Self {
            engine,
            corrector: Corrector::new(),
        }
    }

    /// The underlying rule engine
    #[inline]
    #[must_use]
    pub fn engine(&self) -> &RuleEngine {
        &self.engine
    }
}

#[async_trait]
impl QualityTrack for StructuralTrack {
    fn name(&self) -> &'static str {
        "structural"
    }

    async fn assess(&self, artifact: &Artifact) -> Result<TrackAssessment, TrackError> {
        let report = self.engine.validate(artifact);
        let issues = report
            .failing_findings()
            .map(|f| format!("{}: {}", f.rule_id, f.message))
            .collect();
        Ok(TrackAssessment::new(report.overall_score, issues))
    }

    async fn refine(
        &self,
        artifact: &Artifact,
        _assessment: &TrackAssessment,
    ) -> Result<Option<Refinement>, TrackError> {
        let report = self.engine.validate(artifact);
        if !report.has_auto_fixes() {
            return Ok(None);
        }
        let outcome = self.corrector.apply(self.engine.rules(), artifact, &report);
        if !outcome.changed() {
            return Ok(None);
        }
        Ok(Some(Refinement {
            artifact: outcome.fixed,
            applied: outcome.applied,
        }))
    }
}
