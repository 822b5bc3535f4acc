//! The content-authenticity quality track
//!
//! Wraps the external [`Judge`] (and optionally a [`Generator`]) behind
//! the [`QualityTrack`] seam so the convergence controller never touches
//! collaborators directly. When no external judge is wired in,
//! [`AuthenticityJudge`] provides a local, deterministic fallback backed
//! by the pattern scorer.

use crate::external::{GenerationContext, Generator, Judge, JudgeVerdict};
use anneal_artifact::Artifact;
use anneal_authenticity::{AuthenticityScorer, ScanContext};
use anneal_convergence::{QualityTrack, Refinement, TrackAssessment, TrackError};
use async_trait::async_trait;
use std::sync::Arc;

/// Local judge backed by the placeholder pattern scorer
///
/// Scores `100 − placeholder_score` (clamped to the 0–100 scale), so an
/// artifact free of placeholder signals judges as 100. Deterministic and
/// infallible, which makes it the default when no external judge is
/// configured.
#[derive(Debug, Clone, Default)]
pub struct AuthenticityJudge {
    scorer: AuthenticityScorer,
}

impl AuthenticityJudge {
    /// Create a judge over a custom scorer
    #[inline]
    #[must_use]
    pub fn new(scorer: AuthenticityScorer) -> Self {
        Self { scorer }
    }
}

#[async_trait]
impl Judge for AuthenticityJudge {
    async fn evaluate(
        &self,
        artifact: &Artifact,
        _original_prompt: &str,
    ) -> anyhow::Result<JudgeVerdict> {
        let report = self
            .scorer
            .score(artifact, &ScanContext::for_artifact(artifact));
        let findings = report
            .issues
            .iter()
            .map(|i| format!("{}: {} ({})", i.category, i.matched_pattern, i.excerpt))
            .collect();
        Ok(JudgeVerdict::new((100.0 - report.score).clamp(0.0, 100.0), findings))
    }
}

/// The content-authenticity quality dimension
///
/// Assessment comes from the judge; refinement regenerates through the
/// generator when one is wired in. Without a generator the track is
/// assess-only: it converges or exhausts on the judged score and never
/// fabricates refinements.
pub struct ContentTrack {
    judge: Arc<dyn Judge>,
    generator: Option<Arc<dyn Generator>>,
    original_prompt: String,
}

impl ContentTrack {
    /// Create a content track for one original prompt
    #[must_use]
    pub fn new(judge: Arc<dyn Judge>, original_prompt: impl Into<String>) -> Self {
        Self {
            judge,
            generator: None,
            original_prompt: original_prompt.into(),
        }
    }

    /// Wire in a generator for refinement (builder style)
    #[must_use]
    pub fn with_generator(mut self, generator: Arc<dyn Generator>) -> Self {
        self.generator = Some(generator);
        self
    }
}

impl std::fmt::Debug for ContentTrack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentTrack")
            .field("original_prompt", &self.original_prompt)
            .field("has_generator", &self.generator.is_some())
            .finish()
    }
}

#[async_trait]
impl QualityTrack for ContentTrack {
    fn name(&self) -> &'static str {
        "content"
    }

    async fn assess(&self, artifact: &Artifact) -> Result<TrackAssessment, TrackError> {
        let verdict = self
            .judge
            .evaluate(artifact, &self.original_prompt)
            .await
            .map_err(TrackError::External)?;
        Ok(TrackAssessment::new(
            verdict.score.clamp(0.0, 100.0),
            verdict.findings,
        ))
    }

    async fn refine(
        &self,
        artifact: &Artifact,
        assessment: &TrackAssessment,
    ) -> Result<Option<Refinement>, TrackError> {
        let Some(generator) = &self.generator else {
            return Ok(None);
        };
        let context = GenerationContext {
            prior_findings: assessment.issues.clone(),
            domain: artifact.metadata().domain.clone(),
        };
        let regenerated = generator
            .regenerate(&self.original_prompt, &context)
            .await
            .map_err(TrackError::External)?;
        if regenerated.same_text(artifact) {
            return Ok(None);
        }
        Ok(Some(Refinement {
            artifact: regenerated,
            applied: vec!["regenerated".to_string()],
        }))
    }
}
