//! External collaborator interfaces
//!
//! The content-authenticity track is backed by two collaborators this
//! engine consumes but does not implement: a [`Judge`] that scores
//! content fidelity against the original request, and a [`Generator`]
//! that can produce a fresh artifact revision from a prompt. Both are
//! opaque at the boundary, so they return `anyhow::Result`.

use anneal_artifact::Artifact;
use async_trait::async_trait;

/// A judge's verdict for one artifact revision
#[derive(Debug, Clone, PartialEq)]
pub struct JudgeVerdict {
    /// Content fidelity score on a 0–100 scale
    pub score: f64,
    /// Outstanding content findings
    pub findings: Vec<String>,
}

impl JudgeVerdict {
    /// Create a verdict
    #[inline]
    #[must_use]
    pub fn new(score: f64, findings: Vec<String>) -> Self {
        Self { score, findings }
    }

    /// A verdict with no findings
    #[inline]
    #[must_use]
    pub fn clean(score: f64) -> Self {
        Self {
            score,
            findings: Vec::new(),
        }
    }
}

/// Scores content fidelity against the original request
///
/// Implementations are expected to normalize to a 0–100 scale;
/// out-of-range values are clamped on receipt.
#[async_trait]
pub trait Judge: Send + Sync {
    /// Evaluate an artifact against the prompt that produced it
    async fn evaluate(
        &self,
        artifact: &Artifact,
        original_prompt: &str,
    ) -> anyhow::Result<JudgeVerdict>;
}

/// Context handed to a generator on regeneration
#[derive(Debug, Clone, Default)]
pub struct GenerationContext {
    /// Findings from the most recent judge verdict
    pub prior_findings: Vec<String>,
    /// Declared domain of the artifact, if any
    pub domain: Option<String>,
}

/// Produces a fresh artifact revision from a prompt
///
/// Consumed by the content track's refinement step; the convergence
/// controller itself never calls a generator directly.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Regenerate the artifact, guided by prior findings
    async fn regenerate(
        &self,
        prompt: &str,
        context: &GenerationContext,
    ) -> anyhow::Result<Artifact>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_clean_has_no_findings() {
        let verdict = JudgeVerdict::clean(88.0);
        assert_eq!(verdict.score, 88.0);
        assert!(verdict.findings.is_empty());
    }
}
