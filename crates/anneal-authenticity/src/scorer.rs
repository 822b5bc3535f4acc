//! Authenticity scoring
//!
//! Estimates how much of an artifact is placeholder/simulated versus
//! genuinely implemented. Pure: same artifact, context, and table always
//! produce the same report, and scoring never fails.

use crate::patterns::{PatternTable, Severity};
use anneal_artifact::Artifact;
use serde::{Deserialize, Serialize};

/// Caller-supplied scanning context
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanContext {
    /// The artifact was accepted as a prototype/template; light-tier
    /// matches (work markers) are discounted
    pub accepted_prototype: bool,
}

impl ScanContext {
    /// Create a neutral context
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive the context from artifact metadata
    #[inline]
    #[must_use]
    pub fn for_artifact(artifact: &Artifact) -> Self {
        Self {
            accepted_prototype: artifact.metadata().prototype,
        }
    }

    /// Mark the artifact as an accepted prototype
    #[inline]
    #[must_use]
    pub fn prototype(mut self) -> Self {
        self.accepted_prototype = true;
        self
    }
}

/// One matched placeholder pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthenticityIssue {
    /// Owning category name
    pub category: String,
    /// Severity tier of the match
    pub severity: Severity,
    /// Label of the pattern that matched
    pub matched_pattern: String,
    /// Excerpt of the matched text (truncated)
    pub excerpt: String,
    /// Points this occurrence contributed
    pub weight: f64,
}

/// The scorer's verdict for one artifact revision
///
/// Lower is better: 0 means no placeholder signals at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthenticityReport {
    /// Total placeholder score, clamped to ≥ 0
    pub score: f64,
    /// Every pattern occurrence that contributed
    pub issues: Vec<AuthenticityIssue>,
    /// Whether the score sits under the table's acceptance threshold
    pub is_acceptable: bool,
}

impl AuthenticityReport {
    /// Issues of a given severity
    pub fn issues_with_severity(
        &self,
        severity: Severity,
    ) -> impl Iterator<Item = &AuthenticityIssue> {
        self.issues.iter().filter(move |i| i.severity == severity)
    }
}

const EXCERPT_LIMIT: usize = 60;

/// Pattern-based placeholder detector
///
/// Scans an artifact against a [`PatternTable`] and produces an
/// [`AuthenticityReport`]. Recognized real-implementation indicators
/// reduce the raw score; approved placeholder markers are stripped before
/// scanning so they are never penalized.
#[derive(Debug, Clone, Default)]
pub struct AuthenticityScorer {
    table: PatternTable,
}

impl AuthenticityScorer {
    /// Create a scorer over a custom table
    #[inline]
    #[must_use]
    pub fn new(table: PatternTable) -> Self {
        Self { table }
    }

    /// The scorer's table
    #[inline]
    #[must_use]
    pub fn table(&self) -> &PatternTable {
        &self.table
    }

    /// Score one artifact revision
    ///
    /// Never fails: an artifact with zero matches yields score 0, fully
    /// acceptable.
    #[must_use]
    pub fn score(&self, artifact: &Artifact, context: &ScanContext) -> AuthenticityReport {
        let text = self.table.strip_approved_markers(artifact.text());

        let mut score = 0.0;
        let mut issues = Vec::new();

        for category in &self.table.categories {
            for spec in &category.patterns {
                for m in spec.regex.find_iter(&text) {
                    let weight = match category.severity {
                        Severity::Light if context.accepted_prototype => {
                            spec.weight * self.table.prototype_discount
                        }
                        _ => spec.weight,
                    };
                    score += weight;
                    issues.push(AuthenticityIssue {
                        category: category.name.clone(),
                        severity: category.severity,
                        matched_pattern: spec.label.clone(),
                        excerpt: truncate_excerpt(m.as_str()),
                        weight,
                    });
                }
            }
        }

        let raw = score;
        for indicator in &self.table.indicators {
            let occurrences = indicator.regex.find_iter(&text).count();
            if occurrences > 0 {
                tracing::debug!(
                    indicator = %indicator.label,
                    occurrences,
                    "real-implementation indicator found"
                );
                score -= indicator.bonus * occurrences as f64;
            }
        }

        // Indicator bonuses can overshoot; the reported score never goes
        // negative.
        let score = score.max(0.0);
        let is_acceptable = score < self.table.acceptance_threshold;

        tracing::debug!(
            raw,
            score,
            is_acceptable,
            issues = issues.len(),
            revision = %artifact.revision().short(),
            "authenticity scored"
        );

        AuthenticityReport {
            score,
            issues,
            is_acceptable,
        }
    }
}

/// Truncate a matched excerpt on a char boundary
fn truncate_excerpt(matched: &str) -> String {
    if matched.chars().count() <= EXCERPT_LIMIT {
        matched.to_string()
    } else {
        let mut excerpt: String = matched.chars().take(EXCERPT_LIMIT).collect();
        excerpt.push('…');
        excerpt
    }
}
