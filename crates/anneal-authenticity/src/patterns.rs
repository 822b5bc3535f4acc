//! Declarative pattern tables
//!
//! The scorer's knowledge is a [`PatternTable`]: severity-tiered regex
//! specs with per-pattern weights, real-implementation indicators, and an
//! approved-placeholder marker. The table is a plain value loaded at
//! construction; extending or replacing it requires no code changes in
//! the scorer.

use crate::error::PatternError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Severity tier of a placeholder pattern
///
/// Each tier has a weight band: Critical 25–40 points per occurrence,
/// Moderate 8–15, Light 3–5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Explicit simulation, embedded payloads, hypothetical code
    Critical,
    /// Generic filler and template copy
    Moderate,
    /// Work markers (TODO/FIXME)
    Light,
}

impl Severity {
    /// The tier's weight band `(low, high)`
    #[inline]
    #[must_use]
    pub fn band(&self) -> (f64, f64) {
        match self {
            Self::Critical => (25.0, 40.0),
            Self::Moderate => (8.0, 15.0),
            Self::Light => (3.0, 5.0),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Moderate => "moderate",
            Self::Light => "light",
        }
    }
}

/// One weighted placeholder pattern
#[derive(Debug, Clone)]
pub struct PatternSpec {
    pub(crate) regex: Regex,
    pub(crate) weight: f64,
    pub(crate) label: String,
}

impl PatternSpec {
    /// Compile a pattern with its per-occurrence weight
    ///
    /// # Errors
    /// Returns [`PatternError::InvalidRegex`] for malformed patterns.
    pub fn new(
        pattern: &str,
        weight: f64,
        label: impl Into<String>,
    ) -> Result<Self, PatternError> {
        let regex = Regex::new(pattern).map_err(|source| PatternError::InvalidRegex {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            regex,
            weight,
            label: label.into(),
        })
    }

    /// Human-readable label
    #[inline]
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Per-occurrence weight
    #[inline]
    #[must_use]
    pub fn weight(&self) -> f64 {
        self.weight
    }
}

/// A named group of patterns sharing one severity tier
#[derive(Debug, Clone)]
pub struct PatternCategory {
    pub(crate) name: String,
    pub(crate) severity: Severity,
    pub(crate) patterns: Vec<PatternSpec>,
}

impl PatternCategory {
    /// Create a category; every pattern weight must sit inside the tier band
    ///
    /// # Errors
    /// Returns [`PatternError::WeightOutOfBand`] for a weight outside the
    /// severity's band.
    pub fn new(
        name: impl Into<String>,
        severity: Severity,
        patterns: Vec<PatternSpec>,
    ) -> Result<Self, PatternError> {
        let (low, high) = severity.band();
        for spec in &patterns {
            if spec.weight < low || spec.weight > high {
                return Err(PatternError::WeightOutOfBand {
                    weight: spec.weight,
                    tier: severity.name(),
                    low,
                    high,
                });
            }
        }
        Ok(Self {
            name: name.into(),
            severity,
            patterns,
        })
    }

    /// Category name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Category severity tier
    #[inline]
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }
}

/// A real-implementation indicator with its per-occurrence score bonus
#[derive(Debug, Clone)]
pub struct IndicatorSpec {
    pub(crate) regex: Regex,
    pub(crate) bonus: f64,
    pub(crate) label: String,
}

impl IndicatorSpec {
    /// Compile an indicator pattern
    ///
    /// # Errors
    /// Returns [`PatternError::InvalidRegex`] for malformed patterns.
    pub fn new(
        pattern: &str,
        bonus: f64,
        label: impl Into<String>,
    ) -> Result<Self, PatternError> {
        let regex = Regex::new(pattern).map_err(|source| PatternError::InvalidRegex {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            regex,
            bonus,
            label: label.into(),
        })
    }
}

/// Default per-occurrence bonus for real-implementation indicators
pub const DEFAULT_INDICATOR_BONUS: f64 = 5.0;

/// Default acceptability threshold: `score < 20` is acceptable
pub const DEFAULT_ACCEPTANCE_THRESHOLD: f64 = 20.0;

/// Default multiplier for light-tier matches on accepted prototypes
pub const DEFAULT_PROTOTYPE_DISCOUNT: f64 = 0.3;

static DEFAULT_APPROVED_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{\s*pending:[^}]*\}\}").expect("default marker pattern is valid")
});

/// The complete declarative scoring table
#[derive(Debug, Clone)]
pub struct PatternTable {
    pub(crate) categories: Vec<PatternCategory>,
    pub(crate) indicators: Vec<IndicatorSpec>,
    pub(crate) approved_marker: Regex,
    pub(crate) prototype_discount: f64,
    pub(crate) acceptance_threshold: f64,
}

impl PatternTable {
    /// Start building a custom table (no default entries)
    #[inline]
    #[must_use]
    pub fn builder() -> PatternTableBuilder {
        PatternTableBuilder::new()
    }

    /// Remove approved "pending external resource" markers before scanning
    ///
    /// Approved placeholders must never be penalized.
    #[must_use]
    pub(crate) fn strip_approved_markers<'t>(&self, text: &'t str) -> Cow<'t, str> {
        self.approved_marker.replace_all(text, "")
    }

    /// The acceptability threshold
    #[inline]
    #[must_use]
    pub fn acceptance_threshold(&self) -> f64 {
        self.acceptance_threshold
    }
}

impl Default for PatternTable {
    /// The standard table distilled from observed generator output
    fn default() -> Self {
        // Static patterns; compilation cannot fail.
        let spec = |p: &str, w: f64, l: &str| {
            PatternSpec::new(p, w, l).expect("default pattern is valid")
        };
        let indicator = |p: &str, l: &str| {
            IndicatorSpec::new(p, DEFAULT_INDICATOR_BONUS, l).expect("default indicator is valid")
        };

        let categories = vec![
            PatternCategory {
                name: "simulated-behavior".to_string(),
                severity: Severity::Critical,
                patterns: vec![
                    spec(r"(?i)\bsimulat(?:e|es|ed|ing)\b", 30.0, "simulate phrasing"),
                    spec(
                        r"data:[a-z]+/[a-z0-9.+-]+;base64,[A-Za-z0-9+/=]{32,}",
                        35.0,
                        "embedded base64 payload",
                    ),
                    spec(
                        r"(?i)\bhere (?:you|we) would\b|\bin a real (?:implementation|app|application|system)\b",
                        25.0,
                        "hypothetical code phrasing",
                    ),
                ],
            },
            PatternCategory {
                name: "template-copy".to_string(),
                severity: Severity::Moderate,
                patterns: vec![
                    spec(r"(?i)lorem ipsum", 10.0, "filler text"),
                    spec(r"(?i)\breplace (?:this|me) with\b", 12.0, "replace-me copy"),
                    spec(r"(?i)\bexample of\b", 8.0, "example copy"),
                ],
            },
            PatternCategory {
                name: "work-markers".to_string(),
                severity: Severity::Light,
                patterns: vec![
                    spec(r"\bTODO\b", 4.0, "TODO marker"),
                    spec(r"\bFIXME\b", 5.0, "FIXME marker"),
                    spec(r"\bXXX\b", 3.0, "XXX marker"),
                ],
            },
        ];

        let indicators = vec![
            indicator(
                r"\bfetch\s*\(|\baxios\.\w+\s*\(|\breqwest::|XMLHttpRequest",
                "live network call",
            ),
            indicator(
                r"(?i)\bINSERT INTO\b|\bUPDATE \w+ SET\b|\bDELETE FROM\b|\.execute\s*\(",
                "persistence call",
            ),
            indicator(r"(?i)\b(?:bcrypt|argon2|scrypt|pbkdf2)\b", "credential hashing"),
            indicator(
                r"document\.(?:createElement|querySelector|getElementById)|localStorage\.(?:set|remove)Item",
                "DOM/storage mutation",
            ),
        ];

        Self {
            categories,
            indicators,
            approved_marker: DEFAULT_APPROVED_MARKER.clone(),
            prototype_discount: DEFAULT_PROTOTYPE_DISCOUNT,
            acceptance_threshold: DEFAULT_ACCEPTANCE_THRESHOLD,
        }
    }
}

/// Builder for custom pattern tables
#[derive(Debug)]
pub struct PatternTableBuilder {
    categories: Vec<PatternCategory>,
    indicators: Vec<IndicatorSpec>,
    approved_marker: Regex,
    prototype_discount: f64,
    acceptance_threshold: f64,
}

impl PatternTableBuilder {
    fn new() -> Self {
        Self {
            categories: Vec::new(),
            indicators: Vec::new(),
            approved_marker: DEFAULT_APPROVED_MARKER.clone(),
            prototype_discount: DEFAULT_PROTOTYPE_DISCOUNT,
            acceptance_threshold: DEFAULT_ACCEPTANCE_THRESHOLD,
        }
    }

    /// Add a pattern category
    #[inline]
    #[must_use]
    pub fn category(mut self, category: PatternCategory) -> Self {
        self.categories.push(category);
        self
    }

    /// Add a real-implementation indicator
    #[inline]
    #[must_use]
    pub fn indicator(mut self, indicator: IndicatorSpec) -> Self {
        self.indicators.push(indicator);
        self
    }

    /// Override the approved-placeholder marker syntax
    ///
    /// # Errors
    /// Returns [`PatternError::InvalidRegex`] for malformed patterns.
    pub fn approved_marker(mut self, pattern: &str) -> Result<Self, PatternError> {
        self.approved_marker =
            Regex::new(pattern).map_err(|source| PatternError::InvalidRegex {
                pattern: pattern.to_string(),
                source,
            })?;
        Ok(self)
    }

    /// Override the light-tier prototype discount
    #[inline]
    #[must_use]
    pub fn prototype_discount(mut self, discount: f64) -> Self {
        self.prototype_discount = discount;
        self
    }

    /// Override the acceptability threshold
    #[inline]
    #[must_use]
    pub fn acceptance_threshold(mut self, threshold: f64) -> Self {
        self.acceptance_threshold = threshold;
        self
    }

    /// Freeze the table
    #[inline]
    #[must_use]
    pub fn build(self) -> PatternTable {
        PatternTable {
            categories: self.categories,
            indicators: self.indicators,
            approved_marker: self.approved_marker,
            prototype_discount: self.prototype_discount,
            acceptance_threshold: self.acceptance_threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_has_three_tiers() {
        let table = PatternTable::default();
        let severities: Vec<_> = table.categories.iter().map(|c| c.severity()).collect();
        assert!(severities.contains(&Severity::Critical));
        assert!(severities.contains(&Severity::Moderate));
        assert!(severities.contains(&Severity::Light));
    }

    #[test]
    fn default_weights_sit_inside_bands() {
        let table = PatternTable::default();
        for category in &table.categories {
            let (low, high) = category.severity().band();
            for spec in &category.patterns {
                assert!(
                    spec.weight() >= low && spec.weight() <= high,
                    "{} weight {} outside band",
                    spec.label(),
                    spec.weight()
                );
            }
        }
    }

    #[test]
    fn category_rejects_out_of_band_weight() {
        let result = PatternCategory::new(
            "bad",
            Severity::Light,
            vec![PatternSpec::new(r"\bHACK\b", 30.0, "hack").unwrap()],
        );
        assert!(matches!(result, Err(PatternError::WeightOutOfBand { .. })));
    }

    #[test]
    fn spec_rejects_invalid_regex() {
        let result = PatternSpec::new("[unclosed", 4.0, "broken");
        assert!(matches!(result, Err(PatternError::InvalidRegex { .. })));
    }

    #[test]
    fn strip_approved_markers_removes_pending_syntax() {
        let table = PatternTable::default();
        let stripped =
            table.strip_approved_markers("before {{pending: hero image TODO}} after");
        assert_eq!(stripped, "before  after");
    }

    #[test]
    fn builder_overrides_marker_and_threshold() {
        let table = PatternTable::builder()
            .approved_marker(r"<!-- pending [^>]* -->")
            .unwrap()
            .acceptance_threshold(10.0)
            .build();
        assert_eq!(table.acceptance_threshold(), 10.0);
        assert_eq!(
            table.strip_approved_markers("x <!-- pending asset --> y"),
            "x  y"
        );
    }
}
