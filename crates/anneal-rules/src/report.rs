//! Validation report aggregation
//!
//! Partitions per-rule findings into a single [`ValidationReport`] with an
//! overall score and priority buckets.

use crate::rule::{Finding, Priority};
use serde::{Deserialize, Serialize};

/// Aggregated result of running every rule against one artifact revision
///
/// # Invariants
/// - `overall_score` is always within `[0, 100]`
/// - `passed_checks + failing findings == total_checks`
/// - identical `(artifact, rule set)` input produces an identical report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// `round(100 × passed / total)`; 100 for an empty rule set
    pub overall_score: f64,
    /// Number of rules executed
    pub total_checks: usize,
    /// Number of passing findings
    pub passed_checks: usize,
    /// Failing findings from Critical-priority rules
    pub critical_issues: Vec<Finding>,
    /// Failing findings from High/Medium-priority rules
    pub warnings: Vec<Finding>,
    /// Failing findings from Low-priority rules
    pub suggestions: Vec<Finding>,
    /// Ids of failing rules that carry a corrector, in registration order
    pub auto_fixes_available: Vec<String>,
}

impl ValidationReport {
    /// Aggregate findings produced in rule-registration order
    #[must_use]
    pub(crate) fn from_findings(findings: Vec<(Priority, Finding)>) -> Self {
        let total_checks = findings.len();
        let mut passed_checks = 0;
        let mut critical_issues = Vec::new();
        let mut warnings = Vec::new();
        let mut suggestions = Vec::new();
        let mut auto_fixes_available = Vec::new();

        for (priority, finding) in findings {
            if finding.passed {
                passed_checks += 1;
                continue;
            }
            if finding.auto_fix_available {
                auto_fixes_available.push(finding.rule_id.clone());
            }
            match priority {
                Priority::Critical => critical_issues.push(finding),
                Priority::High | Priority::Medium => warnings.push(finding),
                Priority::Low => suggestions.push(finding),
            }
        }

        let overall_score = if total_checks == 0 {
            100.0
        } else {
            (100.0 * passed_checks as f64 / total_checks as f64).round()
        };

        Self {
            overall_score,
            total_checks,
            passed_checks,
            critical_issues,
            warnings,
            suggestions,
            auto_fixes_available,
        }
    }

    /// Number of failing findings across all buckets
    #[inline]
    #[must_use]
    pub fn failing_checks(&self) -> usize {
        self.total_checks - self.passed_checks
    }

    /// Whether any Critical-priority rule failed
    #[inline]
    #[must_use]
    pub fn has_critical_issues(&self) -> bool {
        !self.critical_issues.is_empty()
    }

    /// Whether any failing rule can be auto-fixed
    #[inline]
    #[must_use]
    pub fn has_auto_fixes(&self) -> bool {
        !self.auto_fixes_available.is_empty()
    }

    /// Whether the score meets a target
    #[inline]
    #[must_use]
    pub fn meets(&self, target_score: f64) -> bool {
        self.overall_score >= target_score
    }

    /// All failing findings, critical first
    pub fn failing_findings(&self) -> impl Iterator<Item = &Finding> {
        self.critical_issues
            .iter()
            .chain(self.warnings.iter())
            .chain(self.suggestions.iter())
    }
}
