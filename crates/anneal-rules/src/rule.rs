//! Rule and finding types
//!
//! A [`Rule`] pairs a predicate (does the artifact satisfy this check?)
//! with an optional corrector (rewrite the artifact so it does). Rules are
//! registered once per engine instance and are immutable for the duration
//! of a run.

use crate::error::CorrectionError;
use anneal_artifact::Artifact;
use serde::{Deserialize, Serialize};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// Rule priority, from blocking to cosmetic
///
/// Priority decides which bucket of the validation report a failing
/// finding lands in: Critical → critical issues, High/Medium → warnings,
/// Low → suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Must be fixed before the artifact is usable
    Critical,
    /// Should be fixed; artifact is degraded without it
    High,
    /// Worth fixing when convenient
    Medium,
    /// Cosmetic or stylistic
    Low,
}

impl Priority {
    /// Whether a failing finding of this priority is a critical issue
    #[inline]
    #[must_use]
    pub fn is_critical(&self) -> bool {
        matches!(self, Self::Critical)
    }
}

/// The per-rule pass/fail result with diagnostic detail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Id of the rule that produced this finding
    pub rule_id: String,
    /// Whether the artifact satisfied the rule
    pub passed: bool,
    /// Diagnostic message (empty on pass)
    pub message: String,
    /// Concrete remediation hints
    pub suggestions: Vec<String>,
    /// Whether the owning rule carries a corrector
    pub auto_fix_available: bool,
}

impl Finding {
    /// Create a passing finding
    ///
    /// A rule whose precondition does not apply to the artifact must
    /// report a pass (vacuous truth), never penalizing unrelated content.
    #[inline]
    #[must_use]
    pub fn pass() -> Self {
        Self {
            rule_id: String::new(),
            passed: true,
            message: String::new(),
            suggestions: Vec::new(),
            auto_fix_available: false,
        }
    }

    /// Create a failing finding with a diagnostic message
    #[inline]
    #[must_use]
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            rule_id: String::new(),
            passed: false,
            message: message.into(),
            suggestions: Vec::new(),
            auto_fix_available: false,
        }
    }

    /// Attach a remediation suggestion
    #[inline]
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Stamp the owning rule's identity onto the finding
    ///
    /// The engine calls this after the predicate returns so predicate
    /// authors never have to repeat the rule id.
    #[inline]
    #[must_use]
    pub(crate) fn for_rule(mut self, rule: &Rule) -> Self {
        self.rule_id = rule.id().to_string();
        self.auto_fix_available = rule.has_corrector();
        self
    }
}

type Predicate = Arc<dyn Fn(&Artifact) -> Finding + Send + Sync>;
type CorrectorFn = Arc<dyn Fn(&Artifact) -> Result<Artifact, CorrectionError> + Send + Sync>;

/// A named, prioritized structural check with an optional auto-corrector
pub struct Rule {
    id: String,
    category: String,
    priority: Priority,
    predicate: Predicate,
    corrector: Option<CorrectorFn>,
}

impl Rule {
    /// Create a new rule from a predicate
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        category: impl Into<String>,
        priority: Priority,
        predicate: impl Fn(&Artifact) -> Finding + Send + Sync + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            category: category.into(),
            priority,
            predicate: Arc::new(predicate),
            corrector: None,
        }
    }

    /// Attach a corrector (builder style)
    ///
    /// # Contract
    /// A corrector must be idempotent for its own rule: applied to an
    /// artifact already satisfying the rule it must be a textual no-op.
    #[must_use]
    pub fn with_corrector(
        mut self,
        corrector: impl Fn(&Artifact) -> Result<Artifact, CorrectionError> + Send + Sync + 'static,
    ) -> Self {
        self.corrector = Some(Arc::new(corrector));
        self
    }

    /// Rule id
    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Rule category
    #[inline]
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Rule priority
    #[inline]
    #[must_use]
    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// Whether the rule carries a corrector
    #[inline]
    #[must_use]
    pub fn has_corrector(&self) -> bool {
        self.corrector.is_some()
    }

    /// Run the predicate, converting panics into failing findings
    ///
    /// One misbehaving rule must never abort the engine run.
    pub(crate) fn check(&self, artifact: &Artifact) -> Finding {
        match catch_unwind(AssertUnwindSafe(|| (self.predicate)(artifact))) {
            Ok(finding) => finding.for_rule(self),
            Err(payload) => Finding::fail(format!(
                "predicate panicked: {}",
                panic_message(payload.as_ref())
            ))
            .for_rule(self),
        }
    }

    /// Run the corrector, converting panics into [`CorrectionError`]
    ///
    /// Returns `None` if the rule carries no corrector.
    pub(crate) fn apply_fix(
        &self,
        artifact: &Artifact,
    ) -> Option<Result<Artifact, CorrectionError>> {
        let corrector = self.corrector.as_ref()?;
        let result = catch_unwind(AssertUnwindSafe(|| corrector(artifact)));
        Some(match result {
            Ok(outcome) => outcome,
            Err(payload) => Err(CorrectionError::Panicked(
                panic_message(payload.as_ref()).to_string(),
            )),
        })
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("category", &self.category)
            .field("priority", &self.priority)
            .field("has_corrector", &self.has_corrector())
            .finish()
    }
}

/// Best-effort extraction of a panic payload message
fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "unknown panic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_artifact() -> Artifact {
        Artifact::new("<p>hello</p>")
    }

    #[test]
    fn finding_pass_defaults() {
        let finding = Finding::pass();
        assert!(finding.passed);
        assert!(finding.message.is_empty());
    }

    #[test]
    fn finding_fail_with_suggestion() {
        let finding = Finding::fail("missing id").with_suggestion("add id attribute");
        assert!(!finding.passed);
        assert_eq!(finding.suggestions.len(), 1);
    }

    #[test]
    fn check_stamps_rule_identity() {
        let rule = Rule::new("p-present", "structure", Priority::High, |a| {
            if a.text().contains("<p>") {
                Finding::pass()
            } else {
                Finding::fail("no paragraph")
            }
        })
        .with_corrector(|a| Ok(a.with_text(format!("<p></p>{}", a.text()))));

        let finding = rule.check(&sample_artifact());
        assert!(finding.passed);
        assert_eq!(finding.rule_id, "p-present");
        assert!(finding.auto_fix_available);
    }

    #[test]
    fn check_catches_panicking_predicate() {
        let rule = Rule::new("panics", "broken", Priority::Low, |_| {
            panic!("predicate exploded")
        });

        let finding = rule.check(&sample_artifact());
        assert!(!finding.passed);
        assert!(finding.message.contains("predicate exploded"));
        assert_eq!(finding.rule_id, "panics");
    }

    #[test]
    fn apply_fix_none_without_corrector() {
        let rule = Rule::new("check-only", "structure", Priority::Low, |_| Finding::pass());
        assert!(rule.apply_fix(&sample_artifact()).is_none());
    }

    #[test]
    fn apply_fix_catches_panicking_corrector() {
        let rule = Rule::new("bad-fix", "structure", Priority::Low, |_| {
            Finding::fail("always")
        })
        .with_corrector(|_| panic!("corrector exploded"));

        let result = rule.apply_fix(&sample_artifact()).unwrap();
        assert!(matches!(result, Err(CorrectionError::Panicked(_))));
    }

    #[test]
    fn priority_ordering() {
        assert!(Priority::Critical < Priority::High);
        assert!(Priority::High < Priority::Low);
        assert!(Priority::Critical.is_critical());
        assert!(!Priority::Medium.is_critical());
    }
}
