//! Deterministic auto-correction
//!
//! Applies the corrector of every failing, autofixable rule exactly once,
//! in rule-registration order. A corrector that fails, panics, or yields
//! no textual change is skipped and not counted as applied.

use crate::engine::RuleSet;
use crate::report::ValidationReport;
use anneal_artifact::Artifact;

/// Result of one correction pass
#[derive(Debug, Clone)]
pub struct CorrectionOutcome {
    /// The corrected artifact (equal to the input if nothing applied)
    pub fixed: Artifact,
    /// Ids of rules whose correctors actually changed the text
    pub applied: Vec<String>,
}

impl CorrectionOutcome {
    /// Whether any fix was applied
    #[inline]
    #[must_use]
    pub fn changed(&self) -> bool {
        !self.applied.is_empty()
    }
}

/// Applies pending auto-fixes from a validation report
///
/// Stateless; order and outcome are fully determined by
/// `(rule set, artifact, report)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Corrector;

impl Corrector {
    /// Create a new corrector
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Apply every available auto-fix once, in registration order
    ///
    /// Later correctors see earlier correctors' output. Skipped fixes
    /// (corrector error, panic, or textual no-op) leave the artifact as
    /// of that point untouched.
    pub fn apply(
        &self,
        rules: &RuleSet,
        artifact: &Artifact,
        report: &ValidationReport,
    ) -> CorrectionOutcome {
        let mut current = artifact.clone();
        let mut applied = Vec::new();

        for rule in rules.iter() {
            if !report.auto_fixes_available.iter().any(|id| id == rule.id()) {
                continue;
            }
            let Some(result) = rule.apply_fix(&current) else {
                continue;
            };
            match result {
                Ok(fixed) if fixed.same_text(&current) => {
                    tracing::debug!(rule = rule.id(), "corrector produced no change, skipped");
                }
                Ok(fixed) => {
                    tracing::debug!(
                        rule = rule.id(),
                        from = %current.revision().short(),
                        to = %fixed.revision().short(),
                        "fix applied"
                    );
                    current = fixed;
                    applied.push(rule.id().to_string());
                }
                Err(err) => {
                    tracing::warn!(rule = rule.id(), error = %err, "fix skipped");
                }
            }
        }

        CorrectionOutcome {
            fixed: current,
            applied,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::RuleEngine;
    use crate::error::CorrectionError;
    use crate::rule::{Finding, Priority, Rule};
    use pretty_assertions::assert_eq;

    /// Rule: every `<img` tag carries an `id=` attribute; corrector adds one.
    fn img_id_rule() -> Rule {
        Rule::new("img-has-id", "structure", Priority::High, |a| {
            let missing = a
                .text()
                .match_indices("<img")
                .filter(|(idx, _)| {
                    let tag_end = a.text()[*idx..].find('>').map_or(a.text().len(), |e| idx + e);
                    !a.text()[*idx..tag_end].contains("id=")
                })
                .count();
            if missing == 0 {
                Finding::pass()
            } else {
                Finding::fail(format!("{missing} image(s) without id"))
                    .with_suggestion("add an id attribute to every image")
            }
        })
        .with_corrector(|a| {
            let mut out = String::with_capacity(a.len());
            let mut rest = a.text();
            let mut counter = 0usize;
            while let Some(idx) = rest.find("<img") {
                let tag_end = rest[idx..].find('>').map_or(rest.len(), |e| idx + e);
                out.push_str(&rest[..idx]);
                let tag = &rest[idx..tag_end];
                if tag.contains("id=") {
                    out.push_str(tag);
                } else {
                    counter += 1;
                    out.push_str("<img id=\"img-");
                    out.push_str(&counter.to_string());
                    out.push('"');
                    out.push_str(&tag[4..]);
                }
                rest = &rest[tag_end..];
            }
            out.push_str(rest);
            Ok(a.with_text(out))
        })
    }

    fn engine_with(rules: Vec<Rule>) -> RuleEngine {
        RuleEngine::new(RuleSet::builder().rules(rules).build().unwrap())
    }

    #[test]
    fn applies_fix_for_failing_rule() {
        let engine = engine_with(vec![img_id_rule()]);
        let artifact = Artifact::new("<img src=\"a.png\"><img src=\"b.png\"><img src=\"c.png\">");

        let report = engine.validate(&artifact);
        assert_eq!(report.failing_checks(), 1);
        assert_eq!(report.auto_fixes_available, vec!["img-has-id"]);

        let outcome = Corrector::new().apply(engine.rules(), &artifact, &report);
        assert_eq!(outcome.applied, vec!["img-has-id"]);

        let after = engine.validate(&outcome.fixed);
        assert_eq!(after.failing_checks(), 0);
        assert_eq!(after.overall_score, 100.0);
    }

    #[test]
    fn corrector_is_noop_on_satisfied_rule() {
        let engine = engine_with(vec![img_id_rule()]);
        let artifact = Artifact::new("<img id=\"hero\" src=\"a.png\">");

        let report = engine.validate(&artifact);
        assert!(report.auto_fixes_available.is_empty());

        let outcome = Corrector::new().apply(engine.rules(), &artifact, &report);
        assert!(!outcome.changed());
        assert!(outcome.fixed.same_text(&artifact));
    }

    #[test]
    fn reaches_fixed_point_within_two_passes() {
        let engine = engine_with(vec![img_id_rule()]);
        let corrector = Corrector::new();
        let artifact = Artifact::new("<img src=\"a.png\">");

        let first = corrector.apply(engine.rules(), &artifact, &engine.validate(&artifact));
        let second = corrector.apply(
            engine.rules(),
            &first.fixed,
            &engine.validate(&first.fixed),
        );

        assert!(first.changed());
        assert!(!second.changed());
        assert!(second.fixed.same_text(&first.fixed));
    }

    #[test]
    fn failing_corrector_is_skipped() {
        let stubborn = Rule::new("stubborn", "structure", Priority::High, |_| {
            Finding::fail("always fails")
        })
        .with_corrector(|_| Err(CorrectionError::failed("cannot fix")));
        let engine = engine_with(vec![stubborn, img_id_rule()]);
        let artifact = Artifact::new("<img src=\"a.png\">");

        let report = engine.validate(&artifact);
        let outcome = Corrector::new().apply(engine.rules(), &artifact, &report);

        // The broken corrector is skipped; the image fix still lands.
        assert_eq!(outcome.applied, vec!["img-has-id"]);
    }

    #[test]
    fn noop_corrector_not_counted_as_applied() {
        let lazy = Rule::new("lazy", "structure", Priority::Low, |_| {
            Finding::fail("always fails")
        })
        .with_corrector(|a| Ok(a.clone()));
        let engine = engine_with(vec![lazy]);
        let artifact = Artifact::new("unchanged");

        let report = engine.validate(&artifact);
        let outcome = Corrector::new().apply(engine.rules(), &artifact, &report);

        assert!(!outcome.changed());
        assert!(outcome.fixed.same_text(&artifact));
    }

    #[test]
    fn fixes_apply_in_registration_order() {
        let append = |id: &str, suffix: &'static str| {
            Rule::new(id, "order", Priority::Low, move |a| {
                if a.text().ends_with(suffix) {
                    Finding::pass()
                } else {
                    Finding::fail("missing suffix")
                }
            })
            .with_corrector(move |a| Ok(a.with_text(format!("{}{}", a.text(), suffix))))
        };
        // Both fail initially; "first" must run before "second".
        let engine = engine_with(vec![append("first", "-a"), append("second", "-b")]);
        let artifact = Artifact::new("base");

        let report = engine.validate(&artifact);
        let outcome = Corrector::new().apply(engine.rules(), &artifact, &report);

        assert_eq!(outcome.applied, vec!["first", "second"]);
        assert_eq!(outcome.fixed.text(), "base-a-b");
    }
}
