//! Rule set registration and engine execution
//!
//! A [`RuleSet`] is built once, preserves registration order, and is
//! immutable for the duration of a run. The [`RuleEngine`] executes every
//! rule against an artifact and aggregates a [`ValidationReport`].

use crate::error::RuleSetError;
use crate::report::ValidationReport;
use crate::rule::Rule;
use anneal_artifact::Artifact;
use indexmap::IndexMap;

/// An immutable, registration-ordered set of rules
///
/// Ids are unique; duplicate registration is rejected at build time.
#[derive(Debug, Default)]
pub struct RuleSet {
    rules: IndexMap<String, Rule>,
}

impl RuleSet {
    /// Start building a rule set
    #[inline]
    #[must_use]
    pub fn builder() -> RuleSetBuilder {
        RuleSetBuilder::default()
    }

    /// Create an empty rule set
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of registered rules
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the set is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Look up a rule by id
    #[inline]
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.rules.get(id)
    }

    /// Iterate rules in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.values()
    }
}

/// Builder collecting rules before duplicate-id validation
#[derive(Debug, Default)]
pub struct RuleSetBuilder {
    rules: Vec<Rule>,
}

impl RuleSetBuilder {
    /// Add a rule (registration order is preserved)
    #[inline]
    #[must_use]
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Add many rules at once
    #[inline]
    #[must_use]
    pub fn rules(mut self, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Validate ids and freeze the set
    ///
    /// # Errors
    /// - [`RuleSetError::EmptyRuleId`] if any rule has an empty id
    /// - [`RuleSetError::DuplicateRuleId`] if two rules share an id
    pub fn build(self) -> Result<RuleSet, RuleSetError> {
        let mut rules = IndexMap::with_capacity(self.rules.len());
        for rule in self.rules {
            if rule.id().is_empty() {
                return Err(RuleSetError::EmptyRuleId);
            }
            let id = rule.id().to_string();
            if rules.insert(id.clone(), rule).is_some() {
                return Err(RuleSetError::DuplicateRuleId { id });
            }
        }
        Ok(RuleSet { rules })
    }
}

/// Executes every registered rule against an artifact
///
/// Execution is deterministic: rules run in registration order, and a
/// predicate panic is recorded as a failing finding without aborting the
/// remaining rules.
#[derive(Debug)]
pub struct RuleEngine {
    rules: RuleSet,
}

impl RuleEngine {
    /// Create an engine over a frozen rule set
    #[inline]
    #[must_use]
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    /// The underlying rule set
    #[inline]
    #[must_use]
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Run every rule and aggregate a report
    pub fn validate(&self, artifact: &Artifact) -> ValidationReport {
        let mut findings = Vec::with_capacity(self.rules.len());

        for rule in self.rules.iter() {
            let finding = rule.check(artifact);
            tracing::debug!(
                rule = rule.id(),
                passed = finding.passed,
                "rule evaluated"
            );
            findings.push((rule.priority(), finding));
        }

        let report = ValidationReport::from_findings(findings);
        tracing::debug!(
            score = report.overall_score,
            failing = report.failing_checks(),
            revision = %artifact.revision().short(),
            "validation complete"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{Finding, Priority};
    use pretty_assertions::assert_eq;

    fn contains_rule(id: &str, needle: &'static str) -> Rule {
        Rule::new(id, "structure", Priority::High, move |a| {
            if a.text().contains(needle) {
                Finding::pass()
            } else {
                Finding::fail(format!("missing '{needle}'"))
            }
        })
    }

    #[test]
    fn builder_preserves_registration_order() {
        let set = RuleSet::builder()
            .rule(contains_rule("zeta", "z"))
            .rule(contains_rule("alpha", "a"))
            .build()
            .unwrap();

        let ids: Vec<_> = set.iter().map(|r| r.id().to_string()).collect();
        assert_eq!(ids, vec!["zeta", "alpha"]);
    }

    #[test]
    fn builder_rejects_duplicate_ids() {
        let result = RuleSet::builder()
            .rule(contains_rule("dup", "x"))
            .rule(contains_rule("dup", "y"))
            .build();
        assert!(matches!(
            result,
            Err(RuleSetError::DuplicateRuleId { id }) if id == "dup"
        ));
    }

    #[test]
    fn builder_rejects_empty_id() {
        let result = RuleSet::builder().rule(contains_rule("", "x")).build();
        assert!(matches!(result, Err(RuleSetError::EmptyRuleId)));
    }

    #[test]
    fn engine_scores_all_passing() {
        let set = RuleSet::builder()
            .rule(contains_rule("has-fn", "fn"))
            .rule(contains_rule("has-brace", "{"))
            .build()
            .unwrap();
        let engine = RuleEngine::new(set);

        let report = engine.validate(&Artifact::new("fn main() {}"));
        assert_eq!(report.overall_score, 100.0);
        assert_eq!(report.passed_checks, 2);
    }

    #[test]
    fn engine_continues_past_panicking_rule() {
        let set = RuleSet::builder()
            .rule(Rule::new("boom", "broken", Priority::Critical, |_| {
                panic!("bad rule")
            }))
            .rule(contains_rule("has-text", "hello"))
            .build()
            .unwrap();
        let engine = RuleEngine::new(set);

        let report = engine.validate(&Artifact::new("hello"));
        assert_eq!(report.total_checks, 2);
        assert_eq!(report.passed_checks, 1);
        assert_eq!(report.critical_issues.len(), 1);
        assert!(report.critical_issues[0].message.contains("bad rule"));
    }

    #[test]
    fn engine_is_deterministic() {
        let make_engine = || {
            RuleEngine::new(
                RuleSet::builder()
                    .rule(contains_rule("a", "a"))
                    .rule(contains_rule("b", "b"))
                    .rule(contains_rule("c", "c"))
                    .build()
                    .unwrap(),
            )
        };
        let artifact = Artifact::new("only a and b");

        let first = make_engine().validate(&artifact);
        let second = make_engine().validate(&artifact);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn empty_engine_passes_vacuously() {
        let engine = RuleEngine::new(RuleSet::empty());
        let report = engine.validate(&Artifact::new("anything"));
        assert_eq!(report.overall_score, 100.0);
        assert_eq!(report.total_checks, 0);
    }
}
