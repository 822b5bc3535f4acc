use anneal_artifact::Artifact;
use anneal_authenticity::{AuthenticityScorer, ScanContext};
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_score_is_never_negative(text in ".{0,600}") {
        let scorer = AuthenticityScorer::default();
        let report = scorer.score(&Artifact::new(text), &ScanContext::new());
        prop_assert!(report.score >= 0.0);
    }

    #[test]
    fn prop_scoring_is_deterministic(text in ".{0,600}") {
        let scorer = AuthenticityScorer::default();
        let artifact = Artifact::new(text);
        let a = scorer.score(&artifact, &ScanContext::new());
        let b = scorer.score(&artifact, &ScanContext::new());
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_prototype_context_never_raises_score(text in ".{0,600}") {
        let scorer = AuthenticityScorer::default();
        let artifact = Artifact::new(text);
        let strict = scorer.score(&artifact, &ScanContext::new());
        let relaxed = scorer.score(&artifact, &ScanContext::new().prototype());
        prop_assert!(relaxed.score <= strict.score);
    }

    #[test]
    fn prop_zero_score_is_acceptable(text in "[0-9 ]{0,100}") {
        // Digits and spaces can never match a placeholder pattern.
        let scorer = AuthenticityScorer::default();
        let report = scorer.score(&Artifact::new(text), &ScanContext::new());
        prop_assert_eq!(report.score, 0.0);
        prop_assert!(report.is_acceptable);
    }
}
