use anneal_artifact::Artifact;
use anneal_authenticity::{AuthenticityScorer, ScanContext};
use anneal_convergence::{CancelToken, ConvergenceConfig, ConvergencePhase};
use anneal_orchestrator::{
    CandidateStrategy, DualTrackOrchestrator, OrchestratorConfig, OrchestratorError, StrategyKind,
};
use anneal_rules::{Finding, Priority, Rule, RuleEngine, RuleSet};
use anneal_test_utils::{
    html_with_payload, html_with_untagged_images, init_tracing, standard_engine, FailingJudge,
    ScriptedGenerator, ScriptedJudge,
};
use std::sync::Arc;
use std::time::Duration;

fn sequential(stop_on_first_success: bool) -> OrchestratorConfig {
    OrchestratorConfig::new().with_strategy(StrategyKind::Sequential {
        stop_on_first_success,
    })
}

/// Rule passing when `marker` is present; no corrector.
fn marker_rule(id: &str, marker: &'static str) -> Rule {
    Rule::new(id, "structure", Priority::Medium, move |a| {
        if a.text().contains(marker) {
            Finding::pass()
        } else {
            Finding::fail(format!("missing {marker}"))
        }
    })
}

/// Rule passing when `marker` is present; corrector appends it.
fn appending_rule(id: &str, marker: &'static str) -> Rule {
    marker_rule(id, marker).with_corrector(move |a| {
        Ok(a.with_text(format!("{} {marker}", a.text())))
    })
}

/// Rule passing when `marker` is present; corrector appends it only
/// once `requires` is already there, so fixes land one per pass.
fn chained_rule(id: &str, marker: &'static str, requires: &'static str) -> Rule {
    marker_rule(id, marker).with_corrector(move |a| {
        if a.text().contains(requires) {
            Ok(a.with_text(format!("{} {marker}", a.text())))
        } else {
            Ok(a.clone())
        }
    })
}

#[tokio::test]
async fn untagged_images_converge_end_to_end() {
    init_tracing();
    let orchestrator = DualTrackOrchestrator::new(standard_engine(), sequential(false));

    let result = orchestrator
        .run(&html_with_untagged_images(), "a gallery page")
        .await
        .unwrap();

    assert!(result.success);
    assert_eq!(result.structural_score, 100.0);
    let structural = result.structural.unwrap();
    assert_eq!(structural.iterations_used, 1);
    assert_eq!(structural.applied_fixes, vec!["img-has-id"]);
    assert!(result.chosen_artifact.text().contains("id=\"img-1\""));
}

#[tokio::test]
async fn embedded_payload_is_critical_on_both_dimensions() {
    init_tracing();
    let artifact = html_with_payload();

    // Rule dimension: the critical finding lands in the report.
    let report = standard_engine().validate(&artifact);
    assert_eq!(report.critical_issues.len(), 1);
    assert_eq!(report.critical_issues[0].rule_id, "no-embedded-payload");

    // Pattern dimension: the single match alone clears 30 points.
    let authenticity = AuthenticityScorer::default().score(&artifact, &ScanContext::new());
    assert!(authenticity.score >= 30.0);
    assert!(!authenticity.is_acceptable);
}

#[tokio::test]
async fn larger_gap_track_runs_first() {
    init_tracing();
    // Structural: 2 of 5 rules pass (score 40, gap 50 to target 90).
    let engine = RuleEngine::new(
        RuleSet::builder()
            .rule(marker_rule("has-alpha", "alpha"))
            .rule(marker_rule("has-beta", "beta"))
            .rule(appending_rule("has-xray", "xray"))
            .rule(appending_rule("has-yankee", "yankee"))
            .rule(appending_rule("has-zulu", "zulu"))
            .build()
            .unwrap(),
    );
    // Content: judged 80 against target 85 (gap 5).
    let config = sequential(false)
        .with_content(ConvergenceConfig::new().with_target_score(85.0));
    let orchestrator = DualTrackOrchestrator::new(engine, config)
        .with_judge(Arc::new(ScriptedJudge::new(&[80.0])));

    let result = orchestrator
        .run(&Artifact::new("alpha beta"), "five markers")
        .await
        .unwrap();

    assert!(result
        .improvement_path
        .iter()
        .any(|step| step.contains("structural track first")));
    // The smaller-gap track is still attempted afterward.
    assert!(result.content.is_some());
    assert_eq!(result.structural_score, 100.0);
}

#[tokio::test]
async fn stop_on_first_success_skips_second_track() {
    init_tracing();
    let engine = RuleEngine::new(
        RuleSet::builder()
            .rule(appending_rule("has-xray", "xray"))
            .build()
            .unwrap(),
    );
    let config = sequential(true)
        .with_content(ConvergenceConfig::new().with_target_score(85.0));
    let orchestrator = DualTrackOrchestrator::new(engine, config)
        .with_judge(Arc::new(ScriptedJudge::new(&[80.0])));

    let result = orchestrator.run(&Artifact::new("base"), "one marker").await.unwrap();

    assert!(result.structural.is_some());
    assert!(result.content.is_none());
    assert!(result
        .improvement_path
        .iter()
        .any(|step| step.contains("stopped on first success")));
    // The skipped track still reports its initial assessment.
    assert_eq!(result.content_score, 80.0);
}

#[tokio::test]
async fn exhausted_tracks_keep_their_best_seen_revision() {
    init_tracing();
    // Structural fixes land one per pass: alpha, then beta, then gamma;
    // delta stays unfixed inside the 3-iteration budget.
    let engine = RuleEngine::new(
        RuleSet::builder()
            .rule(chained_rule("has-delta", "delta", "gamma"))
            .rule(chained_rule("has-gamma", "gamma", "beta"))
            .rule(chained_rule("has-beta", "beta", "alpha"))
            .rule(appending_rule("has-alpha", "alpha"))
            .build()
            .unwrap(),
    );
    // Judge script: one pre-assessment call, then the controller's
    // initial assessment and three iterations.
    let judge = ScriptedJudge::new(&[40.0, 40.0, 50.0, 60.0, 70.0]);
    let generator = ScriptedGenerator::new(&["v1", "v2", "v3"]);
    let config = sequential(false)
        .with_structural(ConvergenceConfig::new().with_max_iterations(3))
        .with_content(ConvergenceConfig::new().with_max_iterations(3));
    let orchestrator = DualTrackOrchestrator::new(engine, config)
        .with_judge(Arc::new(judge))
        .with_generator(Arc::new(generator));

    let result = orchestrator.run(&Artifact::new("base"), "chained").await.unwrap();

    assert!(!result.success);

    let structural = result.structural.unwrap();
    assert_eq!(structural.phase, ConvergencePhase::Exhausted);
    assert_eq!(structural.iterations_used, 3);
    assert_eq!(structural.final_score, 75.0);
    // Best-seen is the iteration-3 revision, not a rollback.
    assert!(structural.final_artifact.text().contains("gamma"));

    let content = result.content.unwrap();
    assert_eq!(content.phase, ConvergencePhase::Exhausted);
    assert_eq!(content.iterations_used, 3);
    assert_eq!(content.final_score, 70.0);
    assert_eq!(content.final_artifact.text(), "v3");
    assert_eq!(result.chosen_artifact.text(), "v3");
}

#[tokio::test]
async fn judge_outage_triggers_structural_rescue() {
    init_tracing();
    // The judge is down from the first call: the content track's gap is
    // assessed as the full 90, so it runs first, fails hard, and the
    // structural track runs as the rescue attempt.
    let orchestrator = DualTrackOrchestrator::new(standard_engine(), sequential(false))
        .with_judge(Arc::new(FailingJudge::always()));

    let result = orchestrator
        .run(&html_with_untagged_images(), "a gallery page")
        .await
        .unwrap();

    assert!(!result.success);
    assert_eq!(result.content.unwrap().phase, ConvergencePhase::Failed);
    assert_eq!(result.content_score, 0.0);
    assert!(result.structural.unwrap().is_converged());
    assert!(result
        .improvement_path
        .iter()
        .any(|step| step.contains("rescue")));
    assert!(result.chosen_artifact.text().contains("id=\"img-1\""));
}

#[tokio::test]
async fn parallel_failover_selects_the_surviving_track() {
    init_tracing();
    // The judge survives the pre-assessment and the controller's initial
    // assessment, then fails mid-run.
    let judge = FailingJudge::new(2, 40.0);
    let generator = ScriptedGenerator::new(&["v1", "v2"]);
    let config = OrchestratorConfig::new().with_strategy(StrategyKind::Parallel);
    let orchestrator = DualTrackOrchestrator::new(standard_engine(), config)
        .with_judge(Arc::new(judge))
        .with_generator(Arc::new(generator));

    let result = orchestrator
        .run(&html_with_untagged_images(), "a gallery page")
        .await
        .unwrap();

    assert!(result.success);
    assert_eq!(result.content.unwrap().phase, ConvergencePhase::Failed);
    assert_eq!(result.content_score, 0.0);
    assert!(result.structural.unwrap().is_converged());
    assert!(result
        .improvement_path
        .iter()
        .any(|step| step.contains("content track failed, structural track selected")));
    assert!(result.chosen_artifact.text().contains("id=\"img-1\""));
}

#[tokio::test]
async fn clean_artifact_is_accepted_unchanged() {
    init_tracing();
    let orchestrator = DualTrackOrchestrator::new(standard_engine(), sequential(false));
    let artifact = Artifact::new("<img id=\"hero\" src=\"hero.png\">");

    let result = orchestrator.run(&artifact, "a hero image").await.unwrap();

    assert!(result.success);
    assert!(result.structural.is_none());
    assert!(result.content.is_none());
    assert!(result.chosen_artifact.same_text(&artifact));
    assert!(result
        .improvement_path
        .iter()
        .any(|step| step.contains("immediate accept")));
}

#[tokio::test]
async fn both_tracks_timing_out_surfaces_both_causes() {
    init_tracing();
    let config = OrchestratorConfig::new()
        .with_strategy(StrategyKind::Parallel)
        .with_track_timeout(Duration::ZERO);
    let orchestrator = DualTrackOrchestrator::new(standard_engine(), config);

    let err = orchestrator
        .run(&html_with_untagged_images(), "a gallery page")
        .await
        .unwrap_err();

    let OrchestratorError::AllTracksFailed {
        structural,
        content,
    } = err;
    assert!(structural.contains("timed out"));
    assert!(content.contains("timed out"));
}

#[tokio::test]
async fn cancellation_returns_the_input_unharmed() {
    init_tracing();
    let cancel = CancelToken::new();
    cancel.cancel();
    let orchestrator = DualTrackOrchestrator::new(standard_engine(), sequential(false))
        .with_cancel_token(cancel);
    let artifact = html_with_untagged_images();

    let result = orchestrator.run(&artifact, "a gallery page").await.unwrap();

    assert!(!result.success);
    assert!(result.chosen_artifact.same_text(&artifact));
    let structural = result.structural.unwrap();
    assert_eq!(structural.phase, ConvergencePhase::Cancelled);
}

#[tokio::test]
async fn benchmark_prefers_the_highest_combined_score() {
    init_tracing();
    let artifact = Artifact::new("<img src=\"a.png\"> TODO polish");
    let orchestrator = DualTrackOrchestrator::new(
        standard_engine(),
        OrchestratorConfig::new().with_strategy(StrategyKind::Benchmark),
    );

    let report = orchestrator.benchmark(&artifact, "a gallery page").await.unwrap();

    assert_eq!(report.outcomes.len(), 4);
    assert_eq!(report.recommended, CandidateStrategy::SequentialFull);
    let recommended = report.recommended_outcome().unwrap();
    assert_eq!(recommended.result.combined_score(), 200.0);

    // Running with the benchmark strategy returns the recommended
    // result, annotated.
    let result = orchestrator.run(&artifact, "a gallery page").await.unwrap();
    assert!(result.improvement_path[0].contains("benchmark recommends"));
    assert!(result.success);
}
