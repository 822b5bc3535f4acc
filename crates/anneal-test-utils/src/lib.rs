//! Testing utilities for the anneal workspace
//!
//! Shared rule fixtures, artifact builders, and scripted collaborator
//! doubles.

#![allow(missing_docs)]

use anneal_artifact::Artifact;
use anneal_orchestrator::{GenerationContext, Generator, Judge, JudgeVerdict};
use anneal_rules::{Finding, Priority, Rule, RuleEngine, RuleSet};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Initialize test tracing once; safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_test_writer()
        .try_init();
}

/// Rule: every `<img` tag carries an `id=` attribute. High priority,
/// autofixable by numbering untagged images.
pub fn image_id_rule() -> Rule {
    Rule::new("img-has-id", "structure", Priority::High, |a| {
        let untagged = untagged_image_count(a.text());
        if untagged == 0 {
            Finding::pass()
        } else {
            Finding::fail(format!("{untagged} image(s) without id"))
                .with_suggestion("add an id attribute to every image")
        }
    })
    .with_corrector(|a| {
        let mut out = String::with_capacity(a.len());
        let mut counter = 0usize;
        let mut parts = a.text().split("<img");
        out.push_str(parts.next().unwrap_or(""));
        for tag in parts {
            let head = tag.split('>').next().unwrap_or(tag);
            if head.contains("id=") {
                out.push_str("<img");
            } else {
                counter += 1;
                out.push_str(&format!("<img id=\"img-{counter}\""));
            }
            out.push_str(tag);
        }
        Ok(a.with_text(out))
    })
}

fn untagged_image_count(text: &str) -> usize {
    text.split("<img")
        .skip(1)
        .filter(|tag| !tag.split('>').next().unwrap_or(tag).contains("id="))
        .count()
}

/// Rule: no embedded base64 payloads. Critical, no corrector.
pub fn no_embedded_payload_rule() -> Rule {
    Rule::new("no-embedded-payload", "authenticity", Priority::Critical, |a| {
        if a.text().contains(";base64,") {
            Finding::fail("embedded binary payload")
                .with_suggestion("reference the asset by path instead")
        } else {
            Finding::pass()
        }
    })
}

/// Rule: no TODO markers. Low priority, autofixable by stripping.
pub fn no_todo_rule() -> Rule {
    Rule::new("no-todo", "authenticity", Priority::Low, |a| {
        if a.text().contains("TODO") {
            Finding::fail("TODO marker present")
        } else {
            Finding::pass()
        }
    })
    .with_corrector(|a| {
        // Stripping can splice a new marker together; repeat until none
        // remain.
        let mut text = a.text().to_string();
        while text.contains("TODO") {
            text = text.replace("TODO", "");
        }
        Ok(a.with_text(text))
    })
}

/// The standard fixture engine: image ids + payload + TODO rules.
pub fn standard_engine() -> RuleEngine {
    RuleEngine::new(
        RuleSet::builder()
            .rule(image_id_rule())
            .rule(no_embedded_payload_rule())
            .rule(no_todo_rule())
            .build()
            .unwrap(),
    )
}

pub fn html_with_untagged_images() -> Artifact {
    Artifact::new("<img src=\"a.png\"><img src=\"b.png\"><img src=\"c.png\">")
}

pub fn html_with_payload() -> Artifact {
    Artifact::new(
        "<img src=\"data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAA=\">",
    )
}

/// Judge double returning a scripted score sequence; the last entry
/// repeats once the script runs out.
pub struct ScriptedJudge {
    scores: Mutex<VecDeque<f64>>,
    last: f64,
}

impl ScriptedJudge {
    pub fn new(scores: &[f64]) -> Self {
        let last = scores.last().copied().unwrap_or(0.0);
        Self {
            scores: Mutex::new(scores.iter().copied().collect()),
            last,
        }
    }
}

#[async_trait]
impl Judge for ScriptedJudge {
    async fn evaluate(
        &self,
        _artifact: &Artifact,
        _original_prompt: &str,
    ) -> anyhow::Result<JudgeVerdict> {
        let score = self
            .scores
            .lock()
            .expect("judge script lock")
            .pop_front()
            .unwrap_or(self.last);
        let findings = if score < 100.0 {
            vec![format!("content fidelity at {score}")]
        } else {
            Vec::new()
        };
        Ok(JudgeVerdict::new(score, findings))
    }
}

/// Judge double that starts failing after a number of successful calls.
pub struct FailingJudge {
    succeed_for: usize,
    score: f64,
    calls: AtomicUsize,
}

impl FailingJudge {
    pub fn new(succeed_for: usize, score: f64) -> Self {
        Self {
            succeed_for,
            score,
            calls: AtomicUsize::new(0),
        }
    }

    /// A judge that fails on its very first call.
    pub fn always() -> Self {
        Self::new(0, 0.0)
    }
}

#[async_trait]
impl Judge for FailingJudge {
    async fn evaluate(
        &self,
        _artifact: &Artifact,
        _original_prompt: &str,
    ) -> anyhow::Result<JudgeVerdict> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.succeed_for {
            Ok(JudgeVerdict::clean(self.score))
        } else {
            Err(anyhow::anyhow!("judge unreachable"))
        }
    }
}

/// Generator double replaying scripted revisions; returns the prompt
/// itself once the script runs out.
pub struct ScriptedGenerator {
    revisions: Mutex<VecDeque<String>>,
}

impl ScriptedGenerator {
    pub fn new(revisions: &[&str]) -> Self {
        Self {
            revisions: Mutex::new(revisions.iter().map(|s| s.to_string()).collect()),
        }
    }
}

#[async_trait]
impl Generator for ScriptedGenerator {
    async fn regenerate(
        &self,
        prompt: &str,
        _context: &GenerationContext,
    ) -> anyhow::Result<Artifact> {
        let text = self
            .revisions
            .lock()
            .expect("generator script lock")
            .pop_front()
            .unwrap_or_else(|| prompt.to_string());
        Ok(Artifact::new(text))
    }
}
