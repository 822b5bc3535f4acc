//! Anneal Dual-Track Orchestrator
//!
//! Runs a structural-quality track (rule engine + corrector) and a
//! content-authenticity track (judge + optional generator) toward
//! independent targets and produces one final artifact.
//!
//! # Core Concepts
//!
//! - [`DualTrackOrchestrator`]: schedules both tracks per a [`StrategyKind`]
//! - [`Judge`] / [`Generator`]: external collaborator traits
//! - [`AuthenticityJudge`]: local deterministic judge fallback
//! - [`OrchestrationResult`] / [`BenchmarkReport`]: outcomes
//!
//! # Example
//!
//! ```rust
//! use anneal_artifact::Artifact;
//! use anneal_orchestrator::{DualTrackOrchestrator, OrchestratorConfig};
//! use anneal_rules::{Finding, Priority, Rule, RuleEngine, RuleSet};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let rules = RuleSet::builder()
//!     .rule(
//!         Rule::new("no-todo", "authenticity", Priority::Low, |a| {
//!             if a.text().contains("TODO") {
//!                 Finding::fail("TODO marker present")
//!             } else {
//!                 Finding::pass()
//!             }
//!         })
//!         .with_corrector(|a| Ok(a.with_text(a.text().replace("TODO", "")))),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let orchestrator =
//!     DualTrackOrchestrator::new(RuleEngine::new(rules), OrchestratorConfig::new());
//!
//! let artifact = Artifact::new("fn main() {} // TODO");
//! let result = orchestrator.run(&artifact, "a main function").await.unwrap();
//! assert!(result.success);
//! assert!(!result.chosen_artifact.text().contains("TODO"));
//! # }
//! ```

#![warn(unreachable_pub)]

mod content;
mod error;
mod external;
mod orchestrator;
mod result;
mod strategy;

pub use content::{AuthenticityJudge, ContentTrack};
pub use error::OrchestratorError;
pub use external::{GenerationContext, Generator, Judge, JudgeVerdict};
pub use orchestrator::{DualTrackOrchestrator, OrchestratorConfig};
pub use result::{BenchmarkReport, OrchestrationResult, StrategyOutcome, TrackKind};
pub use strategy::{CandidateStrategy, StrategyKind};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
