//! Anneal Convergence Loop
//!
//! Drives one quality dimension of an artifact toward a target score
//! through repeated assess/refine cycles.
//!
//! # Core Concepts
//!
//! - [`QualityTrack`]: one independently scored quality dimension
//! - [`StructuralTrack`]: rule engine + corrector as a track
//! - [`ConvergenceController`]: the iterate/validate/correct state machine
//! - [`ConvergenceConfig`] / [`ConvergenceResult`]: per-run policy and
//!   outcome
//! - [`CancelToken`]: cooperative cancellation between step boundaries
//!
//! # Example
//!
//! ```rust
//! use anneal_artifact::Artifact;
//! use anneal_convergence::{ConvergenceConfig, ConvergenceController, StructuralTrack};
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
//! let track = StructuralTrack::new(RuleEngine::new(rules));
//! let controller = ConvergenceController::new(track, ConvergenceConfig::new());
//!
//! let result = controller.run(&Artifact::new("fn main() {} // TODO")).await;
//! assert!(result.success);
//! # }
//! ```

#![warn(unreachable_pub)]

mod cancel;
mod config;
mod controller;
mod result;
mod track;

pub use cancel::CancelToken;
pub use config::ConvergenceConfig;
pub use controller::ConvergenceController;
pub use result::{ConvergencePhase, ConvergenceResult, RunId};
pub use track::{QualityTrack, Refinement, StructuralTrack, TrackAssessment, TrackError};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
