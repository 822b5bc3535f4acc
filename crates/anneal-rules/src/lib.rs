//! Anneal Rule Engine
//!
//! Rule-based structural validation with deterministic auto-correction.
//!
//! # Core Concepts
//!
//! - [`Rule`]: a named, prioritized check with an optional corrector
//! - [`RuleSet`]: registration-ordered, id-unique, frozen at build time
//! - [`RuleEngine`]: runs every rule → [`ValidationReport`]
//! - [`Corrector`]: applies each failing rule's fix exactly once
//!
//! # Example
//!
//! ```rust
//! use anneal_artifact::Artifact;
//! use anneal_rules::{Corrector, Finding, Priority, Rule, RuleEngine, RuleSet};
//!
//! let rules = RuleSet::builder()
//!     .rule(
//!         Rule::new("has-title", "structure", Priority::High, |a| {
//!             if a.text().contains("<title>") {
//!                 Finding::pass()
//!             } else {
//!                 Finding::fail("document has no title")
//!             }
//!         })
//!         .with_corrector(|a| Ok(a.with_text(format!("<title></title>{}", a.text())))),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let engine = RuleEngine::new(rules);
//! let artifact = Artifact::new("<body></body>");
//!
//! let report = engine.validate(&artifact);
//! let outcome = Corrector::new().apply(engine.rules(), &artifact, &report);
//! assert!(engine.validate(&outcome.fixed).meets(100.0));
//! ```

#![warn(unreachable_pub)]

mod corrector;
mod engine;
mod error;
mod report;
mod rule;

pub use corrector::{CorrectionOutcome, Corrector};
pub use engine::{RuleEngine, RuleSet, RuleSetBuilder};
pub use error::{CorrectionError, RuleSetError};
pub use report::ValidationReport;
pub use rule::{Finding, Priority, Rule};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
