//! Anneal Artifact System
//!
//! Immutable, content-addressed artifact values for the quality-convergence
//! pipeline.
//!
//! # Core Concepts
//!
//! - [`Artifact`]: one immutable revision of a generated text/code blob
//! - [`ArtifactMetadata`]: optional domain/file/prototype annotations
//! - [`RevisionHash`]: 32-byte Blake3 hash identifying a revision
//!
//! Every correction or regeneration step downstream produces a *new*
//! artifact value; revision hashes make "did anything actually change?"
//! a constant-time question.

#![warn(unreachable_pub)]

mod artifact;
mod hash;

pub use artifact::{Artifact, ArtifactMetadata};
pub use hash::RevisionHash;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
