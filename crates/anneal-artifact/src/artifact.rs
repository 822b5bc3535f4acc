//! The artifact value type
//!
//! An [`Artifact`] is one immutable revision of a generated text/code blob.
//! Corrections and regenerations never mutate in place; they produce a new
//! revision with a fresh [`RevisionHash`].

use crate::hash::RevisionHash;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Optional descriptive metadata attached to an artifact
///
/// Metadata travels unchanged across revisions: correcting the text of a
/// prototype keeps it a prototype.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    /// Declared domain of the content (e.g. "html", "rust", "sql")
    pub domain: Option<String>,
    /// File identifier the artifact is destined for
    pub file_name: Option<String>,
    /// Whether the caller accepted this artifact as a prototype/template
    ///
    /// Scorers may relax placeholder penalties for accepted prototypes.
    pub prototype: bool,
}

impl ArtifactMetadata {
    /// Create empty metadata
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the declared domain
    #[inline]
    #[must_use]
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Set the destination file name
    #[inline]
    #[must_use]
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// Mark the artifact as an accepted prototype/template
    #[inline]
    #[must_use]
    pub fn as_prototype(mut self) -> Self {
        self.prototype = true;
        self
    }
}

/// One immutable revision of a generated text/code artifact
///
/// # Invariants
/// - `revision` is always the Blake3 hash of `text`
/// - Immutable after construction; [`Artifact::with_text`] returns a new value
/// - Cheap to clone (text is `Arc<str>`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    revision: RevisionHash,
    text: Arc<str>,
    metadata: ArtifactMetadata,
}

impl Artifact {
    /// Create a new artifact revision from text
    #[inline]
    #[must_use]
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        let text = text.into();
        let revision = RevisionHash::compute(text.as_bytes());
        Self {
            revision,
            text,
            metadata: ArtifactMetadata::default(),
        }
    }

    /// Attach metadata (builder style)
    #[inline]
    #[must_use]
    pub fn with_metadata(mut self, metadata: ArtifactMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// The artifact text
    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Revision hash of the text
    #[inline]
    #[must_use]
    pub fn revision(&self) -> &RevisionHash {
        &self.revision
    }

    /// Attached metadata
    #[inline]
    #[must_use]
    pub fn metadata(&self) -> &ArtifactMetadata {
        &self.metadata
    }

    /// Produce a new revision with different text
    ///
    /// Metadata is carried over unchanged. The returned artifact compares
    /// equal to `self` only if the text is byte-identical.
    #[inline]
    #[must_use]
    pub fn with_text(&self, text: impl Into<Arc<str>>) -> Self {
        let text = text.into();
        let revision = RevisionHash::compute(text.as_bytes());
        Self {
            revision,
            text,
            metadata: self.metadata.clone(),
        }
    }

    /// Whether two revisions carry byte-identical text
    #[inline]
    #[must_use]
    pub fn same_text(&self, other: &Self) -> bool {
        self.revision == other.revision
    }

    /// Text length in bytes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Whether the text is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl std::fmt::Display for Artifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "artifact {} ({} bytes)", self.revision.short(), self.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn new_computes_revision() {
        let artifact = Artifact::new("fn main() {}");
        assert_eq!(
            artifact.revision(),
            &RevisionHash::compute(b"fn main() {}")
        );
    }

    #[test]
    fn with_text_produces_new_revision() {
        let original = Artifact::new("before");
        let revised = original.with_text("after");

        assert_ne!(original.revision(), revised.revision());
        assert_eq!(original.text(), "before");
        assert_eq!(revised.text(), "after");
    }

    #[test]
    fn with_text_carries_metadata() {
        let original = Artifact::new("body").with_metadata(
            ArtifactMetadata::new()
                .with_domain("html")
                .with_file_name("index.html"),
        );
        let revised = original.with_text("new body");

        assert_eq!(revised.metadata().domain.as_deref(), Some("html"));
        assert_eq!(revised.metadata().file_name.as_deref(), Some("index.html"));
    }

    #[test]
    fn same_text_matches_identical_revisions() {
        let a = Artifact::new("identical");
        let b = Artifact::new("identical");
        let c = Artifact::new("different");

        assert!(a.same_text(&b));
        assert!(!a.same_text(&c));
    }

    #[test]
    fn identical_text_yields_equal_revision() {
        let a = Artifact::new("stable");
        let b = a.with_text("stable");
        assert!(a.same_text(&b));
    }

    #[test]
    fn prototype_flag_round_trip() {
        let artifact =
            Artifact::new("draft").with_metadata(ArtifactMetadata::new().as_prototype());
        assert!(artifact.metadata().prototype);
    }

    #[test]
    fn empty_artifact_allowed() {
        let artifact = Artifact::new("");
        assert!(artifact.is_empty());
        assert_eq!(artifact.len(), 0);
    }
}
