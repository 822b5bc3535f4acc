//! Revision hashing primitives
//!
//! Provides [`RevisionHash`], a strongly-typed 32-byte Blake3 hash that
//! identifies one immutable revision of an artifact's text.

use std::fmt::{self, Display, Formatter};

/// A 32-byte content hash (Blake3) over an artifact revision
///
/// Two revisions with equal hashes carry byte-identical text. Immutable
/// and cheap to clone (Copy).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RevisionHash([u8; 32]);

impl RevisionHash {
    /// Create a new hash from raw bytes
    #[inline]
    #[must_use]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Compute the Blake3 hash of arbitrary data
    #[inline]
    #[must_use]
    pub fn compute(data: &[u8]) -> Self {
        let hash = blake3::hash(data);
        Self::new(*hash.as_bytes())
    }

    /// Get reference to the underlying bytes
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Short string representation (first 16 hex chars)
    ///
    /// Used in tracing output where the full digest is noise.
    #[inline]
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..8])
    }
}

impl Display for RevisionHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl AsRef<[u8; 32]> for RevisionHash {
    fn as_ref(&self) -> &[u8; 32] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compute_is_deterministic() {
        let a = RevisionHash::compute(b"same input");
        let b = RevisionHash::compute(b"same input");
        assert_eq!(a, b);
    }

    #[test]
    fn compute_differs_on_different_input() {
        let a = RevisionHash::compute(b"input one");
        let b = RevisionHash::compute(b"input two");
        assert_ne!(a, b);
    }

    #[test]
    fn display_is_full_hex() {
        let hash = RevisionHash::compute(b"display");
        assert_eq!(hash.to_string().len(), 64);
    }

    #[test]
    fn short_is_sixteen_chars() {
        let hash = RevisionHash::compute(b"short");
        assert_eq!(hash.short().len(), 16);
        assert!(hash.to_string().starts_with(&hash.short()));
    }
}
