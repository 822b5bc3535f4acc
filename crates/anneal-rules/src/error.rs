//! Error types for rule registration and correction

/// Errors raised while building a rule set
#[derive(Debug, thiserror::Error)]
pub enum RuleSetError {
    /// Two rules registered under the same id
    #[error("duplicate rule id: '{id}'")]
    DuplicateRuleId {
        /// The offending id
        id: String,
    },

    /// Rule registered with an empty id
    #[error("rule id must not be empty")]
    EmptyRuleId,
}

/// Errors raised by a rule's corrector
///
/// A correction failure never aborts the run: the corrector's fix is
/// skipped, not counted as applied, and the artifact is left untouched.
#[derive(Debug, thiserror::Error)]
pub enum CorrectionError {
    /// Corrector reported a failure
    #[error("correction failed: {0}")]
    Failed(String),

    /// Corrector panicked; the panic was caught and converted
    #[error("correction panicked: {0}")]
    Panicked(String),
}

impl CorrectionError {
    /// Create a failure with a message
    #[inline]
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_rule_id_display() {
        let err = RuleSetError::DuplicateRuleId {
            id: "img-has-id".to_string(),
        };
        assert!(err.to_string().contains("img-has-id"));
    }

    #[test]
    fn correction_error_display() {
        let err = CorrectionError::failed("no anchor found");
        assert!(err.to_string().contains("no anchor found"));
    }
}
