//! Orchestrator error types
//!
//! Failures local to one track are handled by graceful degradation and
//! never surface here; an error is raised only when every track fails
//! irrecoverably.

/// Errors raised by the dual-track orchestrator
#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    /// Both tracks failed with hard errors; both causes attached
    #[error("all tracks failed: structural: {structural}; content: {content}")]
    AllTracksFailed {
        /// The structural track's failure cause
        structural: String,
        /// The content track's failure cause
        content: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_tracks_failed_carries_both_causes() {
        let err = OrchestratorError::AllTracksFailed {
            structural: "rule engine poisoned".to_string(),
            content: "judge unreachable".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("rule engine poisoned"));
        assert!(text.contains("judge unreachable"));
    }
}
