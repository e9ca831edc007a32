//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid session transition: {0}")]
    InvalidTransition(String),

    #[error("Track has no keyframes")]
    EmptyTrack,

    #[error("Keyframe times must be non-decreasing")]
    UnorderedKeyframes,

    #[error("Invalid cycle length: {0}")]
    InvalidCycleLength(f32),

    #[error("Operation cancelled")]
    Cancelled,
}

impl DomainError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DomainError::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancelled_error_display() {
        let error = DomainError::Cancelled;
        assert_eq!(error.to_string(), "Operation cancelled");
    }

    #[test]
    fn test_is_cancelled_check() {
        assert!(DomainError::Cancelled.is_cancelled());
        assert!(!DomainError::EmptyTrack.is_cancelled());
        assert!(!DomainError::InvalidTransition("x".to_string()).is_cancelled());
    }
}
