//! Error types for red
//!
//! Centralized error handling using thiserror. Tool failures never surface here:
//! they are turned into transcript text by the dispatcher. Completion-service
//! failures end the session as an aborted outcome rather than an error.

use thiserror::Error;

/// All error types that can escape the red library
#[derive(Debug, Error)]
pub enum RedError {
    /// Caller supplied unusable input (e.g. an empty task)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Operation not allowed in the current session state
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Result type alias for red operations
pub type Result<T> = std::result::Result<T, RedError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_error() {
        let err = RedError::InvalidInput("task is empty".to_string());
        assert_eq!(err.to_string(), "Invalid input: task is empty");
    }

    #[test]
    fn test_invalid_state_error() {
        let err = RedError::InvalidState("session already ran a task".to_string());
        assert_eq!(err.to_string(), "Invalid state: session already ran a task");
    }

    #[test]
    fn test_errors_convert_into_eyre() {
        let report: eyre::Report = RedError::InvalidInput("blank".to_string()).into();
        assert_eq!(report.to_string(), "Invalid input: blank");
    }
}
