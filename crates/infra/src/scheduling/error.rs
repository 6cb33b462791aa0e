//! Scheduler error types

use burner_domain::BurnerError;
use thiserror::Error;

use crate::errors::InfraError;

/// Scheduler-specific errors
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Wake name was empty
    #[error("Invalid wake name: {0:?}")]
    InvalidName(String),

    /// Operation timed out
    #[error("Operation timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// Task join failed
    #[error("Task join failed: {0}")]
    TaskJoinFailed(String),
}

impl From<SchedulerError> for InfraError {
    fn from(err: SchedulerError) -> Self {
        let burner_err = match err {
            SchedulerError::InvalidName(_) => BurnerError::InvalidInput(err.to_string()),
            _ => BurnerError::Scheduling(err.to_string()),
        };
        Self(burner_err)
    }
}

impl From<SchedulerError> for BurnerError {
    fn from(err: SchedulerError) -> Self {
        InfraError::from(err).into()
    }
}

/// Convenience type alias for scheduler operations
pub type SchedulerResult<T> = Result<T, SchedulerError>;
