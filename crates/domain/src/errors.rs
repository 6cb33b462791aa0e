//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Burner Mode
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum BurnerError {
    #[error("Restriction authorization has not been granted")]
    NotAuthorized,

    #[error("Invalid setup: {0}")]
    InvalidSetup(String),

    #[error("Enforcement failure: {0}")]
    EnforcementFailure(String),

    #[error("Scheduling error: {0}")]
    Scheduling(String),

    #[error("No active lock session")]
    NotLocked,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Platform error: {0}")]
    Platform(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl BurnerError {
    /// Stable label suitable for structured log fields.
    pub fn label(&self) -> &'static str {
        match self {
            Self::NotAuthorized => "not_authorized",
            Self::InvalidSetup(_) => "invalid_setup",
            Self::EnforcementFailure(_) => "enforcement_failure",
            Self::Scheduling(_) => "scheduling",
            Self::NotLocked => "not_locked",
            Self::Storage(_) => "storage",
            Self::Config(_) => "config",
            Self::Platform(_) => "platform",
            Self::InvalidInput(_) => "invalid_input",
            Self::Internal(_) => "internal",
        }
    }

    /// Whether the user can recover by revisiting setup or permissions.
    pub fn is_user_recoverable(&self) -> bool {
        matches!(self, Self::NotAuthorized | Self::InvalidSetup(_))
    }
}

/// Result type alias for Burner operations
pub type Result<T> = std::result::Result<T, BurnerError>;
