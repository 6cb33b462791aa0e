//! Configuration management

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_EXIT_GRACE_SECONDS, DEFAULT_MIN_CATEGORIES, DEFAULT_MONITOR_ACTIVITY,
    DEFAULT_NOTIFICATION_BODY, DEFAULT_NOTIFICATION_TITLE, DEFAULT_TICKET_LOOKUP_TIMEOUT_SECS,
};
use crate::errors::{BurnerError, Result};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub lock: LockConfig,
    pub proximity: ProximityConfig,
    pub logging: LoggingConfig,
}

/// Shared state store configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub path: String,
    pub pool_size: u32,
    pub busy_timeout_ms: u64,
}

/// Lock session behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LockConfig {
    pub min_categories: usize,
    pub exit_grace_seconds: u32,
    pub ticket_lookup_timeout_secs: u64,
    pub monitor_activity: String,
    pub notification_title: String,
    pub notification_body: String,
}

/// Proximity-tag unlock configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProximityConfig {
    pub enabled: bool,
    /// When set, only tags carrying exactly this payload unlock the session.
    pub expected_payload: Option<String>,
}

/// Logging output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub filter: String,
    pub json: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { path: "burner.db".to_string(), pool_size: 4, busy_timeout_ms: 5_000 }
    }
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            min_categories: DEFAULT_MIN_CATEGORIES,
            exit_grace_seconds: DEFAULT_EXIT_GRACE_SECONDS,
            ticket_lookup_timeout_secs: DEFAULT_TICKET_LOOKUP_TIMEOUT_SECS,
            monitor_activity: DEFAULT_MONITOR_ACTIVITY.to_string(),
            notification_title: DEFAULT_NOTIFICATION_TITLE.to_string(),
            notification_body: DEFAULT_NOTIFICATION_BODY.to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { filter: "info".to_string(), json: false }
    }
}

impl LockConfig {
    pub fn ticket_lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.ticket_lookup_timeout_secs)
    }
}

impl Config {
    /// Reject values that would make the lock subsystem unusable.
    ///
    /// # Errors
    /// Returns `BurnerError::Config` describing the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.store.path.trim().is_empty() {
            return Err(BurnerError::Config("store.path must not be empty".into()));
        }
        if self.store.pool_size == 0 {
            return Err(BurnerError::Config("store.pool_size must be at least 1".into()));
        }
        if self.lock.min_categories == 0 {
            return Err(BurnerError::Config("lock.min_categories must be at least 1".into()));
        }
        if self.lock.ticket_lookup_timeout_secs == 0 {
            return Err(BurnerError::Config(
                "lock.ticket_lookup_timeout_secs must be at least 1".into(),
            ));
        }
        if self.lock.monitor_activity.trim().is_empty() {
            return Err(BurnerError::Config("lock.monitor_activity must not be empty".into()));
        }
        Ok(())
    }
}
