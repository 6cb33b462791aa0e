//! Background wake scheduling

pub mod error;
pub mod expiry_monitor;

pub use error::{SchedulerError, SchedulerResult};
pub use expiry_monitor::{ExpiryMonitorConfig, TokioExpiryMonitor};
