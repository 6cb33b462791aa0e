//! Structured logging helpers for lock commands.

use std::time::Duration;

use burner_domain::{BurnerError, LockEvent};
use tracing::{debug, info, warn};

/// Log the outcome of a command with its duration and, on failure, the
/// stable error label.
#[inline]
pub fn log_command_execution(command: &str, elapsed: Duration, error: Option<&BurnerError>) {
    let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

    match error {
        None => info!(command, duration_ms, "command_execution_success"),
        Some(err) => warn!(
            command,
            duration_ms,
            error_type = err.label(),
            error = %err,
            "command_execution_failure"
        ),
    }
}

/// Log a controller event received on the broadcast channel.
pub fn log_lock_event(event: &LockEvent) {
    match event {
        LockEvent::Locked { session_id, end_time } => {
            info!(session_id = ?session_id, %end_time, "lock_event_locked");
        }
        LockEvent::Restored { session_id, end_time } => {
            info!(session_id = ?session_id, %end_time, "lock_event_restored");
        }
        LockEvent::Unlocked { session_id, reason } => {
            info!(session_id = ?session_id, %reason, "lock_event_unlocked");
        }
    }
}

/// Log a lagging event subscriber.
pub fn log_lagged_subscriber(skipped: u64) {
    debug!(skipped, "lock event subscriber lagged");
}
