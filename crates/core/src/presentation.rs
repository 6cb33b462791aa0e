//! Lock screen projection
//!
//! Formats controller state for the lock screen. Holds no state of its own.

use burner_domain::{ExitTimerSnapshot, LockSession};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// What the lock screen renders at one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LockScreenView {
    /// `HH:MM:SS` until automatic expiry.
    pub session_countdown: String,
    /// `MM:SS` while the exit timer runs.
    pub exit_countdown: Option<String>,
    pub show_exit_button: bool,
    pub show_cancel_exit: bool,
    pub show_tag_unlock: bool,
    /// Intro sequence has not played for this session yet.
    pub play_intro: bool,
    /// Elapsed fraction of the session, `0.0..=1.0`.
    pub progress: f64,
}

impl LockScreenView {
    pub fn project(
        session: &LockSession,
        exit_timer: ExitTimerSnapshot,
        tag_available: bool,
        now: DateTime<Utc>,
    ) -> Self {
        let locked = session.is_locked;
        let remaining = session.remaining(now).map_or(0, |left| left.num_seconds());
        let exit_running = locked && exit_timer.is_active;

        Self {
            session_countdown: format_hms(remaining),
            exit_countdown: exit_running.then(|| format_ms(exit_timer.remaining_seconds)),
            show_exit_button: locked && !exit_running,
            show_cancel_exit: exit_running,
            show_tag_unlock: locked && tag_available,
            play_intro: locked && !session.intro_shown,
            progress: session.progress(now).unwrap_or(0.0),
        }
    }
}

fn format_hms(total_seconds: i64) -> String {
    let total = total_seconds.max(0);
    format!("{:02}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
}

fn format_ms(total_seconds: u32) -> String {
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}
