//! Lock session types
//!
//! A [`LockSession`] is the single (possibly absent) Burner Mode session. The
//! controller in `burner-core` is its only writer; everything else reads
//! snapshots of it.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::impl_domain_status_conversions;

/// State machine phase of the lock controller.
///
/// `Enabling` and `Disabling` only exist while a transition is in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockPhase {
    #[default]
    Disabled,
    Enabling,
    Locked,
    Disabling,
}

impl_domain_status_conversions!(LockPhase {
    Disabled => "disabled",
    Enabling => "enabling",
    Locked => "locked",
    Disabling => "disabling",
});

/// Which unlock path ended a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnlockReason {
    Manual,
    Expired,
    ExitTimer,
    ProximityTag,
}

impl_domain_status_conversions!(UnlockReason {
    Manual => "manual",
    Expired => "expired",
    ExitTimer => "exit_timer",
    ProximityTag => "proximity_tag",
});

/// The single active (or absent) lock session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockSession {
    pub session_id: Option<Uuid>,
    pub is_locked: bool,
    pub started_at: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub setup_completed: bool,
    pub intro_shown: bool,
}

impl LockSession {
    /// Build a freshly armed session.
    pub fn locked(
        session_id: Uuid,
        started_at: DateTime<Utc>,
        end_time: DateTime<Utc>,
        setup_completed: bool,
    ) -> Self {
        Self {
            session_id: Some(session_id),
            is_locked: true,
            started_at: Some(started_at),
            end_time: Some(end_time),
            setup_completed,
            intro_shown: false,
        }
    }

    /// `true` iff the session is locked and `now` has reached its end time.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match (self.is_locked, self.end_time) {
            (true, Some(end)) => now >= end,
            _ => false,
        }
    }

    /// Time left until automatic expiry, saturating at zero.
    pub fn remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        if !self.is_locked {
            return None;
        }
        self.end_time.map(|end| (end - now).max(Duration::zero()))
    }

    /// Fraction of the session already elapsed, in `0.0..=1.0`.
    pub fn progress(&self, now: DateTime<Utc>) -> Option<f64> {
        let (start, end) = (self.started_at?, self.end_time?);
        if !self.is_locked {
            return None;
        }
        let total = (end - start).num_milliseconds();
        if total <= 0 {
            return Some(1.0);
        }
        let elapsed = (now - start).num_milliseconds().clamp(0, total);
        #[allow(clippy::cast_precision_loss)]
        Some(elapsed as f64 / total as f64)
    }

    /// A locked session needs an end time after its start.
    pub fn is_consistent(&self) -> bool {
        if !self.is_locked {
            return true;
        }
        match (self.started_at, self.end_time) {
            (Some(start), Some(end)) => end > start,
            (None, Some(_)) => true,
            _ => false,
        }
    }
}

/// Countdown state of the manual exit timer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitTimerSnapshot {
    pub remaining_seconds: u32,
    pub is_active: bool,
}

/// Change notifications broadcast by the lock controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LockEvent {
    Locked { session_id: Option<Uuid>, end_time: DateTime<Utc> },
    Restored { session_id: Option<Uuid>, end_time: DateTime<Utc> },
    Unlocked { session_id: Option<Uuid>, reason: UnlockReason },
}
