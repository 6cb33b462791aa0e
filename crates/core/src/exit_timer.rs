//! Manual exit countdown
//!
//! The "I need my phone" path: a grace countdown driven by the foreground
//! ticker. It is never persisted; if the process dies mid-countdown the
//! session simply runs to its end time.

use std::sync::Arc;

use burner_domain::{BurnerError, ExitTimerSnapshot, Result, UnlockReason};
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::session::LockSessionController;

/// Outcome of a single [`ExitTimer::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitTick {
    /// No countdown running.
    Idle,
    Counting { remaining_seconds: u32 },
    /// The countdown reached zero and the session was disabled.
    Unlocked,
}

/// Cancellable grace countdown layered on the lock controller.
pub struct ExitTimer {
    controller: Arc<LockSessionController>,
    grace_seconds: u32,
    state: Mutex<ExitTimerSnapshot>,
}

impl ExitTimer {
    pub fn new(controller: Arc<LockSessionController>, grace_seconds: u32) -> Self {
        Self { controller, grace_seconds, state: Mutex::new(ExitTimerSnapshot::default()) }
    }

    pub fn grace_seconds(&self) -> u32 {
        self.grace_seconds
    }

    /// Start (or restart) the countdown at `grace_seconds`.
    ///
    /// # Errors
    /// `NotLocked` while no session is active, `InvalidInput` for a zero grace.
    pub fn start(&self, grace_seconds: u32) -> Result<()> {
        if !self.controller.is_locked() {
            return Err(BurnerError::NotLocked);
        }
        if grace_seconds == 0 {
            return Err(BurnerError::InvalidInput("exit grace must be at least one second".into()));
        }
        *self.state.lock() = ExitTimerSnapshot { remaining_seconds: grace_seconds, is_active: true };
        info!(grace_seconds, "exit timer started");
        Ok(())
    }

    /// Start with the configured grace period.
    pub fn start_default(&self) -> Result<()> {
        self.start(self.grace_seconds)
    }

    /// Advance the countdown by one second.
    ///
    /// The timer deactivates before disabling, so ticks arriving after zero
    /// are no-ops and the controller is asked to disable at most once.
    pub async fn tick(&self) -> ExitTick {
        {
            let mut state = self.state.lock();
            if !state.is_active {
                return ExitTick::Idle;
            }
            if !self.controller.is_locked() {
                debug!("session ended elsewhere, dropping exit countdown");
                *state = ExitTimerSnapshot::default();
                return ExitTick::Idle;
            }
            state.remaining_seconds = state.remaining_seconds.saturating_sub(1);
            if state.remaining_seconds > 0 {
                return ExitTick::Counting { remaining_seconds: state.remaining_seconds };
            }
            state.is_active = false;
        }

        info!("exit timer elapsed");
        self.controller.disable_with_reason(UnlockReason::ExitTimer).await;
        ExitTick::Unlocked
    }

    /// Stop the countdown. The lock is unaffected.
    pub fn cancel(&self) {
        let mut state = self.state.lock();
        if state.is_active {
            debug!(remaining_seconds = state.remaining_seconds, "exit timer cancelled");
        }
        *state = ExitTimerSnapshot::default();
    }

    pub fn snapshot(&self) -> ExitTimerSnapshot {
        *self.state.lock()
    }
}
