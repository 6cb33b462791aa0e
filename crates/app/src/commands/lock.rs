//! Lock session commands

use std::time::Instant;

use burner_core::{EnableRequest, ListenOutcome, LockScreenView};
use burner_domain::{LockSession, Result};
use tracing::info;

use crate::utils::logging::log_command_execution;
use crate::AppContext;

fn finish<T>(command: &str, start: Instant, result: Result<T>) -> Result<T> {
    log_command_execution(command, start.elapsed(), result.as_ref().err());
    result
}

/// Enter Burner Mode. Returns the active session, or the existing one when
/// already locked.
pub async fn enable_burner_mode(ctx: &AppContext) -> Result<LockSession> {
    let start = Instant::now();
    let result = ctx.controller.enable(EnableRequest::default()).await;
    finish("lock::enable_burner_mode", start, result)
}

/// Manual unlock. Never fails.
pub async fn disable_burner_mode(ctx: &AppContext) {
    let start = Instant::now();
    ctx.exit_timer.cancel();
    ctx.controller.disable().await;
    log_command_execution("lock::disable_burner_mode", start.elapsed(), None);
}

/// Start the manual exit countdown with the configured grace period.
pub fn start_exit_timer(ctx: &AppContext) -> Result<()> {
    let start = Instant::now();
    let result = ctx.exit_timer.start_default();
    if result.is_ok() {
        info!(grace_seconds = ctx.exit_timer.grace_seconds(), "exit countdown started");
    }
    finish("lock::start_exit_timer", start, result)
}

pub fn cancel_exit_timer(ctx: &AppContext) {
    let start = Instant::now();
    ctx.exit_timer.cancel();
    log_command_execution("lock::cancel_exit_timer", start.elapsed(), None);
}

/// Record that the lock screen intro animation played.
pub async fn mark_intro_shown(ctx: &AppContext) -> Result<()> {
    let start = Instant::now();
    let result = ctx.controller.mark_intro_shown().await;
    finish("lock::mark_intro_shown", start, result)
}

/// Begin listening for an unlock tag.
pub async fn start_tag_unlock(ctx: &AppContext) -> Result<ListenOutcome> {
    let start = Instant::now();
    let result = ctx.proximity.start_unlock_listening().await;
    finish("lock::start_tag_unlock", start, result)
}

pub async fn stop_tag_unlock(ctx: &AppContext) -> Result<()> {
    let start = Instant::now();
    let result = ctx.proximity.stop_listening().await;
    finish("lock::stop_tag_unlock", start, result)
}

pub fn get_lock_screen(ctx: &AppContext) -> LockScreenView {
    ctx.lock_screen_view()
}
