//! Foreground lock screen ticker
//!
//! While the lock screen is visible a one-second interval advances the exit
//! countdown, polls the wall clock for expiry and publishes the projected
//! view on a `watch` channel for the UI to render.

use std::sync::Arc;
use std::time::Duration;

use burner_core::{
    ExitTick, ExitTimer, LockScreenView, LockSessionController, ProximityUnlockListener,
};
use burner_domain::Result;
use burner_infra::errors::map_join_error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Handle to a running ticker task.
pub struct LockScreenTicker {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
    views: watch::Receiver<LockScreenView>,
}

impl LockScreenTicker {
    pub fn spawn(
        controller: Arc<LockSessionController>,
        exit_timer: Arc<ExitTimer>,
        proximity: Arc<ProximityUnlockListener>,
        period: Duration,
    ) -> Self {
        let project = {
            let controller = Arc::clone(&controller);
            let exit_timer = Arc::clone(&exit_timer);
            let proximity = Arc::clone(&proximity);
            move || {
                LockScreenView::project(
                    &controller.snapshot(),
                    exit_timer.snapshot(),
                    proximity.is_available(),
                    controller.clock().now(),
                )
            }
        };

        let (tx, views) = watch::channel(project());
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    () = token.cancelled() => {
                        debug!("lock screen ticker cancelled");
                        break;
                    }
                    _ = interval.tick() => {
                        if let ExitTick::Counting { remaining_seconds } = exit_timer.tick().await {
                            debug!(remaining_seconds, "exit countdown");
                        }

                        let now = controller.clock().now();
                        if controller.expire_if_due(now).await {
                            info!(%now, "session expired on foreground poll");
                        }

                        tx.send_replace(project());
                    }
                }
            }
        });

        Self { cancel, handle, views }
    }

    /// Subscribe to projected views, one per tick.
    pub fn views(&self) -> watch::Receiver<LockScreenView> {
        self.views.clone()
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Cancel the ticker and wait for its task to finish.
    pub async fn stop(self) -> Result<()> {
        self.cancel.cancel();
        self.handle.await.map_err(map_join_error)
    }
}
