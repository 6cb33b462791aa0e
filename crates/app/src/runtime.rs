//! Host entry point

use std::future::Future;

use anyhow::Context;
use tokio::sync::broadcast::error::RecvError;
use tracing::info;

use crate::utils::logging::{log_lagged_subscriber, log_lock_event};
use crate::{AppContext, PlatformPorts};

/// Build the context, run the lock screen ticker and log controller events
/// until `shutdown` resolves, then tear everything down.
///
/// A lock that is still active at shutdown stays persisted and is restored
/// on the next start.
pub async fn run_until<F>(ports: PlatformPorts, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()>,
{
    let ctx = AppContext::new(ports).await.context("failed to build burner context")?;
    let ticker = ctx.start_ticker();
    let mut events = ctx.controller.subscribe();

    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            () = &mut shutdown => break,
            event = events.recv() => match event {
                Ok(event) => log_lock_event(&event),
                Err(RecvError::Lagged(skipped)) => log_lagged_subscriber(skipped),
                Err(RecvError::Closed) => break,
            },
        }
    }

    info!("shutting down burner context");
    ticker.stop().await.context("lock screen ticker did not stop cleanly")?;
    ctx.shutdown().await.context("failed to shut down burner context")?;
    Ok(())
}
