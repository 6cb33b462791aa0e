//! In-process background monitor.
//!
//! `MonitorScheduler` adapter that sleeps on the tokio runtime until the armed
//! wall-clock instant and then invokes the registered callback. Join handles
//! are tracked, cancellation is explicit, and the callback runs under a
//! timeout.
//!
//! Hosts with an OS-level wake facility implement `MonitorScheduler` over it
//! instead; this adapter covers desktop and test runs where the process stays
//! alive for the whole session.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use burner_core::{Clock, MonitorCallback, MonitorScheduler, MonitorWake};
use burner_domain::Result as DomainResult;
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use super::error::{SchedulerError, SchedulerResult};

/// Timeouts for the expiry monitor.
#[derive(Debug, Clone)]
pub struct ExpiryMonitorConfig {
    /// Upper bound on a single callback invocation.
    pub callback_timeout: Duration,
    /// Timeout for awaiting each wake task on shutdown.
    pub join_timeout: Duration,
}

impl Default for ExpiryMonitorConfig {
    fn default() -> Self {
        Self { callback_timeout: Duration::from_secs(30), join_timeout: Duration::from_secs(5) }
    }
}

struct ArmedWake {
    generation: u64,
    until: DateTime<Utc>,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

type WakeTable = Arc<Mutex<HashMap<String, ArmedWake>>>;

/// Tokio-backed `MonitorScheduler`.
pub struct TokioExpiryMonitor {
    config: ExpiryMonitorConfig,
    clock: Arc<dyn Clock>,
    armed: WakeTable,
    callback: Arc<RwLock<Option<MonitorCallback>>>,
    generation: AtomicU64,
}

impl TokioExpiryMonitor {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_config(ExpiryMonitorConfig::default(), clock)
    }

    pub fn with_config(config: ExpiryMonitorConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            armed: Arc::new(Mutex::new(HashMap::new())),
            callback: Arc::new(RwLock::new(None)),
            generation: AtomicU64::new(0),
        }
    }

    /// Instant a wake is currently armed for.
    pub fn armed_until(&self, name: &str) -> Option<DateTime<Utc>> {
        self.armed.lock().get(name).map(|wake| wake.until)
    }

    pub fn armed_count(&self) -> usize {
        self.armed.lock().len()
    }

    /// Cancel every armed wake and wait for the tasks to finish.
    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> SchedulerResult<()> {
        let wakes: Vec<ArmedWake> = self.armed.lock().drain().map(|(_, wake)| wake).collect();
        let count = wakes.len();

        for wake in wakes {
            wake.cancel.cancel();
            match tokio::time::timeout(self.config.join_timeout, wake.handle).await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => return Err(SchedulerError::TaskJoinFailed(err.to_string())),
                Err(_) => {
                    return Err(SchedulerError::Timeout {
                        seconds: self.config.join_timeout.as_secs(),
                    })
                }
            }
        }

        info!(count, "expiry monitor shut down");
        Ok(())
    }

    fn spawn_wake(
        &self,
        name: String,
        until: DateTime<Utc>,
        generation: u64,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        let delay = (until - self.clock.now()).to_std().unwrap_or(Duration::ZERO);
        let armed = Arc::clone(&self.armed);
        let callback = Arc::clone(&self.callback);
        let callback_timeout = self.config.callback_timeout;

        tokio::spawn(async move {
            tokio::select! {
                () = cancel.cancelled() => {
                    debug!(%name, "wake cancelled");
                    return;
                }
                () = tokio::time::sleep(delay) => {}
            }

            {
                let mut table = armed.lock();
                if table.get(&name).map(|wake| wake.generation) != Some(generation) {
                    return;
                }
                table.remove(&name);
            }

            let Some(callback) = callback.read().clone() else {
                warn!(%name, "wake fired with no registered callback");
                return;
            };

            info!(%name, scheduled_for = %until, "background monitor wake");
            let wake = MonitorWake { name: name.clone(), scheduled_for: until };
            if tokio::time::timeout(callback_timeout, callback(wake)).await.is_err() {
                warn!(%name, timeout_secs = callback_timeout.as_secs(), "wake callback timed out");
            }
        })
    }
}

#[async_trait]
impl MonitorScheduler for TokioExpiryMonitor {
    async fn arm(&self, name: &str, until: DateTime<Utc>) -> DomainResult<()> {
        if name.trim().is_empty() {
            return Err(SchedulerError::InvalidName(name.to_string()).into());
        }

        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        let cancel = CancellationToken::new();

        // Spawn under the table lock so the task cannot look up its entry
        // before it is inserted.
        let previous = {
            let mut table = self.armed.lock();
            let handle = self.spawn_wake(name.to_string(), until, generation, cancel.clone());
            table.insert(name.to_string(), ArmedWake { generation, until, cancel, handle })
        };
        if let Some(previous) = previous {
            debug!(%name, previous = %previous.until, "replacing armed wake");
            previous.cancel.cancel();
        }

        debug!(%name, %until, "wake armed");
        Ok(())
    }

    async fn disarm(&self, name: &str) -> DomainResult<()> {
        if let Some(wake) = self.armed.lock().remove(name) {
            wake.cancel.cancel();
            debug!(%name, "wake disarmed");
        }
        Ok(())
    }

    fn register(&self, callback: MonitorCallback) {
        *self.callback.write() = Some(callback);
    }
}
