//! Proximity-tag unlock listener
//!
//! Wraps the tag reader with a single-shot contract: one read session at a
//! time, and the success action runs only for an authenticated read from the
//! session that is still current.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use burner_domain::{ProximityConfig, Result, UnlockReason};
use futures::future::BoxFuture;
use futures::FutureExt;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use super::ports::{ProximityTagReader, TagRead, TagReadCallback};
use crate::session::LockSessionController;

/// Action run after an authenticated read.
pub type UnlockAction = Box<dyn FnOnce() -> BoxFuture<'static, ()> + Send>;

/// Outcome of [`ProximityUnlockListener::start_listening`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenOutcome {
    Listening,
    AlreadyListening,
    /// No session is locked; nothing was started.
    NotLocked,
    /// The reader is missing or proximity unlock is disabled.
    Unavailable,
}

/// Listens for a proximity tag and unlocks on an authenticated read.
pub struct ProximityUnlockListener {
    reader: Arc<dyn ProximityTagReader>,
    controller: Arc<LockSessionController>,
    enabled: bool,
    expected_payload: Option<String>,
    active_read: Arc<Mutex<Option<u64>>>,
    next_read: AtomicU64,
}

impl ProximityUnlockListener {
    pub fn new(
        reader: Arc<dyn ProximityTagReader>,
        controller: Arc<LockSessionController>,
        config: &ProximityConfig,
    ) -> Self {
        Self {
            reader,
            controller,
            enabled: config.enabled,
            expected_payload: config.expected_payload.clone(),
            active_read: Arc::new(Mutex::new(None)),
            next_read: AtomicU64::new(1),
        }
    }

    pub fn is_available(&self) -> bool {
        self.enabled && self.reader.is_available()
    }

    pub fn is_listening(&self) -> bool {
        self.active_read.lock().is_some()
    }

    /// Begin a read session that runs `on_success` after an authenticated read.
    ///
    /// # Errors
    /// Propagates a reader failure to start; the listener is left idle.
    pub async fn start_listening(&self, on_success: UnlockAction) -> Result<ListenOutcome> {
        if !self.controller.is_locked() {
            debug!("proximity listen requested while unlocked");
            return Ok(ListenOutcome::NotLocked);
        }
        if !self.is_available() {
            return Ok(ListenOutcome::Unavailable);
        }

        let read_id = {
            let mut active = self.active_read.lock();
            if active.is_some() {
                return Ok(ListenOutcome::AlreadyListening);
            }
            let id = self.next_read.fetch_add(1, Ordering::Relaxed);
            *active = Some(id);
            id
        };

        let active_read = Arc::clone(&self.active_read);
        let expected = self.expected_payload.clone();
        let callback: TagReadCallback = Box::new(move |read: TagRead| {
            async move {
                {
                    let mut active = active_read.lock();
                    if *active != Some(read_id) {
                        debug!(read_id, "ignoring read from a stopped session");
                        return;
                    }
                    *active = None;
                }
                if is_authentic(expected.as_deref(), &read) {
                    info!(read_id, "proximity tag accepted");
                    on_success().await;
                } else {
                    warn!(read_id, "proximity tag rejected");
                }
            }
            .boxed()
        });

        if let Err(err) = self.reader.begin_read(callback).await {
            self.clear_if_current(read_id);
            warn!(error = %err, "failed to start proximity read");
            return Err(err);
        }
        debug!(read_id, "proximity read started");
        Ok(ListenOutcome::Listening)
    }

    /// Listen with the success action wired to the controller's unlock.
    pub async fn start_unlock_listening(&self) -> Result<ListenOutcome> {
        let controller = Arc::clone(&self.controller);
        self.start_listening(Box::new(move || {
            async move {
                controller.disable_with_reason(UnlockReason::ProximityTag).await;
            }
            .boxed()
        }))
        .await
    }

    /// Cancel the current read. Its callback will not run the success action.
    pub async fn stop_listening(&self) -> Result<()> {
        let Some(read_id) = self.active_read.lock().take() else {
            return Ok(());
        };
        debug!(read_id, "stopping proximity read");
        self.reader.cancel_read().await
    }

    fn clear_if_current(&self, read_id: u64) {
        let mut active = self.active_read.lock();
        if *active == Some(read_id) {
            *active = None;
        }
    }
}

fn is_authentic(expected: Option<&str>, read: &TagRead) -> bool {
    match expected {
        None => true,
        Some(expected) => read.payload.as_deref() == Some(expected),
    }
}
