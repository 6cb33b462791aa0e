//! Mock implementations of the lock controller ports
//!
//! Each mock records its calls in the shared [`CallLog`] using
//! `<port>.<operation>` entries and can be told to fail.

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use burner_core::{
    AuthorizationPort, MonitorCallback, MonitorScheduler, MonitorWake, NotificationScheduler,
    ProximityTagReader, RestrictionEnforcementPort, TagRead, TagReadCallback, TicketProvider,
};
use burner_domain::{AppId, BurnerError, NotificationRequest, Result as DomainResult, TicketRef};
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

use super::CallLog;

pub struct MockAuthorization {
    authorized: AtomicBool,
    fail_query: AtomicBool,
    requests: AtomicUsize,
}

impl MockAuthorization {
    pub fn new(authorized: bool) -> Self {
        Self {
            authorized: AtomicBool::new(authorized),
            fail_query: AtomicBool::new(false),
            requests: AtomicUsize::new(0),
        }
    }

    pub fn set_authorized(&self, authorized: bool) {
        self.authorized.store(authorized, Ordering::SeqCst);
    }

    pub fn fail_query(&self) {
        self.fail_query.store(true, Ordering::SeqCst);
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthorizationPort for MockAuthorization {
    async fn is_authorized(&self) -> DomainResult<bool> {
        if self.fail_query.load(Ordering::SeqCst) {
            return Err(BurnerError::Platform("authorization center unavailable".into()));
        }
        Ok(self.authorized.load(Ordering::SeqCst))
    }

    async fn request_authorization(&self) -> DomainResult<()> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.authorized.store(true, Ordering::SeqCst);
        Ok(())
    }
}

pub struct MockEnforcement {
    log: CallLog,
    last_exceptions: Mutex<Option<BTreeSet<AppId>>>,
    fail_restrict: AtomicBool,
    fail_clear: AtomicBool,
    /// Yield inside `clear_all` so racing callers interleave.
    clear_delay: Mutex<Option<StdDuration>>,
}

impl MockEnforcement {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            last_exceptions: Mutex::new(None),
            fail_restrict: AtomicBool::new(false),
            fail_clear: AtomicBool::new(false),
            clear_delay: Mutex::new(None),
        }
    }

    pub fn fail_restrict(&self) {
        self.fail_restrict.store(true, Ordering::SeqCst);
    }

    pub fn fail_clear(&self) {
        self.fail_clear.store(true, Ordering::SeqCst);
    }

    pub fn slow_clear(&self, delay: StdDuration) {
        *self.clear_delay.lock() = Some(delay);
    }

    pub fn last_exceptions(&self) -> Option<BTreeSet<AppId>> {
        self.last_exceptions.lock().clone()
    }

    fn restrict_result(&self) -> DomainResult<()> {
        if self.fail_restrict.load(Ordering::SeqCst) {
            return Err(BurnerError::Platform("restriction service refused".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl RestrictionEnforcementPort for MockEnforcement {
    async fn restrict_all(&self) -> DomainResult<()> {
        self.log.push("enforcement.restrict_all");
        self.restrict_result()
    }

    async fn restrict_all_except(&self, exceptions: &BTreeSet<AppId>) -> DomainResult<()> {
        self.log.push("enforcement.restrict_all_except");
        *self.last_exceptions.lock() = Some(exceptions.clone());
        self.restrict_result()
    }

    async fn clear_all(&self) -> DomainResult<()> {
        self.log.push("enforcement.clear_all");
        let delay = *self.clear_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_clear.load(Ordering::SeqCst) {
            return Err(BurnerError::EnforcementFailure("clear rejected".into()));
        }
        Ok(())
    }
}

pub struct MockMonitor {
    log: CallLog,
    armed: Mutex<HashMap<String, DateTime<Utc>>>,
    callback: Mutex<Option<MonitorCallback>>,
    fail_arm: AtomicBool,
}

impl MockMonitor {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            armed: Mutex::default(),
            callback: Mutex::new(None),
            fail_arm: AtomicBool::new(false),
        }
    }

    pub fn fail_arm(&self) {
        self.fail_arm.store(true, Ordering::SeqCst);
    }

    pub fn armed_until(&self, name: &str) -> Option<DateTime<Utc>> {
        self.armed.lock().get(name).copied()
    }

    /// Deliver a wake for `name` to the registered callback.
    pub async fn fire(&self, name: &str) {
        let scheduled_for = self.armed.lock().remove(name);
        let callback = self.callback.lock().clone();
        if let (Some(scheduled_for), Some(callback)) = (scheduled_for, callback) {
            callback(MonitorWake { name: name.to_string(), scheduled_for }).await;
        }
    }
}

#[async_trait]
impl MonitorScheduler for MockMonitor {
    async fn arm(&self, name: &str, until: DateTime<Utc>) -> DomainResult<()> {
        self.log.push("monitor.arm");
        if self.fail_arm.load(Ordering::SeqCst) {
            return Err(BurnerError::Platform("monitor quota exceeded".into()));
        }
        self.armed.lock().insert(name.to_string(), until);
        Ok(())
    }

    async fn disarm(&self, name: &str) -> DomainResult<()> {
        self.log.push("monitor.disarm");
        self.armed.lock().remove(name);
        Ok(())
    }

    fn register(&self, callback: MonitorCallback) {
        *self.callback.lock() = Some(callback);
    }
}

pub struct MockNotifications {
    log: CallLog,
    pending: Mutex<HashMap<String, NotificationRequest>>,
    fail_schedule: AtomicBool,
}

impl MockNotifications {
    pub fn new(log: CallLog) -> Self {
        Self { log, pending: Mutex::default(), fail_schedule: AtomicBool::new(false) }
    }

    pub fn fail_schedule(&self) {
        self.fail_schedule.store(true, Ordering::SeqCst);
    }

    pub fn pending(&self) -> Vec<NotificationRequest> {
        self.pending.lock().values().cloned().collect()
    }
}

#[async_trait]
impl NotificationScheduler for MockNotifications {
    async fn schedule(&self, request: &NotificationRequest) -> DomainResult<()> {
        self.log.push("notification.schedule");
        if self.fail_schedule.load(Ordering::SeqCst) {
            return Err(BurnerError::Platform("notifications denied".into()));
        }
        self.pending.lock().insert(request.id.clone(), request.clone());
        Ok(())
    }

    async fn cancel(&self, id: &str) -> DomainResult<()> {
        self.log.push("notification.cancel");
        self.pending.lock().remove(id);
        Ok(())
    }
}

#[derive(Default)]
pub struct MockTickets {
    ticket: Mutex<Option<TicketRef>>,
    event_end: Mutex<Option<DateTime<Utc>>>,
    delay: Mutex<Option<StdDuration>>,
    lookbacks: Mutex<Vec<Duration>>,
}

impl MockTickets {
    pub fn set_ticket(&self, ticket: TicketRef, event_end: Option<DateTime<Utc>>) {
        *self.ticket.lock() = Some(ticket);
        *self.event_end.lock() = event_end;
    }

    pub fn hang_for(&self, delay: StdDuration) {
        *self.delay.lock() = Some(delay);
    }

    pub fn requested_lookbacks(&self) -> Vec<Duration> {
        self.lookbacks.lock().clone()
    }
}

#[async_trait]
impl TicketProvider for MockTickets {
    async fn most_recently_consumed_ticket(
        &self,
        within: Duration,
    ) -> DomainResult<Option<TicketRef>> {
        self.lookbacks.lock().push(within);
        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.ticket.lock().clone())
    }

    async fn event_end_time(&self, _ticket: &TicketRef) -> DomainResult<Option<DateTime<Utc>>> {
        Ok(*self.event_end.lock())
    }
}

pub struct MockTagReader {
    available: AtomicBool,
    pending: Mutex<Option<TagReadCallback>>,
    begins: AtomicUsize,
    cancels: AtomicUsize,
}

impl MockTagReader {
    pub fn new(available: bool) -> Self {
        Self {
            available: AtomicBool::new(available),
            pending: Mutex::new(None),
            begins: AtomicUsize::new(0),
            cancels: AtomicUsize::new(0),
        }
    }

    pub fn begins(&self) -> usize {
        self.begins.load(Ordering::SeqCst)
    }

    pub fn cancels(&self) -> usize {
        self.cancels.load(Ordering::SeqCst)
    }

    /// Complete the pending read with `payload`. Returns `false` when no read
    /// was in progress.
    pub async fn complete(&self, payload: Option<&str>) -> bool {
        let callback = self.pending.lock().take();
        match callback {
            Some(callback) => {
                callback(TagRead { payload: payload.map(str::to_string) }).await;
                true
            }
            None => false,
        }
    }

    /// Take the pending callback without running it, to simulate a read that
    /// completes after the session was stopped.
    pub fn take_pending(&self) -> Option<TagReadCallback> {
        self.pending.lock().take()
    }
}

#[async_trait]
impl ProximityTagReader for MockTagReader {
    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    async fn begin_read(&self, callback: TagReadCallback) -> DomainResult<()> {
        self.begins.fetch_add(1, Ordering::SeqCst);
        *self.pending.lock() = Some(callback);
        Ok(())
    }

    async fn cancel_read(&self) -> DomainResult<()> {
        self.cancels.fetch_add(1, Ordering::SeqCst);
        self.pending.lock().take();
        Ok(())
    }
}
