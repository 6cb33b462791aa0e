//! Shared test helpers for `burner-core` integration tests.
//!
//! These helpers wire a controller to in-memory mocks of every port so tests
//! can focus on behaviour instead of boilerplate. All mocks append to one
//! [`CallLog`] so tests can assert ordering across ports.

#![allow(dead_code)]

pub mod ports;
pub mod store;

use std::collections::BTreeSet;
use std::sync::Arc;

use burner_core::{
    Clock, ControllerSettings, LockPorts, LockSessionController, PolicyService, SessionStore,
};
use burner_domain::{AppId, CategoryId};
use chrono::{DateTime, Duration, TimeZone, Utc};
use parking_lot::Mutex;

pub use self::ports::{
    MockAuthorization, MockEnforcement, MockMonitor, MockNotifications, MockTagReader,
    MockTickets,
};
pub use self::store::MockSharedStore;

/// Ordered record of port calls, shared by every mock in a harness.
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().clone()
    }

    pub fn count(&self, entry: &str) -> usize {
        self.0.lock().iter().filter(|e| e.as_str() == entry).count()
    }

    pub fn position(&self, prefix: &str) -> Option<usize> {
        self.0.lock().iter().position(|e| e.starts_with(prefix))
    }

    pub fn clear(&self) {
        self.0.lock().clear();
    }
}

/// Clock pinned to a settable instant.
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now: Mutex::new(now) }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock() = now;
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock() += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

/// Reference instant used by the scenarios.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 20, 0, 0).unwrap()
}

pub fn categories(n: usize) -> BTreeSet<CategoryId> {
    (0..n).map(|i| CategoryId::new(format!("category-{i}"))).collect()
}

pub fn apps(names: &[&str]) -> BTreeSet<AppId> {
    names.iter().map(|name| AppId::new(*name)).collect()
}

pub const MIN_CATEGORIES: usize = 8;

/// A controller wired to fresh mocks.
pub struct Harness {
    pub log: CallLog,
    pub store: Arc<MockSharedStore>,
    pub authorization: Arc<MockAuthorization>,
    pub enforcement: Arc<MockEnforcement>,
    pub monitor: Arc<MockMonitor>,
    pub notifications: Arc<MockNotifications>,
    pub tickets: Arc<MockTickets>,
    pub clock: Arc<FixedClock>,
    pub policy: Arc<PolicyService>,
    pub controller: Arc<LockSessionController>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_store(Arc::new(MockSharedStore::new(CallLog::default())))
    }

    /// Build a harness over an existing store, simulating a process restart.
    pub fn with_store(store: Arc<MockSharedStore>) -> Self {
        let log = store.log();
        let authorization = Arc::new(MockAuthorization::new(true));
        let enforcement = Arc::new(MockEnforcement::new(log.clone()));
        let monitor = Arc::new(MockMonitor::new(log.clone()));
        let notifications = Arc::new(MockNotifications::new(log.clone()));
        let tickets = Arc::new(MockTickets::default());
        let clock = Arc::new(FixedClock::new(t0()));

        let session_store = SessionStore::new(store.clone());
        let policy = Arc::new(PolicyService::new(session_store.clone(), MIN_CATEGORIES));
        let ports = LockPorts {
            authorization: authorization.clone(),
            enforcement: enforcement.clone(),
            monitor: monitor.clone(),
            notifications: notifications.clone(),
            tickets: tickets.clone(),
            clock: clock.clone(),
        };
        let controller = Arc::new(LockSessionController::new(
            ports,
            session_store,
            policy.clone(),
            ControllerSettings::default(),
        ));

        Self {
            log,
            store,
            authorization,
            enforcement,
            monitor,
            notifications,
            tickets,
            clock,
            policy,
            controller,
        }
    }

    /// Select enough categories to pass validation.
    pub async fn with_valid_policy(self, exceptions: &[&str]) -> Self {
        self.policy
            .update_selection(categories(MIN_CATEGORIES), apps(exceptions))
            .await
            .unwrap();
        self.log.clear();
        self
    }
}
