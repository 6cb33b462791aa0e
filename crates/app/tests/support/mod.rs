//! Platform port doubles and a temp-dir backed context builder.

#![allow(dead_code)]

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use burner_app::{AppContext, PlatformPorts};
use burner_core::{
    AuthorizationPort, Clock, NotificationScheduler, ProximityTagReader,
    RestrictionEnforcementPort, TagRead, TagReadCallback, TicketProvider,
};
use burner_domain::{
    AppId, CategoryId, Config, LockEvent, NotificationRequest, ProximityConfig,
    Result as DomainResult, StoreConfig, TicketRef, TicketStatus,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use parking_lot::Mutex;
use tempfile::TempDir;
use tokio::sync::broadcast;

pub const UNLOCK_PAYLOAD: &str = "burner-unlock";

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 20, 0, 0).unwrap()
}

pub fn categories(n: usize) -> BTreeSet<CategoryId> {
    (0..n).map(|i| CategoryId::new(format!("category-{i}"))).collect()
}

pub fn apps(names: &[&str]) -> BTreeSet<AppId> {
    names.iter().map(|name| AppId::new(*name)).collect()
}

pub struct SettableClock(Mutex<DateTime<Utc>>);

impl SettableClock {
    pub fn advance(&self, by: Duration) {
        *self.0.lock() += by;
    }
}

impl Clock for SettableClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock()
    }
}

pub struct AllowAuthorization;

#[async_trait]
impl AuthorizationPort for AllowAuthorization {
    async fn is_authorized(&self) -> DomainResult<bool> {
        Ok(true)
    }

    async fn request_authorization(&self) -> DomainResult<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingEnforcement {
    calls: Mutex<Vec<String>>,
}

impl RecordingEnforcement {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls.lock().iter().filter(|c| c.as_str() == call).count()
    }
}

#[async_trait]
impl RestrictionEnforcementPort for RecordingEnforcement {
    async fn restrict_all(&self) -> DomainResult<()> {
        self.calls.lock().push("restrict_all".into());
        Ok(())
    }

    async fn restrict_all_except(&self, _exceptions: &BTreeSet<AppId>) -> DomainResult<()> {
        self.calls.lock().push("restrict_all_except".into());
        Ok(())
    }

    async fn clear_all(&self) -> DomainResult<()> {
        self.calls.lock().push("clear_all".into());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingNotifications {
    pending: Mutex<HashMap<String, NotificationRequest>>,
}

impl RecordingNotifications {
    pub fn pending(&self) -> Vec<NotificationRequest> {
        self.pending.lock().values().cloned().collect()
    }
}

#[async_trait]
impl NotificationScheduler for RecordingNotifications {
    async fn schedule(&self, request: &NotificationRequest) -> DomainResult<()> {
        self.pending.lock().insert(request.id.clone(), request.clone());
        Ok(())
    }

    async fn cancel(&self, id: &str) -> DomainResult<()> {
        self.pending.lock().remove(id);
        Ok(())
    }
}

#[derive(Default)]
pub struct StaticTickets {
    ticket: Mutex<Option<(TicketRef, Option<DateTime<Utc>>)>>,
}

impl StaticTickets {
    /// A ticket scanned one hour before `now` for an event ending at `end`.
    pub fn consumed_for_event(&self, now: DateTime<Utc>, end: DateTime<Utc>) {
        let ticket = TicketRef {
            ticket_id: "ticket-1".into(),
            event_id: "event-1".into(),
            status: TicketStatus::Used,
            consumed_at: Some(now - Duration::hours(1)),
            event_start: Some(now - Duration::hours(1)),
        };
        *self.ticket.lock() = Some((ticket, Some(end)));
    }
}

#[async_trait]
impl TicketProvider for StaticTickets {
    async fn most_recently_consumed_ticket(
        &self,
        _within: Duration,
    ) -> DomainResult<Option<TicketRef>> {
        Ok(self.ticket.lock().as_ref().map(|(ticket, _)| ticket.clone()))
    }

    async fn event_end_time(&self, _ticket: &TicketRef) -> DomainResult<Option<DateTime<Utc>>> {
        Ok(self.ticket.lock().as_ref().and_then(|(_, end)| *end))
    }
}

pub struct ScriptedTagReader {
    available: AtomicBool,
    pending: Mutex<Option<TagReadCallback>>,
}

impl ScriptedTagReader {
    pub fn is_reading(&self) -> bool {
        self.pending.lock().is_some()
    }

    pub async fn complete(&self, payload: &str) -> bool {
        let callback = self.pending.lock().take();
        match callback {
            Some(callback) => {
                callback(TagRead { payload: Some(payload.to_string()) }).await;
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl ProximityTagReader for ScriptedTagReader {
    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    async fn begin_read(&self, callback: TagReadCallback) -> DomainResult<()> {
        *self.pending.lock() = Some(callback);
        Ok(())
    }

    async fn cancel_read(&self) -> DomainResult<()> {
        self.pending.lock().take();
        Ok(())
    }
}

/// Platform doubles plus a temporary database directory that outlive any
/// number of contexts, so tests can simulate restarts.
pub struct TestApp {
    pub dir: TempDir,
    pub config: Config,
    pub clock: Arc<SettableClock>,
    pub enforcement: Arc<RecordingEnforcement>,
    pub notifications: Arc<RecordingNotifications>,
    pub tickets: Arc<StaticTickets>,
    pub tag_reader: Arc<ScriptedTagReader>,
}

impl TestApp {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let mut config = Config {
            store: StoreConfig {
                path: dir.path().join("burner.db").to_string_lossy().to_string(),
                pool_size: 2,
                busy_timeout_ms: 1_000,
            },
            proximity: ProximityConfig {
                enabled: true,
                expected_payload: Some(UNLOCK_PAYLOAD.to_string()),
            },
            ..Config::default()
        };
        config.logging.filter = "warn".to_string();

        Self {
            dir,
            config,
            clock: Arc::new(SettableClock(Mutex::new(t0()))),
            enforcement: Arc::default(),
            notifications: Arc::default(),
            tickets: Arc::default(),
            tag_reader: Arc::new(ScriptedTagReader {
                available: AtomicBool::new(true),
                pending: Mutex::new(None),
            }),
        }
    }

    pub fn ports(&self) -> PlatformPorts {
        PlatformPorts {
            authorization: Arc::new(AllowAuthorization),
            enforcement: self.enforcement.clone(),
            notifications: self.notifications.clone(),
            tickets: self.tickets.clone(),
            tag_reader: self.tag_reader.clone(),
            clock: self.clock.clone(),
        }
    }

    pub async fn start(&self) -> AppContext {
        AppContext::new_with_config(self.config.clone(), self.ports()).await.unwrap()
    }

    /// Start a context with a valid policy in place.
    pub async fn start_with_policy(&self) -> AppContext {
        let ctx = self.start().await;
        burner_app::update_policy(&ctx, categories(self.config.lock.min_categories), apps(&["maps"]))
            .await
            .unwrap();
        ctx
    }
}

/// Wait for the next `Unlocked` event, failing the test after `within`.
pub async fn next_unlock(
    events: &mut broadcast::Receiver<LockEvent>,
    within: StdDuration,
) -> LockEvent {
    tokio::time::timeout(within, async {
        loop {
            let event = events.recv().await.unwrap();
            if matches!(event, LockEvent::Unlocked { .. }) {
                return event;
            }
        }
    })
    .await
    .expect("no unlock event within the deadline")
}
