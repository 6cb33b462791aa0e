//! Lock session controller
//!
//! Single writer of the lock session. Every mutating entry point takes the
//! state mutex and holds it across its port calls, so racing unlock paths run
//! exactly one clear sequence. Synchronous readers use the published snapshot.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use burner_domain::constants::{
    DEFAULT_MONITOR_ACTIVITY, DEFAULT_NOTIFICATION_BODY, DEFAULT_NOTIFICATION_TITLE,
    DEFAULT_TICKET_LOOKUP_TIMEOUT_SECS, LOCK_EVENT_CHANNEL_CAPACITY, SESSION_END_NOTIFICATION_ID,
};
use burner_domain::{
    BurnerError, EnforcementPlan, LockConfig, LockEvent, LockPhase, LockSession,
    NotificationRequest, PolicyConfiguration, Result, UnlockReason,
};
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::end_time::resolve_end_time;
use super::ports::{
    AuthorizationPort, MonitorScheduler, NotificationScheduler, RestrictionEnforcementPort,
    TicketProvider,
};
use crate::clock_ports::Clock;
use crate::policy::PolicyService;
use crate::store::SessionStore;

/// External capabilities driven by the controller.
#[derive(Clone)]
pub struct LockPorts {
    pub authorization: Arc<dyn AuthorizationPort>,
    pub enforcement: Arc<dyn RestrictionEnforcementPort>,
    pub monitor: Arc<dyn MonitorScheduler>,
    pub notifications: Arc<dyn NotificationScheduler>,
    pub tickets: Arc<dyn TicketProvider>,
    pub clock: Arc<dyn Clock>,
}

/// Tunables taken from [`LockConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerSettings {
    /// Name the background monitor is armed under.
    pub monitor_activity: String,
    pub notification_title: String,
    pub notification_body: String,
    /// Upper bound on the ticket lookup during enable.
    pub ticket_lookup_timeout: StdDuration,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            monitor_activity: DEFAULT_MONITOR_ACTIVITY.to_string(),
            notification_title: DEFAULT_NOTIFICATION_TITLE.to_string(),
            notification_body: DEFAULT_NOTIFICATION_BODY.to_string(),
            ticket_lookup_timeout: StdDuration::from_secs(DEFAULT_TICKET_LOOKUP_TIMEOUT_SECS),
        }
    }
}

impl From<&LockConfig> for ControllerSettings {
    fn from(config: &LockConfig) -> Self {
        Self {
            monitor_activity: config.monitor_activity.clone(),
            notification_title: config.notification_title.clone(),
            notification_body: config.notification_body.clone(),
            ticket_lookup_timeout: config.ticket_lookup_timeout(),
        }
    }
}

/// Per-call options for [`LockSessionController::enable`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnableRequest {
    /// Overrides the configured ticket lookup timeout.
    pub lookup_timeout: Option<StdDuration>,
}

#[derive(Debug, Clone, Default)]
struct ControllerState {
    phase: LockPhase,
    session: LockSession,
}

/// Owns the Burner Mode state machine.
pub struct LockSessionController {
    ports: LockPorts,
    store: SessionStore,
    policy: Arc<PolicyService>,
    settings: ControllerSettings,
    state: Mutex<ControllerState>,
    published: RwLock<ControllerState>,
    events: broadcast::Sender<LockEvent>,
}

impl LockSessionController {
    pub fn new(
        ports: LockPorts,
        store: SessionStore,
        policy: Arc<PolicyService>,
        settings: ControllerSettings,
    ) -> Self {
        let (events, _) = broadcast::channel(LOCK_EVENT_CHANNEL_CAPACITY);
        Self {
            ports,
            store,
            policy,
            settings,
            state: Mutex::new(ControllerState::default()),
            published: RwLock::new(ControllerState::default()),
            events,
        }
    }

    /// Arm a lock session.
    ///
    /// Returns the active session. While already locked the existing session
    /// is returned untouched, so a repeated enable never moves the end time.
    ///
    /// # Errors
    /// - `NotAuthorized` / `InvalidSetup` before any side effect
    /// - `Storage`, `EnforcementFailure` or `Scheduling` after a rollback to
    ///   the disabled state
    #[instrument(skip(self, request))]
    pub async fn enable(&self, request: EnableRequest) -> Result<LockSession> {
        let mut state = self.state.lock().await;

        match self.ports.authorization.is_authorized().await {
            Ok(true) => {}
            Ok(false) => return Err(BurnerError::NotAuthorized),
            Err(err) => {
                warn!(error = %err, "authorization query failed");
                return Err(BurnerError::NotAuthorized);
            }
        }

        let policy = self.policy.current();
        policy.validate(self.policy.min_categories())?;

        if state.phase == LockPhase::Locked {
            debug!("enable while locked, keeping current session");
            return Ok(state.session.clone());
        }

        self.transition(&mut state, LockPhase::Enabling);

        let now = self.ports.clock.now();
        let timeout = request.lookup_timeout.unwrap_or(self.settings.ticket_lookup_timeout);
        let resolved = resolve_end_time(self.ports.tickets.as_ref(), now, timeout).await;
        let mut session = LockSession::locked(
            Uuid::now_v7(),
            now,
            resolved.end_time,
            state.session.setup_completed,
        );

        if let Err(err) = self.arm(&policy, &session).await {
            warn!(error = %err, kind = err.label(), "enable failed, rolling back");
            self.rollback().await;
            self.transition(&mut state, LockPhase::Disabled);
            return Err(err);
        }

        match self.store.set_setup_completed(true).await {
            Ok(()) => session.setup_completed = true,
            Err(err) => warn!(error = %err, "failed to record setup completion"),
        }
        self.schedule_end_notification(resolved.end_time).await;

        state.session = session.clone();
        self.transition(&mut state, LockPhase::Locked);
        info!(
            session_id = ?session.session_id,
            end_time = %resolved.end_time,
            source = ?resolved.source,
            "burner mode locked"
        );
        self.emit(LockEvent::Locked { session_id: session.session_id, end_time: resolved.end_time });
        Ok(session)
    }

    /// Manual unlock. Never fails; a no-op while disabled.
    pub async fn disable(&self) {
        self.disable_with_reason(UnlockReason::Manual).await;
    }

    /// Unlock for `reason`.
    ///
    /// Returns `true` when this call ran the clear sequence and `false` when
    /// the session was already disabled.
    #[instrument(skip(self))]
    pub async fn disable_with_reason(&self, reason: UnlockReason) -> bool {
        let mut state = self.state.lock().await;
        self.disable_locked(&mut state, reason).await
    }

    /// `true` iff a session is locked and `now` has reached its end time.
    pub fn check_expiry(&self, now: DateTime<Utc>) -> bool {
        self.published.read().session.is_expired_at(now)
    }

    /// Disable with [`UnlockReason::Expired`] if the session is due.
    ///
    /// Expiry is re-checked under the state lock, so a wake racing a manual
    /// unlock never clears a newer session.
    pub async fn expire_if_due(&self, now: DateTime<Utc>) -> bool {
        if !self.check_expiry(now) {
            return false;
        }
        let mut state = self.state.lock().await;
        if !state.session.is_expired_at(now) {
            return false;
        }
        self.disable_locked(&mut state, UnlockReason::Expired).await
    }

    /// Load the persisted session at process start.
    ///
    /// A locked session that has expired, or whose end time is missing or not
    /// after its start, is disabled. A live one has its
    /// enforcement, monitor and notification re-issued, since a crash may
    /// have happened between persisting and arming. The policy must already be
    /// loaded.
    #[instrument(skip(self))]
    pub async fn reconcile(&self) -> Result<LockSession> {
        let mut state = self.state.lock().await;
        let stored = self.store.load_session().await?;
        let now = self.ports.clock.now();

        if !stored.is_locked {
            state.session = stored;
            self.transition(&mut state, LockPhase::Disabled);
            debug!("no persisted lock session");
            return Ok(state.session.clone());
        }

        let live_end = stored.end_time.filter(|end| stored.is_consistent() && now < *end);
        let Some(end_time) = live_end else {
            if stored.is_consistent() {
                info!(end_time = ?stored.end_time, "persisted session expired while offline");
            } else {
                warn!(
                    started_at = ?stored.started_at,
                    end_time = ?stored.end_time,
                    "persisted session is inconsistent, disabling"
                );
            }
            state.session = stored;
            state.phase = LockPhase::Locked;
            self.disable_locked(&mut state, UnlockReason::Expired).await;
            return Ok(state.session.clone());
        };

        let policy = self.policy.current();
        if let Err(err) = self.apply_enforcement(&policy).await {
            warn!(error = %err, "failed to re-issue enforcement on restore");
        }
        if let Err(err) = self.ports.monitor.arm(&self.settings.monitor_activity, end_time).await {
            warn!(error = %err, "failed to re-arm background monitor on restore");
        }
        self.schedule_end_notification(end_time).await;

        state.session = stored;
        self.transition(&mut state, LockPhase::Locked);
        info!(session_id = ?state.session.session_id, %end_time, "burner mode restored");
        self.emit(LockEvent::Restored { session_id: state.session.session_id, end_time });
        Ok(state.session.clone())
    }

    /// Record that the lock screen intro has played for this session.
    pub async fn mark_intro_shown(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.phase != LockPhase::Locked {
            return Err(BurnerError::NotLocked);
        }
        self.store.set_intro_shown(true).await?;
        state.session.intro_shown = true;
        self.publish(&state);
        Ok(())
    }

    /// Prompt for restriction authorization.
    pub async fn request_authorization(&self) -> Result<()> {
        self.ports.authorization.request_authorization().await
    }

    pub fn snapshot(&self) -> LockSession {
        self.published.read().session.clone()
    }

    pub fn phase(&self) -> LockPhase {
        self.published.read().phase
    }

    pub fn is_locked(&self) -> bool {
        self.published.read().session.is_locked
    }

    pub fn remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.published.read().session.remaining(now)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LockEvent> {
        self.events.subscribe()
    }

    pub fn policy(&self) -> &Arc<PolicyService> {
        &self.policy
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.ports.clock
    }

    /// Persist first, then enforcement and the monitor.
    async fn arm(&self, policy: &PolicyConfiguration, session: &LockSession) -> Result<()> {
        let end_time = session
            .end_time
            .ok_or_else(|| BurnerError::Internal("armed session has no end time".into()))?;

        self.store.persist_lock(session).await?;
        self.apply_enforcement(policy).await?;
        self.ports
            .monitor
            .arm(&self.settings.monitor_activity, end_time)
            .await
            .map_err(as_scheduling)
    }

    async fn apply_enforcement(&self, policy: &PolicyConfiguration) -> Result<()> {
        let result = match policy.enforcement_plan() {
            EnforcementPlan::RestrictAll => self.ports.enforcement.restrict_all().await,
            EnforcementPlan::RestrictAllExcept(exceptions) => {
                self.ports.enforcement.restrict_all_except(&exceptions).await
            }
        };
        result.map_err(as_enforcement_failure)
    }

    async fn schedule_end_notification(&self, fire_at: DateTime<Utc>) {
        let request = NotificationRequest::session_end(
            fire_at,
            &self.settings.notification_title,
            &self.settings.notification_body,
        );
        if let Err(err) = self.ports.notifications.schedule(&request).await {
            warn!(error = %err, "failed to schedule session end notification");
        }
    }

    /// Undo a partially armed enable. Every step is best-effort.
    async fn rollback(&self) {
        if let Err(err) = self.ports.enforcement.clear_all().await {
            warn!(error = %err, "rollback: failed to clear enforcement");
        }
        if let Err(err) = self.ports.monitor.disarm(&self.settings.monitor_activity).await {
            warn!(error = %err, "rollback: failed to disarm monitor");
        }
        if let Err(err) = self.store.clear_lock().await {
            warn!(error = %err, "rollback: failed to clear persisted session");
        }
    }

    /// Run the clear sequence unless the controller is fully disabled.
    ///
    /// `Enabling` or `Disabling` seen under the state lock means the previous
    /// holder was dropped mid-sequence, which can leave enforcement applied.
    /// Those phases clear again; every step is idempotent.
    async fn disable_locked(&self, state: &mut ControllerState, reason: UnlockReason) -> bool {
        match state.phase {
            LockPhase::Disabled => {
                debug!(%reason, "disable while not locked, nothing to do");
                return false;
            }
            LockPhase::Locked => {}
            interrupted => {
                warn!(phase = %interrupted, %reason, "finishing an interrupted lock transition");
            }
        }
        self.transition(state, LockPhase::Disabling);

        if let Err(err) = self.store.set_setup_completed(false).await {
            warn!(error = %err, "failed to reset setup flag");
        }
        if let Err(err) = self.ports.notifications.cancel(SESSION_END_NOTIFICATION_ID).await {
            warn!(error = %err, "failed to cancel session end notification");
        }
        if let Err(err) = self.ports.monitor.disarm(&self.settings.monitor_activity).await {
            warn!(error = %err, "failed to disarm background monitor");
        }
        if let Err(err) = self.ports.enforcement.clear_all().await {
            warn!(error = %err, "failed to clear enforcement, restrictions may linger");
        }
        if let Err(err) = self.store.clear_lock().await {
            warn!(error = %err, "failed to clear persisted session");
        }

        let session_id = state.session.session_id;
        state.session = LockSession::default();
        self.transition(state, LockPhase::Disabled);
        info!(?session_id, %reason, "burner mode unlocked");
        self.emit(LockEvent::Unlocked { session_id, reason });
        true
    }

    fn transition(&self, state: &mut ControllerState, phase: LockPhase) {
        debug!(from = %state.phase, to = %phase, "lock phase transition");
        state.phase = phase;
        self.publish(state);
    }

    fn publish(&self, state: &ControllerState) {
        *self.published.write() = state.clone();
    }

    fn emit(&self, event: LockEvent) {
        if self.events.send(event).is_err() {
            debug!("no lock event subscribers");
        }
    }
}

fn as_enforcement_failure(err: BurnerError) -> BurnerError {
    match err {
        BurnerError::EnforcementFailure(_) => err,
        other => BurnerError::EnforcementFailure(other.to_string()),
    }
}

fn as_scheduling(err: BurnerError) -> BurnerError {
    match err {
        BurnerError::Scheduling(_) => err,
        other => BurnerError::Scheduling(other.to_string()),
    }
}
