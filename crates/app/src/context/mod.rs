//! Application context - dependency injection container

use std::sync::{Arc, Weak};
use std::time::Duration;

use burner_core::{
    AuthorizationPort, Clock, ControllerSettings, ExitTimer, LockPorts, LockScreenView,
    LockSessionController, MonitorCallback, MonitorScheduler, NotificationScheduler,
    PolicyService, ProximityTagReader, ProximityUnlockListener, RestrictionEnforcementPort,
    SessionStore, TicketProvider,
};
use burner_domain::{BurnerError, Config, Result};
use burner_infra::errors::map_join_error;
use burner_infra::{init_tracing, SqliteSharedStore, StoreManager, TokioExpiryMonitor};
use futures::FutureExt;
use tracing::{debug, info, warn};

use crate::ticker::LockScreenTicker;
use crate::utils::health::{ComponentHealth, HealthStatus};

/// Period of the foreground lock screen ticker.
pub const TICKER_PERIOD: Duration = Duration::from_secs(1);

/// Capabilities only the host platform can provide.
#[derive(Clone)]
pub struct PlatformPorts {
    pub authorization: Arc<dyn AuthorizationPort>,
    pub enforcement: Arc<dyn RestrictionEnforcementPort>,
    pub notifications: Arc<dyn NotificationScheduler>,
    pub tickets: Arc<dyn TicketProvider>,
    pub tag_reader: Arc<dyn ProximityTagReader>,
    pub clock: Arc<dyn Clock>,
}

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: Config,
    pub store: Arc<StoreManager>,
    pub policy: Arc<PolicyService>,
    pub controller: Arc<LockSessionController>,
    pub exit_timer: Arc<ExitTimer>,
    pub proximity: Arc<ProximityUnlockListener>,
    pub monitor: Arc<TokioExpiryMonitor>,
    clock: Arc<dyn Clock>,
}

impl AppContext {
    /// Build the context from `.env`, environment variables and config files.
    pub async fn new(ports: PlatformPorts) -> Result<Self> {
        if let Err(err) = dotenvy::dotenv() {
            debug!(error = %err, "no .env file loaded");
        }
        let config = burner_infra::load()?;
        Self::new_with_config(config, ports).await
    }

    /// Build the context with an explicit configuration.
    ///
    /// Startup order: store and schema, cached policy, controller, background
    /// wake wiring, then reconciliation of whatever the store says about the
    /// last session.
    pub async fn new_with_config(config: Config, ports: PlatformPorts) -> Result<Self> {
        config.validate()?;

        if !init_tracing(&config.logging)? {
            debug!("tracing subscriber already installed");
        }

        let store = Arc::new(StoreManager::from_config(&config.store)?);
        store.run_migrations()?;

        let shared_state = Arc::new(SqliteSharedStore::new(Arc::clone(&store)));
        let session_store = SessionStore::new(shared_state);

        let policy = Arc::new(PolicyService::new(session_store.clone(), config.lock.min_categories));
        let loaded = policy.load().await?;
        debug!(coverage = %loaded.describe_coverage(config.lock.min_categories), "policy loaded");

        let monitor = Arc::new(TokioExpiryMonitor::new(Arc::clone(&ports.clock)));
        let lock_ports = LockPorts {
            authorization: ports.authorization,
            enforcement: ports.enforcement,
            monitor: monitor.clone(),
            notifications: ports.notifications,
            tickets: ports.tickets,
            clock: Arc::clone(&ports.clock),
        };
        let controller = Arc::new(LockSessionController::new(
            lock_ports,
            session_store,
            Arc::clone(&policy),
            ControllerSettings::from(&config.lock),
        ));

        monitor.register(expiry_wake_callback(Arc::downgrade(&controller)));

        let restored = controller.reconcile().await?;
        info!(
            locked = restored.is_locked,
            end_time = ?restored.end_time,
            db_path = %store.path().display(),
            "burner context ready"
        );

        let exit_timer =
            Arc::new(ExitTimer::new(Arc::clone(&controller), config.lock.exit_grace_seconds));
        let proximity = Arc::new(ProximityUnlockListener::new(
            ports.tag_reader,
            Arc::clone(&controller),
            &config.proximity,
        ));

        Ok(Self {
            config,
            store,
            policy,
            controller,
            exit_timer,
            proximity,
            monitor,
            clock: ports.clock,
        })
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Current lock screen projection.
    pub fn lock_screen_view(&self) -> LockScreenView {
        LockScreenView::project(
            &self.controller.snapshot(),
            self.exit_timer.snapshot(),
            self.proximity.is_available(),
            self.clock.now(),
        )
    }

    /// Start the foreground ticker that drives the exit countdown and the
    /// wall-clock expiry poll while the lock screen is visible.
    pub fn start_ticker(&self) -> LockScreenTicker {
        LockScreenTicker::spawn(
            Arc::clone(&self.controller),
            Arc::clone(&self.exit_timer),
            Arc::clone(&self.proximity),
            TICKER_PERIOD,
        )
    }

    /// Check the store connection and report the monitor and lock state.
    pub async fn health_check(&self) -> HealthStatus {
        let mut status = HealthStatus::new()
            .add_component(self.check_store_health().await)
            .add_component(ComponentHealth::healthy_with(
                "expiry_monitor",
                format!("{} wake(s) armed", self.monitor.armed_count()),
            ))
            .add_component(self.check_lock_health());

        status.calculate_score();
        status
    }

    async fn check_store_health(&self) -> ComponentHealth {
        let store = Arc::clone(&self.store);
        let result = tokio::task::spawn_blocking(move || store.health_check())
            .await
            .map_err(map_join_error)
            .and_then(|inner| inner);

        match result {
            Ok(()) => ComponentHealth::healthy("store"),
            Err(err) => {
                warn!(error = %err, "store health check failed");
                ComponentHealth::unhealthy("store", err.to_string())
            }
        }
    }

    /// A locked session must have an armed wake, otherwise nothing guarantees
    /// it ends when the app is backgrounded.
    fn check_lock_health(&self) -> ComponentHealth {
        let session = self.controller.snapshot();
        if !session.is_locked {
            return ComponentHealth::healthy_with("lock", "disabled");
        }

        let activity = &self.config.lock.monitor_activity;
        match self.monitor.armed_until(activity) {
            Some(until) => ComponentHealth::healthy_with("lock", format!("locked until {until}")),
            None if self.controller.check_expiry(self.clock.now()) => {
                ComponentHealth::healthy_with("lock", "expiry pending")
            }
            None => ComponentHealth::unhealthy("lock", "locked without an armed expiry wake"),
        }
    }

    /// Stop tag reads and cancel in-process wakes.
    ///
    /// The lock itself is left in place: the store still records it and the
    /// next context re-arms it during reconciliation.
    pub async fn shutdown(&self) -> Result<()> {
        info!("shutdown called on AppContext");

        if let Err(err) = self.proximity.stop_listening().await {
            warn!(error = %err, "failed to stop proximity listener");
        }

        self.monitor.shutdown().await.map_err(BurnerError::from)?;

        info!(component = "TokioExpiryMonitor", cleanup_method = "cancel + join", "scheduler_cleanup");
        Ok(())
    }
}

/// Background wake handler: unlock when the session has reached its end.
///
/// The wake instant is the armed end time, so it is used as a floor for the
/// clock reading to absorb small skew between the timer and the wall clock.
fn expiry_wake_callback(controller: Weak<LockSessionController>) -> MonitorCallback {
    Arc::new(move |wake| {
        let controller = controller.clone();
        async move {
            let Some(controller) = controller.upgrade() else {
                debug!(name = %wake.name, "wake after context drop ignored");
                return;
            };

            let now = controller.clock().now().max(wake.scheduled_for);
            if controller.expire_if_due(now).await {
                info!(name = %wake.name, "session expired by background wake");
            } else {
                debug!(name = %wake.name, "background wake found nothing to expire");
            }
        }
        .boxed()
    })
}
