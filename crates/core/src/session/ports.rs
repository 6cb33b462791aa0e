//! Port interfaces consumed by the lock session controller
//!
//! Every external capability the controller drives lives behind one of these
//! traits. Platform adapters live in `burner-app` or the host application.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use burner_domain::{AppId, NotificationRequest, Result, TicketRef};
use chrono::{DateTime, Duration, Utc};
use futures::future::BoxFuture;

/// Authorization to use the restriction capability.
#[async_trait]
pub trait AuthorizationPort: Send + Sync {
    /// Whether the user has already granted restriction authorization.
    async fn is_authorized(&self) -> Result<bool>;

    /// Prompt the user for authorization.
    async fn request_authorization(&self) -> Result<()>;
}

/// The external app-restriction service.
///
/// Commands are idempotent: re-issuing one that is already in effect is safe.
#[async_trait]
pub trait RestrictionEnforcementPort: Send + Sync {
    async fn restrict_all(&self) -> Result<()>;

    async fn restrict_all_except(&self, exceptions: &BTreeSet<AppId>) -> Result<()>;

    async fn clear_all(&self) -> Result<()>;
}

/// Wake delivered by the background monitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorWake {
    pub name: String,
    pub scheduled_for: DateTime<Utc>,
}

/// Callback invoked when an armed monitor fires.
pub type MonitorCallback = Arc<dyn Fn(MonitorWake) -> BoxFuture<'static, ()> + Send + Sync>;

/// Background monitoring facility that wakes at a wall-clock instant.
///
/// The core never receives wakes directly; the host registers a callback and
/// wires it to the controller's expiry check.
#[async_trait]
pub trait MonitorScheduler: Send + Sync {
    /// Arm a non-repeating wake at `until`, replacing any wake armed under
    /// the same name.
    async fn arm(&self, name: &str, until: DateTime<Utc>) -> Result<()>;

    /// Stop a previously armed wake. Disarming an unknown name succeeds.
    async fn disarm(&self, name: &str) -> Result<()>;

    /// Register the callback invoked on every wake.
    fn register(&self, callback: MonitorCallback);
}

/// Local notification delivery.
#[async_trait]
pub trait NotificationScheduler: Send + Sync {
    /// Schedule a request; a pending request with the same id is replaced.
    async fn schedule(&self, request: &NotificationRequest) -> Result<()>;

    /// Remove pending and delivered notifications with this id.
    async fn cancel(&self, id: &str) -> Result<()>;
}

/// Ticket and event data used to size a session.
#[async_trait]
pub trait TicketProvider: Send + Sync {
    /// Most recently consumed ticket within `within` of now, in provider order.
    async fn most_recently_consumed_ticket(&self, within: Duration) -> Result<Option<TicketRef>>;

    /// Scheduled end of the ticket's event, if the event declares one.
    async fn event_end_time(&self, ticket: &TicketRef) -> Result<Option<DateTime<Utc>>>;
}
