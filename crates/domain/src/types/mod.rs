//! Domain types and models

pub mod notification;
pub mod policy;
pub mod session;
pub mod ticket;

pub use notification::NotificationRequest;
pub use policy::{AppId, CategoryId, EnforcementPlan, PolicyConfiguration};
pub use session::{ExitTimerSnapshot, LockEvent, LockPhase, LockSession, UnlockReason};
pub use ticket::{TicketRef, TicketStatus};
