//! # Burner Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port/adapter interfaces (traits) for every external capability
//! - The lock session state machine and its unlock paths
//! - Policy validation and the typed facade over the shared state store
//! - Lock screen projection helpers
//!
//! ## Architecture Principles
//! - Only depends on `burner-domain`
//! - No database, OS or UI framework code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod clock_ports;
pub mod exit_timer;
pub mod policy;
pub mod presentation;
pub mod proximity;
pub mod session;
pub mod store;

pub use clock_ports::{Clock, SystemClock};
pub use exit_timer::{ExitTick, ExitTimer};
pub use policy::PolicyService;
pub use presentation::LockScreenView;
pub use proximity::ports::{ProximityTagReader, TagRead, TagReadCallback};
pub use proximity::{ListenOutcome, ProximityUnlockListener, UnlockAction};
pub use session::ports::{
    AuthorizationPort, MonitorCallback, MonitorScheduler, MonitorWake, NotificationScheduler,
    RestrictionEnforcementPort, TicketProvider,
};
pub use session::{ControllerSettings, EnableRequest, LockPorts, LockSessionController};
pub use store::ports::SharedStateStore;
pub use store::{SessionStore, StoreKey};
