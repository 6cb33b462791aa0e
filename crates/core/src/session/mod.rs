//! Lock session state machine and the ports it drives

pub mod end_time;
pub mod ports;
pub mod service;

pub use end_time::{first_qualifying_ticket, resolve_end_time, EndTimeSource, ResolvedEndTime};
pub use service::{ControllerSettings, EnableRequest, LockPorts, LockSessionController};
