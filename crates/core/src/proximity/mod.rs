//! Proximity-tag unlock path

pub mod listener;
pub mod ports;

pub use listener::{ListenOutcome, ProximityUnlockListener, UnlockAction};
