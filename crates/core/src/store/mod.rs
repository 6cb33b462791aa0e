//! Persistent shared state: port and typed facade

pub mod ports;
pub mod session_store;

pub use session_store::{SessionStore, StoreKey};
