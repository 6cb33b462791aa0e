//! # Burner App
//!
//! Application layer for Burner Mode.
//!
//! This crate contains:
//! - Application context (dependency injection and startup reconciliation)
//! - Lock commands invoked by the host UI
//! - Foreground lock screen ticker
//! - A host entry point that runs the context until shutdown
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires the hexagonal architecture together
//! - Platform ports are supplied by the host through [`PlatformPorts`]

pub mod commands;
pub mod context;
pub mod runtime;
pub mod ticker;
pub mod utils;

pub use commands::*;
pub use context::*;
pub use runtime::run_until;
pub use ticker::LockScreenTicker;
