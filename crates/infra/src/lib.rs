//! # Burner Infrastructure
//!
//! Adapters for the ports defined in `burner-core`.
//!
//! This crate contains:
//! - SQLite shared state store (r2d2 pool, WAL mode)
//! - Configuration loading from environment and TOML/JSON files
//! - Tokio-backed background expiry monitor
//! - Tracing subscriber setup
//!
//! Platform adapters (restriction enforcement, notifications, tag readers)
//! live with the host application; everything here is portable.

pub mod config;
pub mod errors;
pub mod observability;
pub mod scheduling;
pub mod store;

pub use config::{load, load_from_env, load_from_file, probe_config_paths};
pub use errors::InfraError;
pub use observability::init_tracing;
pub use scheduling::{ExpiryMonitorConfig, SchedulerError, TokioExpiryMonitor};
pub use store::{MemorySharedStore, SqliteSharedStore, StoreManager};
