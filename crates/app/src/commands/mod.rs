//! Commands invoked by the host UI.
//!
//! Each command times itself and logs its outcome through
//! [`crate::utils::logging::log_command_execution`].

pub mod lock;
pub mod policy;

pub use lock::*;
pub use policy::*;
