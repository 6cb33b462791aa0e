//! Tracing subscriber setup
//!
//! `RUST_LOG` takes precedence over the configured filter so operators can
//! raise verbosity without editing the config file.

use burner_domain::{BurnerError, LoggingConfig, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Build the filter for `config`, preferring `RUST_LOG` when it parses.
///
/// # Errors
/// Returns `BurnerError::Config` when neither `RUST_LOG` nor the configured
/// filter is a valid directive string.
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.filter)
        .map_err(|e| BurnerError::Config(format!("invalid log filter '{}': {e}", config.filter)))
}

/// Install the global subscriber.
///
/// Returns `Ok(false)` when a subscriber was already installed, which happens
/// when several contexts are built in the same process (tests, embedding).
///
/// # Errors
/// Returns `BurnerError::Config` for an invalid filter.
pub fn init_tracing(config: &LoggingConfig) -> Result<bool> {
    let filter = build_filter(config)?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if config.json {
        registry.with(tracing_subscriber::fmt::layer().json().with_target(true)).try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer().with_target(true)).try_init()
    };

    Ok(installed.is_ok())
}
