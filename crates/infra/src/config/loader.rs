//! Configuration loader
//!
//! Loads Burner Mode configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If `BURNER_STORE_PATH` is unset, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! Every loaded configuration is validated before it is returned.
//!
//! ## Environment Variables
//! - `BURNER_STORE_PATH`: Shared state database path (required)
//! - `BURNER_STORE_POOL_SIZE`: Connection pool size
//! - `BURNER_MIN_CATEGORIES`: Minimum categories for a valid policy
//! - `BURNER_EXIT_GRACE_SECONDS`: Exit timer grace period
//! - `BURNER_TICKET_LOOKUP_TIMEOUT_SECS`: Bound on the ticket lookup
//! - `BURNER_PROXIMITY_ENABLED`: Whether tag unlock is offered (true/false)
//! - `BURNER_PROXIMITY_EXPECTED_PAYLOAD`: Payload an unlock tag must carry
//! - `BURNER_LOG_FILTER`: Default tracing filter
//! - `BURNER_LOG_JSON`: Emit JSON logs (true/false)
//!
//! ## File Locations
//! The loader probes `config.{json,toml}` and `burner.{json,toml}` in the
//! current directory, its two parents, and next to the executable.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use burner_domain::{BurnerError, Config, Result};

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `BurnerError::Config` if neither source yields a valid
/// configuration.
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// Only `BURNER_STORE_PATH` is required; every other value falls back to the
/// defaults in [`Config::default`].
///
/// # Errors
/// Returns `BurnerError::Config` if the store path is missing or any
/// variable has an invalid value.
pub fn load_from_env() -> Result<Config> {
    let mut config = Config::default();

    config.store.path = env_var("BURNER_STORE_PATH")?;
    if let Some(pool_size) = env_parse::<u32>("BURNER_STORE_POOL_SIZE")? {
        config.store.pool_size = pool_size;
    }
    if let Some(min_categories) = env_parse::<usize>("BURNER_MIN_CATEGORIES")? {
        config.lock.min_categories = min_categories;
    }
    if let Some(grace) = env_parse::<u32>("BURNER_EXIT_GRACE_SECONDS")? {
        config.lock.exit_grace_seconds = grace;
    }
    if let Some(timeout) = env_parse::<u64>("BURNER_TICKET_LOOKUP_TIMEOUT_SECS")? {
        config.lock.ticket_lookup_timeout_secs = timeout;
    }

    config.proximity.enabled = env_bool("BURNER_PROXIMITY_ENABLED", config.proximity.enabled);
    if let Ok(payload) = std::env::var("BURNER_PROXIMITY_EXPECTED_PAYLOAD") {
        config.proximity.expected_payload = Some(payload).filter(|p| !p.is_empty());
    }

    if let Ok(filter) = std::env::var("BURNER_LOG_FILTER") {
        config.logging.filter = filter;
    }
    config.logging.json = env_bool("BURNER_LOG_JSON", config.logging.json);

    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations via
/// [`probe_config_paths`]. Format is detected by file extension.
///
/// # Errors
/// Returns `BurnerError::Config` if the file is missing, unreadable, in an
/// unsupported format, or fails validation.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(BurnerError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            BurnerError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| BurnerError::Config(format!("Failed to read config file: {e}")))?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| BurnerError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| BurnerError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(BurnerError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe the standard locations for a configuration file.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd);
    }
    if let Some(exe_dir) = std::env::current_exe().ok().and_then(|p| p.parent().map(Path::to_path_buf)) {
        roots.push(exe_dir);
    }

    roots.iter().flat_map(|root| candidates(root)).find(|path| path.exists())
}

fn candidates(root: &Path) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    for dir in [root.to_path_buf(), root.join(".."), root.join("../..")] {
        for name in ["config.json", "config.toml", "burner.json", "burner.toml"] {
            paths.push(dir.join(name));
        }
    }
    paths
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| BurnerError::Config(format!("Missing required environment variable: {key}")))
}

/// Parse an optional environment variable.
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| BurnerError::Config(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(None),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
