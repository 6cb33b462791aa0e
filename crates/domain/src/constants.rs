//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Session timing
/// Fallback session length, used both when no consumed ticket qualifies and
/// when the ticket's event has no explicit end time.
pub const FALLBACK_SESSION_HOURS: i64 = 4;
/// How far back a consumed ticket still counts toward the current event.
pub const TICKET_LOOKBACK_HOURS: i64 = 24;

// Policy
pub const DEFAULT_MIN_CATEGORIES: usize = 8;

// Exit timer
pub const DEFAULT_EXIT_GRACE_SECONDS: u32 = 300;

// External lookups
pub const DEFAULT_TICKET_LOOKUP_TIMEOUT_SECS: u64 = 10;

// Notifications
pub const SESSION_END_NOTIFICATION_ID: &str = "burner.session.end";
pub const DEFAULT_NOTIFICATION_TITLE: &str = "Burner Mode ended";
pub const DEFAULT_NOTIFICATION_BODY: &str = "Your apps are unlocked. Hope the show was worth it.";

// Background monitor
pub const DEFAULT_MONITOR_ACTIVITY: &str = "burner.session";

// Event channel capacity for lock observers
pub const LOCK_EVENT_CHANNEL_CAPACITY: usize = 32;
