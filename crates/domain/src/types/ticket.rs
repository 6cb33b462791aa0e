//! Ticket references handed over by the ticketing collaborator

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::impl_domain_status_conversions;

/// Lifecycle status of a ticket as reported by the ticketing backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Unused,
    Used,
    Refunded,
}

impl_domain_status_conversions!(TicketStatus {
    Unused => "unused",
    Used => "used",
    Refunded => "refunded",
});

/// Minimal view of a ticket needed to size a lock session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketRef {
    pub ticket_id: String,
    pub event_id: String,
    pub status: TicketStatus,
    pub consumed_at: Option<DateTime<Utc>>,
    pub event_start: Option<DateTime<Utc>>,
}

impl TicketRef {
    /// A ticket counts toward the current event when it was scanned
    /// (`Used`) within `lookback` of `now`.
    pub fn consumed_within(&self, now: DateTime<Utc>, lookback: Duration) -> bool {
        if self.status != TicketStatus::Used {
            return false;
        }
        self.consumed_at.is_some_and(|consumed| consumed <= now && now - consumed <= lookback)
    }
}
