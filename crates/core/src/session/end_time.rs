//! Session end time heuristic
//!
//! A session lasts until the end of the event the user most recently scanned
//! a ticket for. Without a qualifying ticket it lasts a fixed fallback
//! duration from now.

use std::time::Duration as StdDuration;

use burner_domain::constants::{FALLBACK_SESSION_HOURS, TICKET_LOOKBACK_HOURS};
use burner_domain::TicketRef;
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use super::ports::TicketProvider;

/// Where a resolved end time came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndTimeSource {
    /// Declared end of the ticket's event.
    EventEnd,
    /// Event start plus the fallback duration.
    EventStartFallback,
    /// Now plus the fallback duration.
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedEndTime {
    pub end_time: DateTime<Utc>,
    pub source: EndTimeSource,
}

pub fn fallback_duration() -> Duration {
    Duration::hours(FALLBACK_SESSION_HOURS)
}

pub fn ticket_lookback() -> Duration {
    Duration::hours(TICKET_LOOKBACK_HOURS)
}

pub fn fallback_end_time(now: DateTime<Utc>) -> ResolvedEndTime {
    ResolvedEndTime { end_time: now + fallback_duration(), source: EndTimeSource::Fallback }
}

/// First ticket consumed within the lookback window, in the given order.
///
/// Providers that hold a list of candidates use this to pick the ticket they
/// return from [`TicketProvider::most_recently_consumed_ticket`].
pub fn first_qualifying_ticket<'a, I>(tickets: I, now: DateTime<Utc>) -> Option<&'a TicketRef>
where
    I: IntoIterator<Item = &'a TicketRef>,
{
    let lookback = ticket_lookback();
    tickets.into_iter().find(|ticket| ticket.consumed_within(now, lookback))
}

/// Resolve the end time for a session armed at `now`.
///
/// Never fails: provider errors, a lookup exceeding `timeout`, and end times
/// not after `now` all resolve to the fallback.
pub async fn resolve_end_time(
    provider: &dyn TicketProvider,
    now: DateTime<Utc>,
    timeout: StdDuration,
) -> ResolvedEndTime {
    match tokio::time::timeout(timeout, lookup(provider, now)).await {
        Ok(Ok(Some(resolved))) if resolved.end_time > now => resolved,
        Ok(Ok(Some(resolved))) => {
            warn!(end_time = %resolved.end_time, "event already over, using fallback duration");
            fallback_end_time(now)
        }
        Ok(Ok(None)) => {
            debug!("no recently consumed ticket, using fallback duration");
            fallback_end_time(now)
        }
        Ok(Err(err)) => {
            warn!(error = %err, "ticket lookup failed, using fallback duration");
            fallback_end_time(now)
        }
        Err(_) => {
            let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
            warn!(timeout_ms, "ticket lookup timed out, using fallback duration");
            fallback_end_time(now)
        }
    }
}

async fn lookup(
    provider: &dyn TicketProvider,
    now: DateTime<Utc>,
) -> burner_domain::Result<Option<ResolvedEndTime>> {
    let Some(ticket) = provider.most_recently_consumed_ticket(ticket_lookback()).await? else {
        return Ok(None);
    };
    if !ticket.consumed_within(now, ticket_lookback()) {
        debug!(ticket_id = %ticket.ticket_id, "provider ticket outside lookback window, ignoring");
        return Ok(None);
    }

    if let Some(end_time) = provider.event_end_time(&ticket).await? {
        return Ok(Some(ResolvedEndTime { end_time, source: EndTimeSource::EventEnd }));
    }
    Ok(ticket.event_start.map(|start| ResolvedEndTime {
        end_time: start + fallback_duration(),
        source: EndTimeSource::EventStartFallback,
    }))
}
