//! Local notification payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::SESSION_END_NOTIFICATION_ID;

/// A local alert scheduled for a future instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRequest {
    pub id: String,
    pub fire_at: DateTime<Utc>,
    pub title: String,
    pub body: String,
}

impl NotificationRequest {
    /// The session-end alert. Always uses the same identifier so a new
    /// session replaces the previous request instead of stacking.
    pub fn session_end(
        fire_at: DateTime<Utc>,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: SESSION_END_NOTIFICATION_ID.to_string(),
            fire_at,
            title: title.into(),
            body: body.into(),
        }
    }
}
