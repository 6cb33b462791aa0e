//! Typed facade over [`SharedStateStore`]
//!
//! Maps lock session fields, setup flags and the policy blob onto string keys.
//! Values that fail to parse are treated as absent so a corrupted entry can
//! never wedge the controller in a locked state it cannot describe.

use std::sync::Arc;

use burner_domain::{BurnerError, LockSession, PolicyConfiguration, Result};
use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

use super::ports::SharedStateStore;

/// Keys written to the shared store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKey {
    SessionEndTime,
    SessionStartedAt,
    SessionId,
    Locked,
    SetupCompleted,
    IntroShown,
    PolicySelection,
}

impl StoreKey {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SessionEndTime => "burner.session.end_time",
            Self::SessionStartedAt => "burner.session.started_at",
            Self::SessionId => "burner.session.id",
            Self::Locked => "burner.session.locked",
            Self::SetupCompleted => "burner.setup.completed",
            Self::IntroShown => "burner.intro.shown",
            Self::PolicySelection => "burner.policy.selection",
        }
    }

    /// Keys describing an armed session, removed together on unlock.
    pub const SESSION_KEYS: [Self; 4] =
        [Self::Locked, Self::SessionEndTime, Self::SessionStartedAt, Self::SessionId];
}

/// Typed access to the persisted lock state.
#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<dyn SharedStateStore>,
}

impl SessionStore {
    pub fn new(backend: Arc<dyn SharedStateStore>) -> Self {
        Self { backend }
    }

    /// Read the full session record, including setup and intro flags.
    pub async fn load_session(&self) -> Result<LockSession> {
        Ok(LockSession {
            session_id: self.read_uuid(StoreKey::SessionId).await?,
            is_locked: self.read_flag(StoreKey::Locked).await?,
            started_at: self.read_timestamp(StoreKey::SessionStartedAt).await?,
            end_time: self.read_timestamp(StoreKey::SessionEndTime).await?,
            setup_completed: self.read_flag(StoreKey::SetupCompleted).await?,
            intro_shown: self.read_flag(StoreKey::IntroShown).await?,
        })
    }

    /// Persist an armed session.
    ///
    /// The locked flag is written last so another process that observes
    /// `locked = true` always finds the end time next to it. The intro flag is
    /// cleared so the lock screen replays its intro for the new session.
    pub async fn persist_lock(&self, session: &LockSession) -> Result<()> {
        let end_time = session.end_time.ok_or_else(|| {
            BurnerError::InvalidInput("cannot persist a lock without an end time".into())
        })?;

        self.write(StoreKey::SessionEndTime, &end_time.to_rfc3339()).await?;
        match session.started_at {
            Some(started_at) => {
                self.write(StoreKey::SessionStartedAt, &started_at.to_rfc3339()).await?;
            }
            None => self.delete(StoreKey::SessionStartedAt).await?,
        }
        match session.session_id {
            Some(id) => self.write(StoreKey::SessionId, &id.to_string()).await?,
            None => self.delete(StoreKey::SessionId).await?,
        }
        self.delete(StoreKey::IntroShown).await?;
        self.write(StoreKey::Locked, "true").await
    }

    /// Remove every session key and the intro flag.
    ///
    /// Attempts all removals even when one fails and reports the first error.
    pub async fn clear_lock(&self) -> Result<()> {
        let mut first_error = None;
        for key in StoreKey::SESSION_KEYS.into_iter().chain([StoreKey::IntroShown]) {
            if let Err(err) = self.delete(key).await {
                warn!(key = key.as_str(), error = %err, "failed to clear session key");
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    pub async fn setup_completed(&self) -> Result<bool> {
        self.read_flag(StoreKey::SetupCompleted).await
    }

    pub async fn set_setup_completed(&self, completed: bool) -> Result<()> {
        self.write_flag(StoreKey::SetupCompleted, completed).await
    }

    pub async fn intro_shown(&self) -> Result<bool> {
        self.read_flag(StoreKey::IntroShown).await
    }

    pub async fn set_intro_shown(&self, shown: bool) -> Result<()> {
        self.write_flag(StoreKey::IntroShown, shown).await
    }

    pub async fn load_policy(&self) -> Result<Option<PolicyConfiguration>> {
        let Some(raw) = self.read(StoreKey::PolicySelection).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(policy) => Ok(Some(policy)),
            Err(err) => {
                warn!(error = %err, "discarding unreadable policy selection");
                Ok(None)
            }
        }
    }

    pub async fn save_policy(&self, policy: &PolicyConfiguration) -> Result<()> {
        let raw = serde_json::to_string(policy)
            .map_err(|e| BurnerError::Internal(format!("failed to encode policy: {e}")))?;
        self.write(StoreKey::PolicySelection, &raw).await
    }

    async fn read(&self, key: StoreKey) -> Result<Option<String>> {
        self.backend.get(key.as_str()).await
    }

    async fn write(&self, key: StoreKey, value: &str) -> Result<()> {
        debug!(key = key.as_str(), "store.set");
        self.backend.set(key.as_str(), value).await
    }

    async fn delete(&self, key: StoreKey) -> Result<()> {
        debug!(key = key.as_str(), "store.remove");
        self.backend.remove(key.as_str()).await
    }

    async fn read_flag(&self, key: StoreKey) -> Result<bool> {
        Ok(match self.read(key).await?.as_deref() {
            Some("true") => true,
            Some("false") | None => false,
            Some(other) => {
                warn!(key = key.as_str(), value = other, "unreadable flag treated as false");
                false
            }
        })
    }

    async fn write_flag(&self, key: StoreKey, value: bool) -> Result<()> {
        if value {
            self.write(key, "true").await
        } else {
            self.delete(key).await
        }
    }

    async fn read_timestamp(&self, key: StoreKey) -> Result<Option<DateTime<Utc>>> {
        let Some(raw) = self.read(key).await? else {
            return Ok(None);
        };
        match DateTime::parse_from_rfc3339(&raw) {
            Ok(parsed) => Ok(Some(parsed.with_timezone(&Utc))),
            Err(err) => {
                warn!(key = key.as_str(), error = %err, "unreadable timestamp treated as absent");
                Ok(None)
            }
        }
    }

    async fn read_uuid(&self, key: StoreKey) -> Result<Option<Uuid>> {
        let Some(raw) = self.read(key).await? else {
            return Ok(None);
        };
        Ok(Uuid::parse_str(&raw).ok())
    }
}
