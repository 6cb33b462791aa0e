//! In-memory shared state store with failure injection

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use burner_core::SharedStateStore;
use burner_domain::{BurnerError, Result as DomainResult};
use parking_lot::Mutex;

use super::CallLog;

/// Map-backed `SharedStateStore` that logs writes as `store.set:<key>` and
/// `store.remove:<key>`.
pub struct MockSharedStore {
    values: Mutex<HashMap<String, String>>,
    failing_keys: Mutex<HashSet<String>>,
    log: CallLog,
}

impl MockSharedStore {
    pub fn new(log: CallLog) -> Self {
        Self { values: Mutex::default(), failing_keys: Mutex::default(), log }
    }

    pub fn log(&self) -> CallLog {
        self.log.clone()
    }

    /// Make writes to `key` fail with a storage error.
    pub fn fail_writes_to(&self, key: &str) {
        self.failing_keys.lock().insert(key.to_string());
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    pub fn put(&self, key: &str, value: &str) {
        self.values.lock().insert(key.to_string(), value.to_string());
    }

    fn check(&self, key: &str) -> DomainResult<()> {
        if self.failing_keys.lock().contains(key) {
            return Err(BurnerError::Storage(format!("write to {key} rejected")));
        }
        Ok(())
    }
}

#[async_trait]
impl SharedStateStore for MockSharedStore {
    async fn get(&self, key: &str) -> DomainResult<Option<String>> {
        Ok(self.value(key))
    }

    async fn set(&self, key: &str, value: &str) -> DomainResult<()> {
        self.check(key)?;
        self.log.push(format!("store.set:{key}"));
        self.put(key, value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> DomainResult<()> {
        self.check(key)?;
        self.log.push(format!("store.remove:{key}"));
        self.values.lock().remove(key);
        Ok(())
    }
}
