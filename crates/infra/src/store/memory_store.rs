//! In-memory shared state store for tests and ephemeral runs.

use std::collections::HashMap;

use async_trait::async_trait;
use burner_core::SharedStateStore;
use burner_domain::Result as DomainResult;
use parking_lot::RwLock;

/// Process-local `SharedStateStore`. Contents do not survive a restart.
#[derive(Debug, Default)]
pub struct MemorySharedStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemorySharedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current contents.
    pub fn snapshot(&self) -> HashMap<String, String> {
        self.values.read().clone()
    }
}

#[async_trait]
impl SharedStateStore for MemorySharedStore {
    async fn get(&self, key: &str) -> DomainResult<Option<String>> {
        Ok(self.values.read().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> DomainResult<()> {
        self.values.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> DomainResult<()> {
        self.values.write().remove(key);
        Ok(())
    }
}
