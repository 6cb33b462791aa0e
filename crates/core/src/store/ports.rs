//! Port interface for the persistent shared state store
//!
//! The store is the only channel between the foreground controller and any
//! out-of-process monitor, so every adapter must be readable from another
//! process while the controller writes.

use async_trait::async_trait;
use burner_domain::Result;

/// Key/value store shared between execution contexts.
///
/// Writes are last-writer-wins. Every successful `set` or `remove` is a
/// durability point: after a crash the stored values are ground truth.
#[async_trait]
pub trait SharedStateStore: Send + Sync {
    /// Read a value, `None` when the key is absent.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Insert or replace a value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a key. Removing an absent key succeeds.
    async fn remove(&self, key: &str) -> Result<()>;
}
