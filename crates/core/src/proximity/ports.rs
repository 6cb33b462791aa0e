//! Port interface for the proximity-tag reader

use async_trait::async_trait;
use burner_domain::Result;
use futures::future::BoxFuture;

/// Result of a completed tag read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagRead {
    /// Decoded tag payload, `None` for tags without a readable record.
    pub payload: Option<String>,
}

/// Single-shot callback invoked when a read completes.
pub type TagReadCallback = Box<dyn FnOnce(TagRead) -> BoxFuture<'static, ()> + Send>;

/// External tag-reading capability.
#[async_trait]
pub trait ProximityTagReader: Send + Sync {
    /// Whether the device has a usable reader.
    fn is_available(&self) -> bool;

    /// Begin a read session. `callback` fires at most once, on a completed
    /// read, and never after [`Self::cancel_read`].
    async fn begin_read(&self, callback: TagReadCallback) -> Result<()>;

    /// Abort the current read session without invoking its callback.
    async fn cancel_read(&self) -> Result<()>;
}
