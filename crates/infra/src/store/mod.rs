//! Shared state store adapters

pub mod manager;
pub mod memory_store;
pub mod sqlite_store;

pub use manager::StoreManager;
pub use memory_store::MemorySharedStore;
pub use sqlite_store::SqliteSharedStore;
