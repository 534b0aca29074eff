use crate::error::Result;
use async_trait::async_trait;

#[cfg(feature = "file-storage")]
pub mod file_storage;
pub mod memory_storage;

#[cfg(feature = "file-storage")]
pub use file_storage::FileStorage;
pub use memory_storage::MemoryStorage;

/// Durable key-value slots holding serialized board state
#[async_trait]
pub trait Storage: Send + Sync {
    /// Reads the raw value stored under `key`, if any
    async fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the value stored under `key`
    async fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Removes the value stored under `key`; missing keys are not an error
    async fn remove(&self, key: &str) -> Result<()>;
}
