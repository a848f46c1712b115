use anyhow::Result;
use async_trait::async_trait;

/// Key-value storage port — the localStorage analogue.
///
/// Holds the persisted vote tokens (`vote:{id}` → `"u"`/`"n"`) and the
/// bearer token. Writes are last-writer-wins per key; the reconciler
/// serializes writers per item, so that is safe.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Read a value; `None` means the key is absent.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a key. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}
