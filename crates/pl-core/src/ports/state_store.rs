use async_trait::async_trait;

use crate::ports::errors::StateStoreError;

/// Persisted-state key/value namespace (settings-database equivalent).
#[async_trait]
pub trait StateStorePort: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StateStoreError>;

    /// Replace the value stored under `key`.
    async fn set(&self, key: &str, value: &[u8]) -> Result<(), StateStoreError>;

    /// Remove `key`. Absence is not an error.
    async fn remove(&self, key: &str) -> Result<(), StateStoreError>;
}
