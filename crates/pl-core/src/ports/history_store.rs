use async_trait::async_trait;

use crate::history::{HistoryEntry, LoadedHistory};

/// Persistence of the whole history list as one record.
#[async_trait]
pub trait HistoryStorePort: Send + Sync {
    /// Read and interpret the persisted record. Never fails; unreadable data
    /// is reported through [`LoadedHistory::source`].
    async fn load(&self) -> LoadedHistory;

    /// Serialize, encrypt and persist `entries`, replacing the prior record.
    ///
    /// Returns whether persistence succeeded. Failures are logged and left
    /// for the next save to retry.
    async fn save(&self, entries: &[HistoryEntry]) -> bool;
}
