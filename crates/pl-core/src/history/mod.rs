mod entry;
mod list;

pub use entry::{EntryKind, HistoryEntry, IMAGE_PREVIEW_LABEL};
pub use list::{HistoryList, HistorySnapshot, DEFAULT_MAX_HISTORY};

/// How a persisted history record was interpreted on load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistorySource {
    /// Nothing was persisted (first run).
    Empty,
    /// Decrypted with the current key.
    Encrypted,
    /// Pre-encryption plaintext record; re-encrypted on the next save.
    LegacyPlaintext,
    /// Bytes exist but no key was ever stored to produce them. The data is lost.
    Unrecoverable,
    /// Bytes exist, a key exists, neither format matched. Dropped on next save.
    Discarded,
    /// The state or key store could not be read. Nothing was loaded and the
    /// record must not be overwritten until a load succeeds.
    Unavailable,
}

/// Result of loading the persisted history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedHistory {
    pub entries: Vec<HistoryEntry>,
    pub source: HistorySource,
}

impl LoadedHistory {
    pub fn empty(source: HistorySource) -> Self {
        Self {
            entries: Vec::new(),
            source,
        }
    }

    pub fn is_unrecoverable(&self) -> bool {
        self.source == HistorySource::Unrecoverable
    }

    pub fn is_unavailable(&self) -> bool {
        self.source == HistorySource::Unavailable
    }
}

/// User-facing notices raised by the capture engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryNotice {
    /// History existed but its key is gone; history was reset.
    DataLoss,
    /// Persisting history failed; the in-memory list is still authoritative.
    PersistFailed,
}
