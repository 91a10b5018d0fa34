//! # pl-core
//!
//! Core domain models and ports for Pastelet.
//!
//! This crate contains pure domain logic without any infrastructure dependencies:
//! the history list and its dedup/eviction rules, key and record types, and the
//! port traits implemented by `pl-infra` and `pl-platform`.

pub mod app_dirs;
pub mod clipboard;
pub mod config;
pub mod history;
pub mod ids;
pub mod ports;
pub mod security;
pub mod snippet;

// Re-export commonly used types at the crate root
pub use clipboard::{ChangeToken, ClipboardPayload, ClipboardRead};
pub use config::AppConfig;
pub use history::{
    EntryKind, HistoryEntry, HistoryList, HistoryNotice, HistorySnapshot, HistorySource,
    LoadedHistory, DEFAULT_MAX_HISTORY,
};
pub use ids::{BlobId, EntryId};
pub use security::{EncryptionError, EncryptionKey, SecretAddress};
