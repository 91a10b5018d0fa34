//! # pl-infra
//!
//! Storage and crypto adapters: the key vault, the record cipher, the
//! encrypted history and image stores, and the plain settings namespace.

pub mod history;
pub mod security;
pub mod settings;
pub mod state;
pub mod time;

pub use history::EncryptedHistoryStore;
pub use security::{AesGcmCipher, EncryptedImageStore, KeyVault};
pub use settings::{ExclusionList, SnippetLibrary};
pub use state::FileStateStore;
pub use time::SystemClock;
