//! Port interfaces for the application layer
//!
//! Ports define the contract between the use cases in `pl-app` and the
//! adapters in `pl-infra` / `pl-platform`. The capture engine only ever talks
//! to these traits, so every adapter can be swapped for an in-memory fake.

pub mod app_dirs;
mod blob_store;
mod clipboard;
mod clock;
pub mod errors;
mod exclusion;
mod history_store;
mod observer;
pub mod security;
mod snippet_store;
mod state_store;

pub use app_dirs::AppDirsPort;
pub use blob_store::ImageBlobStorePort;
pub use clipboard::SystemClipboardPort;
pub use clock::ClockPort;
pub use errors::{AppDirsError, BlobStoreError, StateStoreError};
pub use exclusion::{ExclusionPolicyPort, NoExclusions};
pub use history_store::HistoryStorePort;
pub use observer::{HistoryObserverPort, NoopObserver};
pub use security::cipher::RecordCipherPort;
pub use security::key_vault::KeyVaultPort;
pub use security::secure_storage::{SecureStorageError, SecureStoragePort};
pub use snippet_store::SnippetStorePort;
pub use state_store::StateStorePort;
