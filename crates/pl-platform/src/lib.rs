//! # pl-platform
//!
//! OS adapters: the system clipboard, the credential store and the
//! per-installation directories.

pub mod app_dirs;
pub mod clipboard;
pub mod secure_storage;

pub use app_dirs::DirsAppDirsAdapter;
pub use clipboard::{ChangeTracker, ClipboardRsClipboard};
pub use secure_storage::{InMemorySecureStorage, SystemSecureStorage};
