mod change_tracker;
mod clipboard_rs_adapter;

pub use change_tracker::ChangeTracker;
pub use clipboard_rs_adapter::ClipboardRsClipboard;
