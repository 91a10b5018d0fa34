mod deps;
mod engine;
mod watcher;

pub use deps::CaptureDeps;
pub use engine::CaptureEngine;
pub use watcher::PollingWatcher;
