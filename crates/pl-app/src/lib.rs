//! Pastelet application layer
//!
//! The capture engine, its polling driver and the use cases built on top.
//! Everything here talks to `pl-core` ports only.

pub mod capture;
pub mod usecases;

pub use capture::{CaptureDeps, CaptureEngine, PollingWatcher};
pub use usecases::{FactoryReset, HistoryItemView, ListHistory};
