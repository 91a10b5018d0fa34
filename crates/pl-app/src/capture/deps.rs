use std::sync::Arc;

use pl_core::ports::{
    ClockPort, ExclusionPolicyPort, HistoryObserverPort, HistoryStorePort, ImageBlobStorePort,
    KeyVaultPort, SystemClipboardPort,
};

/// Ports the capture engine is assembled from.
///
/// Grouped so construction sites (bootstrap, tests) fill them by name.
pub struct CaptureDeps {
    pub clipboard: Arc<dyn SystemClipboardPort>,
    pub blobs: Arc<dyn ImageBlobStorePort>,
    pub history_store: Arc<dyn HistoryStorePort>,
    pub key_vault: Arc<dyn KeyVaultPort>,
    pub exclusions: Arc<dyn ExclusionPolicyPort>,
    pub observer: Arc<dyn HistoryObserverPort>,
    pub clock: Arc<dyn ClockPort>,
}
