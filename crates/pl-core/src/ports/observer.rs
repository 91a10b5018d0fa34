use crate::history::{HistoryNotice, HistorySnapshot};

/// Render/observe collaborator.
///
/// Called by the capture engine after every mutation, from the engine's own
/// context. Implementations must return promptly.
pub trait HistoryObserverPort: Send + Sync {
    fn history_changed(&self, snapshot: HistorySnapshot);

    fn notice(&self, notice: HistoryNotice);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl HistoryObserverPort for NoopObserver {
    fn history_changed(&self, _snapshot: HistorySnapshot) {}

    fn notice(&self, _notice: HistoryNotice) {}
}
