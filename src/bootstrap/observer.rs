use pl_core::history::{HistoryNotice, HistorySnapshot};
use pl_core::ports::HistoryObserverPort;
use tracing::{debug, error, warn};

/// Observer for the headless binary: history changes and notices go to the log.
#[derive(Debug, Default)]
pub struct LoggingObserver;

impl HistoryObserverPort for LoggingObserver {
    fn history_changed(&self, snapshot: HistorySnapshot) {
        debug!(entries = snapshot.len(), "history changed");
    }

    fn notice(&self, notice: HistoryNotice) {
        match notice {
            HistoryNotice::DataLoss => error!(
                "clipboard history was encrypted with a key that is no longer in the \
                 credential store; previous history could not be recovered and has been reset"
            ),
            HistoryNotice::PersistFailed => {
                warn!("clipboard history could not be saved; changes are kept in memory")
            }
        }
    }
}
