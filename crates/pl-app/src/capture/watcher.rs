use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::AbortHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::CaptureEngine;

/// Drives [`CaptureEngine::poll_once`] on a fixed interval.
///
/// The platform clipboard has no change subscription, so capture latency is
/// bounded by the interval.
pub struct PollingWatcher {
    engine: Arc<CaptureEngine>,
    period: Duration,
    task: Mutex<Option<AbortHandle>>,
}

impl PollingWatcher {
    pub fn new(engine: Arc<CaptureEngine>, period: Duration) -> Self {
        Self {
            engine,
            period,
            task: Mutex::new(None),
        }
    }

    /// Start polling. Returns `false` if already running.
    pub async fn start(&self) -> bool {
        let mut task = self.task.lock().await;
        if task.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return false;
        }

        let engine = Arc::clone(&self.engine);
        let period = self.period;
        let handle = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                match engine.poll_once().await {
                    Ok(Some(entry_id)) => debug!(entry_id = %entry_id, "captured clipboard change"),
                    Ok(None) => {}
                    Err(e) => warn!(error = %e, "clipboard poll failed"),
                }
            }
        });

        *task = Some(handle.abort_handle());
        info!(period_ms = period.as_millis() as u64, "clipboard watcher started");
        true
    }

    pub async fn stop(&self) {
        if let Some(handle) = self.task.lock().await.take() {
            handle.abort();
            info!("clipboard watcher stopped");
        }
    }

    pub async fn is_running(&self) -> bool {
        self.task
            .lock()
            .await
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}
