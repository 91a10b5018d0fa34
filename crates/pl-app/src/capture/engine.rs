use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use tokio::sync::Mutex;
use tracing::{debug, info, info_span, warn, Instrument};

use pl_core::clipboard::{ChangeToken, ClipboardPayload};
use pl_core::history::{HistoryEntry, HistoryList, HistoryNotice, HistorySnapshot, HistorySource};
use pl_core::ids::EntryId;
use pl_core::ports::{
    ClockPort, ExclusionPolicyPort, HistoryObserverPort, HistoryStorePort, ImageBlobStorePort,
    KeyVaultPort, SystemClipboardPort,
};

use super::CaptureDeps;

struct EngineState {
    last_token: ChangeToken,
    history: HistoryList,
    /// The stored record could not be read at startup and must not be
    /// overwritten until it has been loaded and merged.
    load_pending: bool,
}

/// Owns the history list and every mutation of it.
///
/// All operations serialize on one lock, so a poll never interleaves with a
/// paste, a clear or a rotation.
pub struct CaptureEngine {
    clipboard: Arc<dyn SystemClipboardPort>,
    blobs: Arc<dyn ImageBlobStorePort>,
    history_store: Arc<dyn HistoryStorePort>,
    key_vault: Arc<dyn KeyVaultPort>,
    exclusions: Arc<dyn ExclusionPolicyPort>,
    observer: Arc<dyn HistoryObserverPort>,
    clock: Arc<dyn ClockPort>,
    state: Mutex<EngineState>,
}

impl CaptureEngine {
    pub fn new(deps: CaptureDeps, max_history: usize) -> Self {
        Self {
            clipboard: deps.clipboard,
            blobs: deps.blobs,
            history_store: deps.history_store,
            key_vault: deps.key_vault,
            exclusions: deps.exclusions,
            observer: deps.observer,
            clock: deps.clock,
            state: Mutex::new(EngineState {
                last_token: ChangeToken::default(),
                history: HistoryList::new(max_history),
                load_pending: false,
            }),
        }
    }

    /// Load persisted history and sample the clipboard's current token, so
    /// whatever is on the clipboard at launch is not captured.
    ///
    /// Raises [`HistoryNotice::DataLoss`] when the history was sealed under a
    /// key that no longer exists.
    pub async fn start(&self) -> HistorySource {
        let span = info_span!("usecase.capture.start");
        self.start_inner().instrument(span).await
    }

    async fn start_inner(&self) -> HistorySource {
        let mut state = self.state.lock().await;

        let loaded = self.history_store.load().await;
        let source = loaded.source;
        let lost_key = loaded.is_unrecoverable();
        state.load_pending = loaded.is_unavailable();
        let mut history = HistoryList::from_entries(loaded.entries, state.history.capacity());

        let overflow = history.enforce_capacity();
        for evicted in &overflow {
            self.release_blob(evicted).await;
        }
        state.history = history;

        if lost_key {
            warn!("history was sealed under a lost key and has been reset");
            self.observer.notice(HistoryNotice::DataLoss);
        }
        if state.load_pending {
            warn!("stored history could not be read; it will be loaded before the next save");
        }
        if !overflow.is_empty() {
            debug!(evicted = overflow.len(), "trimmed loaded history to capacity");
            self.persist(&mut state).await;
        }

        match self.clipboard.change_token() {
            Ok(token) => state.last_token = token,
            Err(e) => warn!(error = %e, "could not sample clipboard change token"),
        }

        info!(source = ?source, entries = state.history.len(), "capture engine started");
        self.observer.history_changed(state.history.snapshot());
        source
    }

    /// Check the clipboard once and capture whatever changed.
    ///
    /// Returns the id of the entry placed at the head, if any.
    pub async fn poll_once(&self) -> Result<Option<EntryId>> {
        let token = self
            .clipboard
            .change_token()
            .context("read clipboard change token")?;

        let mut state = self.state.lock().await;
        if token == state.last_token {
            return Ok(None);
        }
        // Recorded before classification so a failure below is not retried.
        state.last_token = token;

        let span = info_span!("usecase.capture.poll", token = %token);
        self.capture_locked(&mut state).instrument(span).await
    }

    async fn capture_locked(&self, state: &mut EngineState) -> Result<Option<EntryId>> {
        let read = self.clipboard.read().context("read clipboard")?;

        if let Some(app) = read.source_app.as_deref() {
            if self.exclusions.is_excluded(app) {
                debug!(source_app = app, "capture suppressed for excluded app");
                return Ok(None);
            }
        }

        let entry = match read.payload {
            Some(ClipboardPayload::Image(png)) => match self.blobs.save(&png).await {
                Ok(blob_id) => HistoryEntry::image(blob_id, self.clock.now()),
                Err(e) => {
                    warn!(error = %e, "failed to store captured image");
                    return Ok(None);
                }
            },
            Some(ClipboardPayload::Text(text)) => {
                let repeats_head = state
                    .history
                    .head()
                    .is_some_and(|head| head.is_text() && head.text_preview == text);
                if repeats_head {
                    debug!("text repeats the newest entry; skipped");
                    return Ok(None);
                }
                HistoryEntry::text(text, self.clock.now())
            }
            None => return Ok(None),
        };

        let id = entry.id.clone();
        self.insert(state, entry).await;
        Ok(Some(id))
    }

    /// Place `entry` at the head, dropping any equal entry elsewhere.
    pub async fn add_entry(&self, entry: HistoryEntry) {
        let mut state = self.state.lock().await;
        self.insert(&mut state, entry).await;
    }

    /// Write an entry back onto the clipboard.
    pub async fn paste(&self, entry: &HistoryEntry) -> Result<()> {
        let payload = match &entry.image_ref {
            Some(blob_id) if entry.is_image() => {
                let png = self
                    .blobs
                    .load(blob_id)
                    .await
                    .ok_or_else(|| anyhow!("image {} is no longer available", blob_id))?;
                ClipboardPayload::Image(png)
            }
            _ => ClipboardPayload::Text(entry.text_preview.clone()),
        };
        self.write_clipboard(payload).await
    }

    /// Write text onto the clipboard without recording it in history.
    pub async fn paste_text(&self, text: &str) -> Result<()> {
        self.write_clipboard(ClipboardPayload::Text(text.to_string()))
            .await
    }

    /// Paste the entry with `id`. Returns `false` when no such entry exists.
    pub async fn request_paste(&self, id: &EntryId) -> Result<bool> {
        let entry = {
            let state = self.state.lock().await;
            state.history.get(id).cloned()
        };
        match entry {
            Some(entry) => {
                self.paste(&entry).await?;
                Ok(true)
            }
            None => {
                debug!(entry_id = %id, "paste requested for unknown entry");
                Ok(false)
            }
        }
    }

    /// Empty the history, remove every image blob and persist the empty list.
    pub async fn clear_history(&self) -> Result<()> {
        let span = info_span!("usecase.capture.clear");
        self.clear_inner().instrument(span).await
    }

    async fn clear_inner(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        let removed = state.history.clear();
        state.load_pending = false;

        let blobs_result = self.blobs.delete_all().await;
        if let Err(e) = &blobs_result {
            warn!(error = %e, "failed to remove image blobs");
        }

        self.persist(&mut state).await;
        self.observer.history_changed(state.history.snapshot());
        info!(removed = removed.len(), "history cleared");

        blobs_result.context("remove image blobs")
    }

    pub async fn request_clear(&self) -> Result<()> {
        self.clear_history().await
    }

    /// Replace the encryption key and immediately re-seal the history and
    /// every image blob under it.
    pub async fn rotate_key(&self) -> Result<()> {
        let span = info_span!("usecase.capture.rotate_key");
        self.rotate_inner().instrument(span).await
    }

    async fn rotate_inner(&self) -> Result<()> {
        let mut state = self.state.lock().await;

        if state.load_pending && !self.reconcile(&mut state).await {
            return Err(anyhow!(
                "stored history has not been loaded yet; key was not rotated"
            ));
        }

        // Read under the old key before it is replaced.
        let mut images = Vec::new();
        for entry in state.history.iter().filter(|e| e.is_image()) {
            let Some(blob_id) = entry.image_ref.as_ref() else {
                continue;
            };
            match self.blobs.load(blob_id).await {
                Some(png) => images.push((blob_id.clone(), png)),
                None => warn!(blob_id = %blob_id, "image blob unreadable before rotation"),
            }
        }

        self.key_vault.rotate().context("rotate encryption key")?;

        let mut failed = 0usize;
        for (blob_id, png) in &images {
            if let Err(e) = self.blobs.replace(blob_id, png).await {
                warn!(blob_id = %blob_id, error = %e, "failed to re-seal image blob");
                failed += 1;
            }
        }

        if !self.persist(&mut state).await {
            return Err(anyhow!(
                "key rotated but history could not be re-saved; it will be retried on the next save"
            ));
        }
        self.observer.history_changed(state.history.snapshot());
        info!(
            entries = state.history.len(),
            images = images.len() - failed,
            "history re-sealed under new key"
        );
        if failed > 0 {
            return Err(anyhow!(
                "{} of {} images could not be re-encrypted",
                failed,
                images.len()
            ));
        }
        Ok(())
    }

    pub async fn snapshot(&self) -> HistorySnapshot {
        self.state.lock().await.history.snapshot()
    }

    /// Decrypted PNG bytes of an image entry's blob.
    pub async fn image_bytes(&self, entry: &HistoryEntry) -> Option<Vec<u8>> {
        let blob_id = entry.image_ref.as_ref()?;
        self.blobs.load(blob_id).await
    }

    async fn insert(&self, state: &mut EngineState, entry: HistoryEntry) {
        debug!(entry_id = %entry.id, kind = ?entry.kind, "adding history entry");
        if let Some(evicted) = state.history.insert_front(entry) {
            debug!(entry_id = %evicted.id, "evicted oldest entry");
            self.release_blob(&evicted).await;
        }
        self.persist(state).await;
        self.observer.history_changed(state.history.snapshot());
    }

    async fn release_blob(&self, entry: &HistoryEntry) {
        if let (true, Some(blob_id)) = (entry.is_image(), entry.image_ref.as_ref()) {
            self.blobs.delete(blob_id).await;
        }
    }

    async fn persist(&self, state: &mut EngineState) -> bool {
        if state.load_pending && !self.reconcile(state).await {
            debug!("stored history still unreadable; save deferred");
            self.observer.notice(HistoryNotice::PersistFailed);
            return false;
        }
        let saved = self.history_store.save(state.history.entries()).await;
        if !saved {
            self.observer.notice(HistoryNotice::PersistFailed);
        }
        saved
    }

    /// Retry the load that failed at startup and fold the entries captured
    /// since then on top of it. Returns `false` while the store is still
    /// unreadable.
    async fn reconcile(&self, state: &mut EngineState) -> bool {
        let loaded = self.history_store.load().await;
        if loaded.is_unavailable() {
            return false;
        }
        if loaded.is_unrecoverable() {
            warn!("history was sealed under a lost key and has been reset");
            self.observer.notice(HistoryNotice::DataLoss);
        }

        let stored = loaded.entries.len();
        let mut merged = HistoryList::from_entries(loaded.entries, state.history.capacity());
        let mut dropped = merged.enforce_capacity();
        for entry in state.history.entries().iter().rev() {
            dropped.extend(merged.insert_front(entry.clone()));
        }
        for entry in &dropped {
            self.release_blob(entry).await;
        }

        state.history = merged;
        state.load_pending = false;
        info!(
            stored,
            entries = state.history.len(),
            "stored history loaded and merged"
        );
        true
    }

    async fn write_clipboard(&self, payload: ClipboardPayload) -> Result<()> {
        let mut state = self.state.lock().await;
        self.clipboard
            .write(payload)
            .context("write clipboard")?;
        // Our own write must not come back as a capture.
        match self.clipboard.change_token() {
            Ok(token) => state.last_token = token,
            Err(e) => warn!(error = %e, "could not sample clipboard change token after paste"),
        }
        Ok(())
    }
}
