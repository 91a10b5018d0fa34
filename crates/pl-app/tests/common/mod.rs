#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;

use pl_app::{CaptureDeps, CaptureEngine};
use pl_core::clipboard::{ChangeToken, ClipboardPayload, ClipboardRead};
use pl_core::history::{HistoryEntry, HistoryNotice, HistorySnapshot, LoadedHistory, HistorySource};
use pl_core::ports::{
    HistoryObserverPort, HistoryStorePort, ImageBlobStorePort, KeyVaultPort, NoExclusions,
    RecordCipherPort, SecureStoragePort, StateStorePort, SystemClipboardPort,
};
use pl_infra::{
    AesGcmCipher, EncryptedHistoryStore, EncryptedImageStore, FileStateStore, KeyVault,
    SystemClock,
};
use pl_platform::InMemorySecureStorage;

/// Clipboard whose change counter moves on every `put`.
#[derive(Default)]
pub struct FakeClipboard {
    inner: Mutex<(u64, ClipboardRead)>,
}

impl FakeClipboard {
    pub fn copy_text(&self, text: &str) {
        self.put(ClipboardRead::text(text));
    }

    pub fn copy_image(&self, png: &[u8]) {
        self.put(ClipboardRead::image(png.to_vec()));
    }

    pub fn put(&self, read: ClipboardRead) {
        let mut inner = self.inner.lock().unwrap();
        inner.0 += 1;
        inner.1 = read;
    }

    pub fn payload(&self) -> Option<ClipboardPayload> {
        self.inner.lock().unwrap().1.payload.clone()
    }
}

impl SystemClipboardPort for FakeClipboard {
    fn change_token(&self) -> anyhow::Result<ChangeToken> {
        Ok(ChangeToken(self.inner.lock().unwrap().0))
    }

    fn read(&self) -> anyhow::Result<ClipboardRead> {
        Ok(self.inner.lock().unwrap().1.clone())
    }

    fn write(&self, payload: ClipboardPayload) -> anyhow::Result<()> {
        self.put(ClipboardRead {
            payload: Some(payload),
            source_app: None,
        });
        Ok(())
    }
}

#[derive(Default)]
pub struct Recorder {
    pub snapshots: Mutex<Vec<HistorySnapshot>>,
    pub notices: Mutex<Vec<HistoryNotice>>,
}

impl Recorder {
    pub fn notices(&self) -> Vec<HistoryNotice> {
        self.notices.lock().unwrap().clone()
    }
}

impl HistoryObserverPort for Recorder {
    fn history_changed(&self, snapshot: HistorySnapshot) {
        self.snapshots.lock().unwrap().push(snapshot);
    }

    fn notice(&self, notice: HistoryNotice) {
        self.notices.lock().unwrap().push(notice);
    }
}

/// History store kept in memory, for tests that never touch the disk.
#[derive(Default)]
pub struct MemoryHistoryStore {
    saved: Mutex<Option<Vec<HistoryEntry>>>,
}

#[async_trait]
impl HistoryStorePort for MemoryHistoryStore {
    async fn load(&self) -> LoadedHistory {
        match self.saved.lock().unwrap().clone() {
            Some(entries) => LoadedHistory {
                entries,
                source: HistorySource::Encrypted,
            },
            None => LoadedHistory::empty(HistorySource::Empty),
        }
    }

    async fn save(&self, entries: &[HistoryEntry]) -> bool {
        *self.saved.lock().unwrap() = Some(entries.to_vec());
        true
    }
}

/// The real storage stack over a temp directory and an in-memory keychain.
///
/// Building a second `App` over the same directory and keychain behaves like
/// a relaunch: the vault's key cache starts empty.
pub struct App {
    pub clipboard: Arc<FakeClipboard>,
    pub observer: Arc<Recorder>,
    pub vault: Arc<KeyVault>,
    pub cipher: Arc<AesGcmCipher>,
    pub blobs: Arc<EncryptedImageStore>,
    pub state: Arc<FileStateStore>,
    pub engine: Arc<CaptureEngine>,
}

impl App {
    pub fn build(tmp: &TempDir, keychain: &Arc<InMemorySecureStorage>, max_history: usize) -> Self {
        let clipboard = Arc::new(FakeClipboard::default());
        let observer = Arc::new(Recorder::default());
        let vault = Arc::new(KeyVault::new(
            keychain.clone() as Arc<dyn SecureStoragePort>,
            "pastelet",
            "pastelet.encryptionKey",
        ));
        let cipher = Arc::new(AesGcmCipher::new(vault.clone() as Arc<dyn KeyVaultPort>));
        let blobs = Arc::new(EncryptedImageStore::new(
            tmp.path().join("Images"),
            cipher.clone() as Arc<dyn RecordCipherPort>,
        ));
        let state = Arc::new(FileStateStore::new(tmp.path().join("state")));
        let history_store = Arc::new(EncryptedHistoryStore::new(
            state.clone() as Arc<dyn StateStorePort>,
            cipher.clone() as Arc<dyn RecordCipherPort>,
            vault.clone() as Arc<dyn KeyVaultPort>,
        ));

        let engine = Arc::new(CaptureEngine::new(
            CaptureDeps {
                clipboard: clipboard.clone(),
                blobs: blobs.clone() as Arc<dyn ImageBlobStorePort>,
                history_store,
                key_vault: vault.clone(),
                exclusions: Arc::new(NoExclusions),
                observer: observer.clone(),
                clock: Arc::new(SystemClock),
            },
            max_history,
        ));

        Self {
            clipboard,
            observer,
            vault,
            cipher,
            blobs,
            state,
            engine,
        }
    }
}
