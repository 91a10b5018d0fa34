//! # Dependency Injection
//!
//! Builds every adapter from the resolved [`AppConfig`] and assembles the
//! capture engine over them. This is the only place that names concrete
//! adapter types.

use std::sync::Arc;

use anyhow::anyhow;
use tracing::{info, warn};

use pl_app::{CaptureDeps, CaptureEngine};
use pl_core::clipboard::{ChangeToken, ClipboardPayload, ClipboardRead};
use pl_core::config::{AppConfig, SECURE_STORE_MEMORY, SECURE_STORE_SYSTEM};
use pl_core::ports::{
    HistoryStorePort, KeyVaultPort, RecordCipherPort, SecureStoragePort, StateStorePort,
    SystemClipboardPort,
};
use pl_infra::{
    AesGcmCipher, EncryptedHistoryStore, EncryptedImageStore, ExclusionList, FileStateStore,
    KeyVault, SnippetLibrary, SystemClock,
};
use pl_platform::{ClipboardRsClipboard, InMemorySecureStorage, SystemSecureStorage};

use super::observer::LoggingObserver;

/// Result type for wiring operations
pub type WiringResult<T> = Result<T, WiringError>;

/// Errors during dependency injection
#[derive(Debug, thiserror::Error)]
pub enum WiringError {
    #[error("Secure storage initialization failed: {0}")]
    SecureStorageInit(String),

    #[error("Clipboard initialization failed: {0}")]
    ClipboardInit(String),

    #[error("Settings initialization failed: {0}")]
    SettingsInit(String),
}

/// How the system clipboard is required by the command being run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardMode {
    /// Capture needs a working clipboard; failing to open it is fatal.
    Required,
    /// Maintenance commands run without one if it cannot be opened.
    BestEffort,
}

/// Everything the commands operate on.
pub struct AppServices {
    pub engine: Arc<CaptureEngine>,
    pub exclusions: Arc<ExclusionList>,
    pub snippets: Arc<SnippetLibrary>,
}

/// Stand-in clipboard for hosts without a display server.
///
/// Reads as permanently empty and refuses writes.
struct UnavailableClipboard;

impl SystemClipboardPort for UnavailableClipboard {
    fn change_token(&self) -> anyhow::Result<ChangeToken> {
        Ok(ChangeToken::default())
    }

    fn read(&self) -> anyhow::Result<ClipboardRead> {
        Ok(ClipboardRead::empty())
    }

    fn write(&self, _payload: ClipboardPayload) -> anyhow::Result<()> {
        Err(anyhow!("system clipboard is not available"))
    }
}

fn create_secure_storage(config: &AppConfig) -> WiringResult<Arc<dyn SecureStoragePort>> {
    match config.secure_store.as_str() {
        SECURE_STORE_SYSTEM => Ok(Arc::new(SystemSecureStorage::new())),
        SECURE_STORE_MEMORY => {
            warn!("using process-local secure storage; the key is lost on exit");
            Ok(Arc::new(InMemorySecureStorage::new()))
        }
        other => Err(WiringError::SecureStorageInit(format!(
            "unknown secure_store `{other}` (expected `{SECURE_STORE_SYSTEM}` or `{SECURE_STORE_MEMORY}`)"
        ))),
    }
}

fn create_clipboard(mode: ClipboardMode) -> WiringResult<Arc<dyn SystemClipboardPort>> {
    match ClipboardRsClipboard::new() {
        Ok(clipboard) => Ok(Arc::new(clipboard)),
        Err(e) if mode == ClipboardMode::BestEffort => {
            warn!(error = %e, "system clipboard unavailable; continuing without it");
            Ok(Arc::new(UnavailableClipboard))
        }
        Err(e) => Err(WiringError::ClipboardInit(e.to_string())),
    }
}

/// Wire all dependencies with the system clipboard.
pub async fn wire_dependencies(
    config: &AppConfig,
    mode: ClipboardMode,
) -> WiringResult<AppServices> {
    let clipboard = create_clipboard(mode)?;
    wire_with_clipboard(config, clipboard).await
}

/// Wire all dependencies around an already constructed clipboard.
pub async fn wire_with_clipboard(
    config: &AppConfig,
    clipboard: Arc<dyn SystemClipboardPort>,
) -> WiringResult<AppServices> {
    let storage = create_secure_storage(config)?;
    let vault_port: Arc<dyn KeyVaultPort> = Arc::new(KeyVault::new(
        storage,
        config.keyring_service.clone(),
        config.keyring_account.clone(),
    ));
    let cipher: Arc<dyn RecordCipherPort> = Arc::new(AesGcmCipher::new(vault_port.clone()));

    let state: Arc<dyn StateStorePort> = Arc::new(FileStateStore::new(config.state_dir()));
    let history_store: Arc<dyn HistoryStorePort> = Arc::new(EncryptedHistoryStore::new(
        state.clone(),
        cipher.clone(),
        vault_port.clone(),
    ));
    let blobs = Arc::new(EncryptedImageStore::new(config.image_dir(), cipher));

    let exclusions = Arc::new(
        ExclusionList::load(state.clone())
            .await
            .map_err(|e| WiringError::SettingsInit(format!("{e:#}")))?,
    );
    let snippets = Arc::new(
        SnippetLibrary::load(state)
            .await
            .map_err(|e| WiringError::SettingsInit(format!("{e:#}")))?,
    );

    let engine = Arc::new(CaptureEngine::new(
        CaptureDeps {
            clipboard,
            blobs,
            history_store,
            key_vault: vault_port,
            exclusions: exclusions.clone(),
            observer: Arc::new(LoggingObserver),
            clock: Arc::new(SystemClock),
        },
        config.max_history,
    ));

    info!(
        data_dir = %config.data_dir.display(),
        secure_store = %config.secure_store,
        max_history = config.max_history,
        "dependencies wired"
    );

    Ok(AppServices {
        engine,
        exclusions,
        snippets,
    })
}
