//! # Configuration DTO
//!
//! `from_toml` maps data only: missing values become empty/zero facts.
//! `resolve` is the single place where defaults are applied.

use std::path::PathBuf;

use crate::history::DEFAULT_MAX_HISTORY;

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;
pub const DEFAULT_KEYRING_SERVICE: &str = "pastelet";
pub const DEFAULT_KEYRING_ACCOUNT: &str = "pastelet.encryptionKey";
pub const SECURE_STORE_SYSTEM: &str = "system";
pub const SECURE_STORE_MEMORY: &str = "memory";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Maximum number of history entries kept.
    pub max_history: usize,

    /// Clipboard poll interval.
    pub poll_interval_ms: u64,

    /// Per-installation data directory (history state, images, logs).
    pub data_dir: PathBuf,

    /// Credential store address of the encryption key.
    pub keyring_service: String,
    pub keyring_account: String,

    /// `"system"` for the OS credential store, `"memory"` for a
    /// process-local store (tests, throwaway sessions).
    pub secure_store: String,
}

impl AppConfig {
    /// Create AppConfig from a TOML value.
    ///
    /// ```toml
    /// [history]
    /// max_entries = 50
    /// poll_interval_ms = 500
    ///
    /// [storage]
    /// data_dir = "/path/to/data"
    ///
    /// [security]
    /// keyring_service = "pastelet"
    /// keyring_account = "pastelet.encryptionKey"
    /// secure_store = "system"
    /// ```
    pub fn from_toml(toml_value: &toml::Value) -> anyhow::Result<Self> {
        let str_at = |section: &str, key: &str| -> String {
            toml_value
                .get(section)
                .and_then(|s| s.get(key))
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string()
        };
        let int_at = |section: &str, key: &str| -> i64 {
            toml_value
                .get(section)
                .and_then(|s| s.get(key))
                .and_then(|v| v.as_integer())
                .unwrap_or(0)
        };

        Ok(Self {
            max_history: int_at("history", "max_entries").max(0) as usize,
            poll_interval_ms: int_at("history", "poll_interval_ms").max(0) as u64,
            data_dir: PathBuf::from(str_at("storage", "data_dir")),
            keyring_service: str_at("security", "keyring_service"),
            keyring_account: str_at("security", "keyring_account"),
            secure_store: str_at("security", "secure_store"),
        })
    }

    /// Create empty AppConfig (all empty/zero values).
    pub fn empty() -> Self {
        Self {
            max_history: 0,
            poll_interval_ms: 0,
            data_dir: PathBuf::new(),
            keyring_service: String::new(),
            keyring_account: String::new(),
            secure_store: String::new(),
        }
    }

    /// Create AppConfig with every default filled in, rooted at `data_dir`.
    pub fn with_system_defaults(data_dir: PathBuf) -> Self {
        Self::empty().resolve(data_dir)
    }

    /// Replace empty/zero facts with defaults. `default_data_dir` is only
    /// used when no data directory was configured.
    pub fn resolve(self, default_data_dir: PathBuf) -> Self {
        Self {
            max_history: if self.max_history == 0 {
                DEFAULT_MAX_HISTORY
            } else {
                self.max_history
            },
            poll_interval_ms: if self.poll_interval_ms == 0 {
                DEFAULT_POLL_INTERVAL_MS
            } else {
                self.poll_interval_ms
            },
            data_dir: if self.data_dir.as_os_str().is_empty() {
                default_data_dir
            } else {
                self.data_dir
            },
            keyring_service: non_empty_or(self.keyring_service, DEFAULT_KEYRING_SERVICE),
            keyring_account: non_empty_or(self.keyring_account, DEFAULT_KEYRING_ACCOUNT),
            secure_store: non_empty_or(self.secure_store, SECURE_STORE_SYSTEM),
        }
    }

    pub fn image_dir(&self) -> PathBuf {
        self.data_dir.join("Images")
    }

    pub fn state_dir(&self) -> PathBuf {
        self.data_dir.join("state")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}

fn non_empty_or(value: String, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value
    }
}
