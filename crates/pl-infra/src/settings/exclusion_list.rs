use std::collections::BTreeSet;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::{Context, Result};
use tracing::{info, warn};

use pl_core::ports::{ExclusionPolicyPort, StateStorePort};

pub const EXCLUSIONS_STATE_KEY: &str = "ExcludedBundleIDs";

/// Source applications whose clipboard changes are never captured.
pub struct ExclusionList {
    state: Arc<dyn StateStorePort>,
    ids: RwLock<BTreeSet<String>>,
}

impl ExclusionList {
    /// Load the persisted list. A missing or corrupt entry yields an empty
    /// list; a store that cannot be read is an error.
    pub async fn load(state: Arc<dyn StateStorePort>) -> Result<Self> {
        let ids = match state.get(EXCLUSIONS_STATE_KEY).await {
            Ok(Some(bytes)) => match serde_json::from_slice::<Vec<String>>(&bytes) {
                Ok(ids) => ids.into_iter().collect(),
                Err(e) => {
                    warn!(error = %e, "excluded app list is not valid JSON; starting empty");
                    BTreeSet::new()
                }
            },
            Ok(None) => BTreeSet::new(),
            Err(e) => return Err(e).context("read excluded app list"),
        };
        Ok(Self {
            state,
            ids: RwLock::new(ids),
        })
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeSet<String>> {
        self.ids.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeSet<String>> {
        self.ids.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn list(&self) -> Vec<String> {
        self.read().iter().cloned().collect()
    }

    /// Returns whether the id was newly added.
    pub async fn add(&self, app_id: &str) -> Result<bool> {
        let app_id = app_id.trim();
        if app_id.is_empty() {
            return Ok(false);
        }
        let added = self.write().insert(app_id.to_string());
        if added {
            if let Err(e) = self.persist().await {
                self.write().remove(app_id);
                return Err(e);
            }
            info!(app_id, "app excluded from capture");
        }
        Ok(added)
    }

    /// Returns whether the id was present.
    pub async fn remove(&self, app_id: &str) -> Result<bool> {
        let app_id = app_id.trim();
        let removed = self.write().remove(app_id);
        if removed {
            if let Err(e) = self.persist().await {
                self.write().insert(app_id.to_string());
                return Err(e);
            }
            info!(app_id, "app exclusion removed");
        }
        Ok(removed)
    }

    async fn persist(&self) -> Result<()> {
        let snapshot = self.list();
        let bytes = serde_json::to_vec(&snapshot).context("serialize excluded app list")?;
        self.state
            .set(EXCLUSIONS_STATE_KEY, &bytes)
            .await
            .context("persist excluded app list")
    }
}

impl ExclusionPolicyPort for ExclusionList {
    fn is_excluded(&self, source_app_id: &str) -> bool {
        self.read().contains(source_app_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;
    use pl_core::ports::StateStoreError;
    use tempfile::TempDir;

    use crate::state::FileStateStore;

    /// File-backed state whose reads or writes can be switched off.
    struct FlakyState {
        inner: FileStateStore,
        fail_get: AtomicBool,
        fail_set: AtomicBool,
    }

    impl FlakyState {
        fn new(tmp: &TempDir) -> Self {
            Self {
                inner: FileStateStore::new(tmp.path()),
                fail_get: AtomicBool::new(false),
                fail_set: AtomicBool::new(false),
            }
        }
    }

    #[async_trait]
    impl StateStorePort for FlakyState {
        async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StateStoreError> {
            if self.fail_get.load(Ordering::SeqCst) {
                return Err(StateStoreError::Io("read refused".into()));
            }
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: &[u8]) -> Result<(), StateStoreError> {
            if self.fail_set.load(Ordering::SeqCst) {
                return Err(StateStoreError::Io("disk full".into()));
            }
            self.inner.set(key, value).await
        }

        async fn remove(&self, key: &str) -> Result<(), StateStoreError> {
            self.inner.remove(key).await
        }
    }

    fn state_in(tmp: &TempDir) -> Arc<dyn StateStorePort> {
        Arc::new(FileStateStore::new(tmp.path()))
    }

    #[tokio::test]
    async fn starts_empty_and_excludes_nothing() {
        let tmp = TempDir::new().unwrap();
        let list = ExclusionList::load(state_in(&tmp)).await.unwrap();

        assert!(list.list().is_empty());
        assert!(!list.is_excluded("com.example.vault"));
    }

    #[tokio::test]
    async fn additions_persist_across_loads() {
        let tmp = TempDir::new().unwrap();
        let list = ExclusionList::load(state_in(&tmp)).await.unwrap();

        assert!(list.add("com.example.vault").await.unwrap());
        assert!(!list.add("com.example.vault").await.unwrap());
        assert!(!list.add("   ").await.unwrap());

        let reloaded = ExclusionList::load(state_in(&tmp)).await.unwrap();
        assert!(reloaded.is_excluded("com.example.vault"));
        assert_eq!(reloaded.list(), vec!["com.example.vault".to_string()]);
    }

    #[tokio::test]
    async fn removal_persists() {
        let tmp = TempDir::new().unwrap();
        let list = ExclusionList::load(state_in(&tmp)).await.unwrap();
        list.add("a.b.c").await.unwrap();

        assert!(list.remove("a.b.c").await.unwrap());
        assert!(!list.remove("a.b.c").await.unwrap());

        let reloaded = ExclusionList::load(state_in(&tmp)).await.unwrap();
        assert!(!reloaded.is_excluded("a.b.c"));
    }

    #[tokio::test]
    async fn corrupt_entry_loads_empty() {
        let tmp = TempDir::new().unwrap();
        let state = state_in(&tmp);
        state.set(EXCLUSIONS_STATE_KEY, b"not json").await.unwrap();

        let list = ExclusionList::load(state).await.unwrap();
        assert!(list.list().is_empty());
    }

    #[tokio::test]
    async fn failed_add_is_rolled_back() {
        let tmp = TempDir::new().unwrap();
        let state = Arc::new(FlakyState::new(&tmp));
        let list = ExclusionList::load(state.clone()).await.unwrap();
        state.fail_set.store(true, Ordering::SeqCst);

        assert!(list.add("com.example.vault").await.is_err());

        assert!(!list.is_excluded("com.example.vault"));
        assert!(list.list().is_empty());
    }

    #[tokio::test]
    async fn failed_remove_is_rolled_back() {
        let tmp = TempDir::new().unwrap();
        let state = Arc::new(FlakyState::new(&tmp));
        let list = ExclusionList::load(state.clone()).await.unwrap();
        list.add("a.b.c").await.unwrap();
        state.fail_set.store(true, Ordering::SeqCst);

        assert!(list.remove(" a.b.c ").await.is_err());

        assert!(list.is_excluded("a.b.c"));
        state.fail_set.store(false, Ordering::SeqCst);
        let reloaded = ExclusionList::load(state).await.unwrap();
        assert!(reloaded.is_excluded("a.b.c"));
    }

    #[tokio::test]
    async fn unreadable_store_fails_to_load() {
        let tmp = TempDir::new().unwrap();
        let state = Arc::new(FlakyState::new(&tmp));
        ExclusionList::load(state.clone())
            .await
            .unwrap()
            .add("a.b.c")
            .await
            .unwrap();
        state.fail_get.store(true, Ordering::SeqCst);

        assert!(ExclusionList::load(state.clone()).await.is_err());

        state.fail_get.store(false, Ordering::SeqCst);
        let reloaded = ExclusionList::load(state).await.unwrap();
        assert!(reloaded.is_excluded("a.b.c"));
    }
}
