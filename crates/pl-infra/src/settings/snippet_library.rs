use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use pl_core::ports::{SnippetStorePort, StateStorePort};
use pl_core::snippet::{example_folders, Snippet, SnippetFolder};

pub const SNIPPETS_STATE_KEY: &str = "SavedSnippets";

/// User snippet folders, stored as plain JSON.
pub struct SnippetLibrary {
    state: Arc<dyn StateStorePort>,
    folders: Mutex<Vec<SnippetFolder>>,
}

impl SnippetLibrary {
    /// Load saved folders, seeding the examples when nothing usable is stored.
    /// A store that cannot be read is an error and nothing is written.
    pub async fn load(state: Arc<dyn StateStorePort>) -> Result<Self> {
        let stored = match state.get(SNIPPETS_STATE_KEY).await {
            Ok(Some(bytes)) => match serde_json::from_slice::<Vec<SnippetFolder>>(&bytes) {
                Ok(folders) => folders,
                Err(e) => {
                    warn!(error = %e, "saved snippets are not valid JSON; reseeding");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => return Err(e).context("read saved snippets"),
        };

        let library = Self {
            state,
            folders: Mutex::new(Vec::new()),
        };

        if stored.is_empty() {
            library.seed().await?;
        } else {
            debug!(folders = stored.len(), "snippets loaded");
            *library.folders.lock().await = stored;
        }
        Ok(library)
    }

    async fn seed(&self) -> Result<()> {
        let mut folders = self.folders.lock().await;
        *folders = example_folders();
        self.persist(&folders).await
    }

    async fn persist(&self, folders: &[SnippetFolder]) -> Result<()> {
        let bytes = serde_json::to_vec(folders).context("serialize snippets")?;
        self.state
            .set(SNIPPETS_STATE_KEY, &bytes)
            .await
            .context("persist snippets")
    }
}

#[async_trait]
impl SnippetStorePort for SnippetLibrary {
    async fn folders(&self) -> Vec<SnippetFolder> {
        self.folders.lock().await.clone()
    }

    /// Append a snippet to a folder. An out-of-range index is ignored.
    async fn add_snippet(&self, folder_index: usize, snippet: Snippet) -> Result<bool> {
        let mut folders = self.folders.lock().await;
        let Some(folder) = folders.get_mut(folder_index) else {
            debug!(folder_index, "no such snippet folder");
            return Ok(false);
        };
        folder.snippets.push(snippet);
        self.persist(&folders).await?;
        Ok(true)
    }

    /// Drop the stored folders and write the examples again.
    async fn reset_to_factory(&self) -> Result<()> {
        self.state
            .remove(SNIPPETS_STATE_KEY)
            .await
            .context("remove saved snippets")?;
        self.seed().await?;
        info!("snippets reset to factory state");
        Ok(())
    }
}
