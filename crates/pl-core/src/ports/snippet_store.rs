use async_trait::async_trait;

use crate::snippet::{Snippet, SnippetFolder};

/// User snippet folders in the plain settings namespace.
#[async_trait]
pub trait SnippetStorePort: Send + Sync {
    async fn folders(&self) -> Vec<SnippetFolder>;

    /// Append to the folder at `folder_index`. Returns `false` when no such
    /// folder exists.
    async fn add_snippet(&self, folder_index: usize, snippet: Snippet) -> anyhow::Result<bool>;

    /// Discard user folders and restore the example set.
    async fn reset_to_factory(&self) -> anyhow::Result<()>;
}
