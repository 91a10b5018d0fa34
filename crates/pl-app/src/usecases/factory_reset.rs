use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, info_span, Instrument};

use pl_core::ports::SnippetStorePort;

use crate::capture::CaptureEngine;

/// Restore snippets to the example set and wipe history and image blobs.
pub struct FactoryReset {
    snippets: Arc<dyn SnippetStorePort>,
    engine: Arc<CaptureEngine>,
}

impl FactoryReset {
    pub fn new(snippets: Arc<dyn SnippetStorePort>, engine: Arc<CaptureEngine>) -> Self {
        Self { snippets, engine }
    }

    pub async fn execute(&self) -> Result<()> {
        let span = info_span!("usecase.factory_reset.execute");
        self.run().instrument(span).await
    }

    async fn run(&self) -> Result<()> {
        self.snippets
            .reset_to_factory()
            .await
            .context("reset snippets")?;
        self.engine.clear_history().await.context("clear history")?;
        info!("factory reset complete");
        Ok(())
    }
}
