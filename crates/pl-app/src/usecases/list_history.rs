use std::sync::Arc;

use chrono::{DateTime, Utc};

use pl_core::history::{EntryKind, HistoryEntry};
use pl_core::ids::EntryId;

use crate::capture::CaptureEngine;

/// Longest preview handed to the render layer, in characters.
pub const PREVIEW_MAX_CHARS: usize = 100;

/// One row of the rendered history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryItemView {
    pub id: EntryId,
    pub kind: EntryKind,
    /// First line of the content, trimmed and shortened.
    pub preview: String,
    pub captured_at: DateTime<Utc>,
}

impl From<&HistoryEntry> for HistoryItemView {
    fn from(entry: &HistoryEntry) -> Self {
        Self {
            id: entry.id.clone(),
            kind: entry.kind,
            preview: preview_of(&entry.text_preview),
            captured_at: entry.captured_at,
        }
    }
}

fn preview_of(content: &str) -> String {
    let line = content
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("");
    if line.chars().count() > PREVIEW_MAX_CHARS {
        let cut: String = line.chars().take(PREVIEW_MAX_CHARS).collect();
        format!("{cut}…")
    } else {
        line.to_string()
    }
}

/// Newest-first rows for the current history.
pub struct ListHistory {
    engine: Arc<CaptureEngine>,
}

impl ListHistory {
    pub fn new(engine: Arc<CaptureEngine>) -> Self {
        Self { engine }
    }

    pub async fn execute(&self) -> Vec<HistoryItemView> {
        self.engine
            .snapshot()
            .await
            .iter()
            .map(HistoryItemView::from)
            .collect()
    }
}
