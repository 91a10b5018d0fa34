use std::sync::Arc;

use crate::history::entry::HistoryEntry;
use crate::ids::EntryId;

pub const DEFAULT_MAX_HISTORY: usize = 50;

/// Read-only, order-preserving view handed to observers.
pub type HistorySnapshot = Arc<[HistoryEntry]>;

/// Newest-first, bounded list of history entries.
///
/// Only the capture engine mutates it; observers receive
/// [`HistorySnapshot`]s and never alias the live list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryList {
    entries: Vec<HistoryEntry>,
    capacity: usize,
}

impl HistoryList {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity.min(1024) + 1),
            capacity: capacity.max(1),
        }
    }

    /// Builds a list from persisted entries without applying the bound.
    ///
    /// Call [`HistoryList::enforce_capacity`] afterwards to release whatever
    /// no longer fits.
    pub fn from_entries(entries: Vec<HistoryEntry>, capacity: usize) -> Self {
        Self {
            entries,
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recently added entry.
    pub fn head(&self) -> Option<&HistoryEntry> {
        self.entries.first()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HistoryEntry> {
        self.entries.iter()
    }

    pub fn get(&self, id: &EntryId) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| &e.id == id)
    }

    pub fn snapshot(&self) -> HistorySnapshot {
        Arc::from(self.entries.as_slice())
    }

    /// Inserts `entry` at the head.
    ///
    /// Any entry equal to it (see [`HistoryEntry::is_duplicate_of`]) is removed
    /// first, wherever it sits, so a repeat is promoted rather than duplicated.
    /// Returns the tail entry evicted to stay within capacity, if any.
    pub fn insert_front(&mut self, entry: HistoryEntry) -> Option<HistoryEntry> {
        self.entries.retain(|existing| !existing.is_duplicate_of(&entry));
        self.entries.insert(0, entry);

        if self.entries.len() > self.capacity {
            self.entries.pop()
        } else {
            None
        }
    }

    /// Drops tail entries beyond capacity and returns them oldest-last.
    pub fn enforce_capacity(&mut self) -> Vec<HistoryEntry> {
        if self.entries.len() <= self.capacity {
            return Vec::new();
        }
        self.entries.split_off(self.capacity)
    }

    /// Empties the list, returning what was removed.
    pub fn clear(&mut self) -> Vec<HistoryEntry> {
        std::mem::take(&mut self.entries)
    }
}

impl Default for HistoryList {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY)
    }
}
