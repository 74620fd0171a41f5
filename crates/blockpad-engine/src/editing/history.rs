use log::debug;

use crate::model::Document;

/// One snapshot in the history log.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub content: Document,
}

/// Linear undo/redo log of document snapshots.
///
/// Recording after an undo discards the entries ahead of the cursor. Undo and
/// redo only move the cursor; they never add or remove entries. Entries are
/// owned clones, so later changes to the live document cannot reach them.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<HistoryEntry>,
    /// `None` while empty; otherwise always `< entries.len()`.
    index: Option<usize>,
    limit: Option<usize>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// History that keeps at most `limit` entries, evicting the oldest.
    pub fn with_capacity_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit.max(1)),
            ..Self::default()
        }
    }

    /// Record `document` unless it equals the snapshot at the cursor.
    ///
    /// Returns whether a new entry was appended.
    pub fn record(&mut self, document: &Document) -> bool {
        if let Some(current) = self.current()
            && current == document
        {
            return false;
        }

        let keep = self.index.map_or(0, |i| i + 1);
        let discarded = self.entries.len() - keep;
        self.entries.truncate(keep);
        self.entries.push(HistoryEntry {
            content: document.clone(),
        });

        if let Some(limit) = self.limit
            && self.entries.len() > limit
        {
            let overflow = self.entries.len() - limit;
            self.entries.drain(..overflow);
        }
        self.index = Some(self.entries.len() - 1);

        debug!(
            "history: recorded entry {} of {} ({} discarded)",
            self.entries.len() - 1,
            self.entries.len(),
            discarded
        );
        true
    }

    /// Step back one snapshot. `None` (no-op) at the oldest entry or when empty.
    pub fn undo(&mut self) -> Option<&Document> {
        let index = self.index.filter(|&i| i > 0)? - 1;
        self.index = Some(index);
        debug!("history: undo to {index}");
        Some(&self.entries[index].content)
    }

    /// Step forward one snapshot. `None` (no-op) at the newest entry or when empty.
    pub fn redo(&mut self) -> Option<&Document> {
        let index = self.index.filter(|&i| i + 1 < self.entries.len())? + 1;
        self.index = Some(index);
        debug!("history: redo to {index}");
        Some(&self.entries[index].content)
    }

    pub fn current(&self) -> Option<&Document> {
        self.index.map(|i| &self.entries[i].content)
    }

    /// Cursor position, `None` while the history is empty.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        self.index.is_some_and(|i| i > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.index.is_some_and(|i| i + 1 < self.entries.len())
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index = None;
    }
}
