//! Snapshot-based undo/redo over the note collection.
//!
//! The history is a linear sequence of full-collection snapshots with a single
//! cursor. Saving after an undo discards the entries past the cursor, and the
//! sequence is bounded: once it outgrows its limit the oldest entries are
//! evicted from the front while the cursor keeps pointing at the newest one.
//!
//! Not every edit is recorded. The engine saves only structural changes
//! (create, delete, move, resize, color, import); text typed into a note is
//! captured implicitly by whichever structural snapshot follows it.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::consts::HISTORY_LIMIT;
use crate::doc::Note;

/// What kind of change produced a history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryAction {
    Init,
    Create,
    Delete,
    Move,
    Resize,
    Color,
    Import,
}

impl HistoryAction {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Create => "create",
            Self::Delete => "delete",
            Self::Move => "move",
            Self::Resize => "resize",
            Self::Color => "color",
            Self::Import => "import",
        }
    }
}

impl fmt::Display for HistoryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One snapshot of the full note collection. Entries share the collection
/// with the store that produced it until either side changes.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub notes: Arc<Vec<Note>>,
    pub action: HistoryAction,
}

/// Bounded linear undo/redo history.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    cursor: usize,
    limit: usize,
}

impl History {
    /// Start a history whose only entry is `initial`, labelled `init`.
    #[must_use]
    pub fn new(initial: &[Note]) -> Self {
        Self::with_limit(initial, HISTORY_LIMIT)
    }

    /// Like [`History::new`] with a custom capacity (at least one entry).
    #[must_use]
    pub fn with_limit(initial: &[Note], limit: usize) -> Self {
        let mut history = Self { entries: VecDeque::new(), cursor: 0, limit: limit.max(1) };
        history.reset(initial);
        history
    }

    /// Drop every entry and re-seed with `initial`.
    pub fn reset(&mut self, initial: &[Note]) {
        self.entries.clear();
        self.entries.push_back(HistoryEntry { notes: Arc::new(initial.to_vec()), action: HistoryAction::Init });
        self.cursor = 0;
    }

    /// Record a snapshot of `notes` after the cursor.
    ///
    /// Entries past the cursor are discarded first. When the history exceeds
    /// its limit the oldest entries are evicted.
    pub fn save_state(&mut self, notes: &[Note], action: HistoryAction) {
        self.save_snapshot(Arc::new(notes.to_vec()), action);
    }

    /// [`History::save_state`] for a collection that is already shared, such
    /// as [`crate::doc::NoteStore::snapshot`]. No notes are copied.
    pub fn save_snapshot(&mut self, notes: Arc<Vec<Note>>, action: HistoryAction) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push_back(HistoryEntry { notes, action });
        self.cursor = self.entries.len() - 1;
        while self.entries.len() > self.limit {
            self.entries.pop_front();
            self.cursor -= 1;
        }
        tracing::debug!(%action, cursor = self.cursor, len = self.entries.len(), "history saved");
    }

    /// Step back one entry and return its notes, or `None` at the oldest entry.
    pub fn undo(&mut self) -> Option<&[Note]> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.entries.get(self.cursor).map(|e| e.notes.as_slice())
    }

    /// Step forward one entry and return its notes, or `None` at the newest entry.
    pub fn redo(&mut self) -> Option<&[Note]> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        self.entries.get(self.cursor).map(|e| e.notes.as_slice())
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// The entry the cursor points at.
    #[must_use]
    pub fn current(&self) -> Option<&HistoryEntry> {
        self.entries.get(self.cursor)
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Number of retained entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: a history holds at least its seed entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Retained entries, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }
}
