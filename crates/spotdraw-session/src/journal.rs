//! The pick journal: insertion-ordered log of applied picks.
//!
//! Each valid pick appends one entry; undo pops the newest. The journal is
//! what makes `pick; undo; pick` indistinguishable from a single pick.

use spotdraw_types::{ParticipantId, SpotId};

/// One applied pick: the spots a participant took during one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickEntry {
    pub participant: ParticipantId,
    /// The spots this pick assigned (whole linked group for linked spots).
    pub spots: Vec<SpotId>,
    /// Index of the turn (rank) the pick was applied at.
    pub turn: usize,
}

/// Insertion-ordered pick log (newest last).
#[derive(Debug, Clone, Default)]
pub struct PickJournal {
    entries: Vec<PickEntry>,
}

impl PickJournal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: PickEntry) {
        self.entries.push(entry);
    }

    /// Remove and return the newest entry, if any.
    pub fn pop(&mut self) -> Option<PickEntry> {
        self.entries.pop()
    }

    #[must_use]
    pub fn last(&self) -> Option<&PickEntry> {
        self.entries.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
