//! Linear undo/redo over full object-list snapshots.
//!
//! Index 0 is the baseline (the list as loaded or last saved). The cursor
//! points at the snapshot that matches the working list. Recording while the
//! cursor is behind the tail discards the redo branch; there is no branching
//! history.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use crate::doc::MapObject;

/// Snapshot history with a cursor.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: Vec<Vec<MapObject>>,
    cursor: usize,
}

impl History {
    /// Start a history whose baseline is `baseline`.
    #[must_use]
    pub fn new(baseline: Vec<MapObject>) -> Self {
        Self { snapshots: vec![baseline], cursor: 0 }
    }

    /// Append `objects` as the newest snapshot, dropping anything after the cursor.
    pub fn record(&mut self, objects: Vec<MapObject>) {
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(objects);
        self.cursor = self.snapshots.len() - 1;
    }

    /// Step back one snapshot. `None` at the baseline.
    pub fn undo(&mut self) -> Option<&[MapObject]> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.snapshots.get(self.cursor).map(Vec::as_slice)
    }

    /// Step forward one snapshot. `None` at the tail.
    pub fn redo(&mut self) -> Option<&[MapObject]> {
        if self.cursor + 1 >= self.snapshots.len() {
            return None;
        }
        self.cursor += 1;
        self.snapshots.get(self.cursor).map(Vec::as_slice)
    }

    /// Collapse to a single baseline snapshot.
    pub fn reset(&mut self, baseline: Vec<MapObject>) {
        self.snapshots = vec![baseline];
        self.cursor = 0;
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Always false: a history holds at least its baseline.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    /// Whether the cursor sits on the baseline snapshot.
    #[must_use]
    pub fn at_baseline(&self) -> bool {
        self.cursor == 0
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
