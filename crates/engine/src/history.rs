//! Undo/redo history for sheet snapshots.
//!
//! Every mutation checkpoints the full snapshot before it is applied. Undo
//! and redo transfer entries between the two stacks, always pushing the
//! caller's current snapshot onto the opposite side so the operation is
//! symmetric. Entries are deep copies (`Clone` of the snapshot) with no
//! aliasing against the live state.

use crate::snapshot::SheetSnapshot;

#[derive(Default)]
pub struct History {
    undo_stack: Vec<SheetSnapshot>,
    redo_stack: Vec<SheetSnapshot>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the pre-mutation state. New mutations invalidate any redo
    /// entries.
    pub fn checkpoint(&mut self, current: &SheetSnapshot) {
        self.undo_stack.push(current.clone());
        self.redo_stack.clear();
    }

    /// Drop the most recent checkpoint. Used when a compound operation
    /// turns out to have changed nothing, so an ineffective pass does not
    /// pollute history.
    pub fn discard_last_checkpoint(&mut self) {
        self.undo_stack.pop();
    }

    /// Pop the snapshot to restore, saving `current` for redo. `None` when
    /// there is nothing to undo.
    pub fn undo(&mut self, current: &SheetSnapshot) -> Option<SheetSnapshot> {
        let entry = self.undo_stack.pop()?;
        self.redo_stack.push(current.clone());
        Some(entry)
    }

    /// Pop the snapshot to restore, saving `current` for undo. `None` when
    /// there is nothing to redo.
    pub fn redo(&mut self, current: &SheetSnapshot) -> Option<SheetSnapshot> {
        let entry = self.redo_stack.pop()?;
        self.undo_stack.push(current.clone());
        Some(entry)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Cell;

    fn snapshot_with(id: &str, value: &str) -> SheetSnapshot {
        let mut snapshot = SheetSnapshot::new(10, 10);
        snapshot.cells.insert(id.to_string(), Cell::literal(value));
        snapshot
    }

    #[test]
    fn test_empty_history() {
        let mut history = History::new();
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert!(history.undo(&SheetSnapshot::default()).is_none());
        assert!(history.redo(&SheetSnapshot::default()).is_none());
    }

    #[test]
    fn test_checkpoint_then_undo() {
        let mut history = History::new();
        let before = snapshot_with("A1", "old");
        let after = snapshot_with("A1", "new");

        history.checkpoint(&before);
        assert!(history.can_undo());

        let restored = history.undo(&after).expect("entry");
        assert_eq!(restored, before);
        assert!(!history.can_undo());
        assert!(history.can_redo());

        let redone = history.redo(&before).expect("entry");
        assert_eq!(redone, after);
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_checkpoint_clears_redo() {
        let mut history = History::new();
        let s1 = snapshot_with("A1", "1");
        let s2 = snapshot_with("A1", "2");

        history.checkpoint(&s1);
        history.undo(&s2);
        assert!(history.can_redo());

        history.checkpoint(&s1);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_discard_last_checkpoint() {
        let mut history = History::new();
        history.checkpoint(&snapshot_with("A1", "x"));
        history.discard_last_checkpoint();
        assert!(!history.can_undo());

        // Discarding on an empty stack is harmless
        history.discard_last_checkpoint();
        assert!(!history.can_undo());
    }

    #[test]
    fn test_entries_do_not_alias_live_state() {
        let mut history = History::new();
        let mut live = snapshot_with("A1", "original");
        history.checkpoint(&live);

        // Mutating the live snapshot must not affect the stored entry
        live.cells.get_mut("A1").unwrap().value = "mutated".to_string();

        let restored = history.undo(&live).expect("entry");
        assert_eq!(restored.cells["A1"].value, "original");
    }
}
