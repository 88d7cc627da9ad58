//! The orchestrating state container.
//!
//! `SheetStore` owns the live snapshot and exposes the mutation API the
//! rendering layer calls. Every mutating entry point follows the same
//! pattern: validate, checkpoint the pre-mutation snapshot, apply the
//! change, bump the revision, notify subscribers. Structural no-ops
//! (deleting the last row/column) return before checkpointing so they are
//! invisible to history.

use crate::address::{self, AddressError};
use crate::cell::{Cell, StylePatch};
use crate::events::{EventCallback, StoreEvent};
use crate::formula::{self, ERROR_TOKEN};
use crate::history::History;
use crate::snapshot::SheetSnapshot;
use crate::structure;

pub struct SheetStore {
    snapshot: SheetSnapshot,
    history: History,
    selected_cell: Option<String>,
    revision: u64,
    subscribers: Vec<EventCallback>,
}

impl Default for SheetStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SheetStore {
    /// A store over a fresh default-sized sheet.
    pub fn new() -> Self {
        Self::from_snapshot(SheetSnapshot::default())
    }

    pub fn with_dimensions(total_rows: usize, total_columns: usize) -> Self {
        Self::from_snapshot(SheetSnapshot::new(total_rows, total_columns))
    }

    /// Adopt an externally loaded snapshot. The caller is responsible for
    /// having validated it (minimum one row and column).
    pub fn from_snapshot(snapshot: SheetSnapshot) -> Self {
        Self {
            snapshot,
            history: History::new(),
            selected_cell: None,
            revision: 0,
            subscribers: Vec::new(),
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn snapshot(&self) -> &SheetSnapshot {
        &self.snapshot
    }

    pub fn cell(&self, id: &str) -> Option<&Cell> {
        self.snapshot.cell(id)
    }

    pub fn display_value(&self, id: &str) -> &str {
        self.snapshot.display_value(id)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn selected_cell(&self) -> Option<&str> {
        self.selected_cell.as_deref()
    }

    // =========================================================================
    // Observers
    // =========================================================================

    /// Register a callback invoked after every applied mutation.
    pub fn subscribe(&mut self, callback: EventCallback) {
        self.subscribers.push(callback);
    }

    fn notify(&mut self, event: StoreEvent) {
        for subscriber in &mut self.subscribers {
            subscriber(&event);
        }
    }

    fn bump(&mut self) -> u64 {
        self.revision += 1;
        self.revision
    }

    // =========================================================================
    // Cell mutations
    // =========================================================================

    /// Selection is view state, not sheet state: no history entry.
    pub fn set_selected_cell(&mut self, id: Option<&str>) -> Result<(), AddressError> {
        if let Some(id) = id {
            address::from_identifier(id)?;
        }
        self.selected_cell = id.map(str::to_string);
        Ok(())
    }

    /// Write a literal. Clears any formula the cell had.
    pub fn set_cell_value(&mut self, id: &str, value: &str) -> Result<(), AddressError> {
        address::from_identifier(id)?;
        self.history.checkpoint(&self.snapshot);

        let cell = self.snapshot.cells.entry(id.to_string()).or_default();
        cell.value = value.to_string();
        cell.formula.clear();

        let revision = self.bump();
        self.notify(StoreEvent::CellsChanged {
            revision,
            cells: vec![id.to_string()],
        });
        Ok(())
    }

    /// Write a formula and eagerly store its evaluation as the display
    /// value. The stored value is not recomputed when upstream cells
    /// change later.
    pub fn set_cell_formula(&mut self, id: &str, formula_text: &str) -> Result<(), AddressError> {
        address::from_identifier(id)?;
        self.history.checkpoint(&self.snapshot);

        // Ensure the cell exists before evaluation so a self-reference
        // reads its previous value, then store formula and result.
        self.snapshot.cells.entry(id.to_string()).or_default();
        let value = formula::evaluate(formula_text, &self.snapshot.cells);
        if let Some(cell) = self.snapshot.cells.get_mut(id) {
            cell.formula = formula_text.to_string();
            cell.value = value;
        }

        let revision = self.bump();
        self.notify(StoreEvent::CellsChanged {
            revision,
            cells: vec![id.to_string()],
        });
        Ok(())
    }

    /// Merge a partial style over the cell's current (or default) style.
    pub fn set_cell_style(&mut self, id: &str, patch: &StylePatch) -> Result<(), AddressError> {
        address::from_identifier(id)?;
        self.history.checkpoint(&self.snapshot);

        let cell = self.snapshot.cells.entry(id.to_string()).or_default();
        patch.apply(&mut cell.style);

        let revision = self.bump();
        self.notify(StoreEvent::CellsChanged {
            revision,
            cells: vec![id.to_string()],
        });
        Ok(())
    }

    // =========================================================================
    // Sizing
    // =========================================================================

    pub fn set_column_width(&mut self, label: &str, width: f64) {
        self.history.checkpoint(&self.snapshot);
        self.snapshot
            .column_widths
            .insert(label.to_string(), width);
        let revision = self.bump();
        self.notify(StoreEvent::SizingChanged { revision });
    }

    pub fn set_row_height(&mut self, label: &str, height: f64) {
        self.history.checkpoint(&self.snapshot);
        self.snapshot.row_heights.insert(label.to_string(), height);
        let revision = self.bump();
        self.notify(StoreEvent::SizingChanged { revision });
    }

    // =========================================================================
    // Structural edits
    // =========================================================================

    /// Insert an empty row after the given 0-based index.
    pub fn add_row(&mut self, after_index: usize) {
        self.history.checkpoint(&self.snapshot);
        self.snapshot = structure::insert_row(&self.snapshot, after_index + 1);
        let revision = self.bump();
        self.notify(StoreEvent::StructureChanged { revision });
    }

    /// Insert an empty column after the given 0-based index.
    pub fn add_column(&mut self, after_index: usize) {
        self.history.checkpoint(&self.snapshot);
        self.snapshot = structure::insert_column(&self.snapshot, after_index + 1);
        let revision = self.bump();
        self.notify(StoreEvent::StructureChanged { revision });
    }

    /// Delete the row at the given index. Deleting the last remaining row
    /// (or an out-of-range index) is a true no-op: no history entry, no
    /// event.
    pub fn delete_row(&mut self, index: usize) {
        if self.snapshot.total_rows <= 1 || index >= self.snapshot.total_rows {
            return;
        }
        self.history.checkpoint(&self.snapshot);
        self.snapshot = structure::delete_row(&self.snapshot, index);
        let revision = self.bump();
        self.notify(StoreEvent::StructureChanged { revision });
    }

    /// Delete the column at the given index; same no-op rules as rows.
    pub fn delete_column(&mut self, index: usize) {
        if self.snapshot.total_columns <= 1 || index >= self.snapshot.total_columns {
            return;
        }
        self.history.checkpoint(&self.snapshot);
        self.snapshot = structure::delete_column(&self.snapshot, index);
        let revision = self.bump();
        self.notify(StoreEvent::StructureChanged { revision });
    }

    // =========================================================================
    // History
    // =========================================================================

    pub fn undo(&mut self) {
        if let Some(previous) = self.history.undo(&self.snapshot) {
            self.snapshot = previous;
            let revision = self.bump();
            self.notify(StoreEvent::HistoryRestored { revision });
        }
    }

    pub fn redo(&mut self) {
        if let Some(next) = self.history.redo(&self.snapshot) {
            self.snapshot = next;
            let revision = self.bump();
            self.notify(StoreEvent::HistoryRestored { revision });
        }
    }

    // =========================================================================
    // Find & replace
    // =========================================================================

    /// Replace every occurrence of `find` in cell values and formula text.
    /// Rewritten formulas are re-evaluated eagerly; a failure becomes the
    /// error token for that cell without aborting the pass. If the scan
    /// changes nothing, the checkpoint is discarded so history is
    /// untouched.
    pub fn find_and_replace(&mut self, find: &str, replace: &str) {
        if find.is_empty() {
            return;
        }
        self.history.checkpoint(&self.snapshot);

        let mut affected = Vec::new();
        // Deterministic scan order; later formula re-evaluations see
        // earlier replacements.
        for id in self.snapshot.cell_ids_ordered() {
            let (value_hit, new_formula) = {
                let cell = match self.snapshot.cells.get(&id) {
                    Some(cell) => cell,
                    None => continue,
                };
                let value_hit = !cell.value.is_empty() && cell.value.contains(find);
                let new_formula = (!cell.formula.is_empty() && cell.formula.contains(find))
                    .then(|| cell.formula.replace(find, replace));
                (value_hit, new_formula)
            };

            if !value_hit && new_formula.is_none() {
                continue;
            }

            if value_hit {
                if let Some(cell) = self.snapshot.cells.get_mut(&id) {
                    cell.value = cell.value.replace(find, replace);
                }
            }

            if let Some(new_formula) = new_formula {
                let value = formula::evaluate(&new_formula, &self.snapshot.cells);
                if value == ERROR_TOKEN {
                    log::warn!("formula failed to re-evaluate for {} after replace", id);
                }
                if let Some(cell) = self.snapshot.cells.get_mut(&id) {
                    cell.formula = new_formula;
                    cell.value = value;
                }
            }

            affected.push(id);
        }

        if affected.is_empty() {
            self.history.discard_last_checkpoint();
            return;
        }

        let revision = self.bump();
        self.notify(StoreEvent::CellsChanged {
            revision,
            cells: affected,
        });
    }
}
