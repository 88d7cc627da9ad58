use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::address;
use crate::cell::Cell;

pub const DEFAULT_COLUMN_WIDTH: f64 = 100.0;
pub const DEFAULT_ROW_HEIGHT: f64 = 24.0;
pub const DEFAULT_ROWS: usize = 100;
pub const DEFAULT_COLUMNS: usize = 100;

/// Cells keyed by display identifier ("A1", "B12", ...).
pub type CellMap = FxHashMap<String, Cell>;

/// The full mutable state of a sheet at one instant.
///
/// Cells absent from the map are implicitly empty with default style.
/// Sizing maps are keyed by column label and 1-based row number strings.
/// Serialized field names match the camelCase wire form of the persisted
/// blob (`columnWidths`, `totalRows`, ...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SheetSnapshot {
    pub cells: CellMap,
    pub column_widths: FxHashMap<String, f64>,
    pub row_heights: FxHashMap<String, f64>,
    pub total_rows: usize,
    pub total_columns: usize,
}

impl Default for SheetSnapshot {
    fn default() -> Self {
        Self::new(DEFAULT_ROWS, DEFAULT_COLUMNS)
    }
}

impl SheetSnapshot {
    /// A fresh sheet with the given bounds, no cells, and a default width
    /// entry for every addressable column.
    pub fn new(total_rows: usize, total_columns: usize) -> Self {
        let mut column_widths = FxHashMap::default();
        for col in 0..total_columns {
            column_widths.insert(address::column_label(col), DEFAULT_COLUMN_WIDTH);
        }
        Self {
            cells: CellMap::default(),
            column_widths,
            row_heights: FxHashMap::default(),
            total_rows,
            total_columns,
        }
    }

    pub fn cell(&self, id: &str) -> Option<&Cell> {
        self.cells.get(id)
    }

    /// The display string for a cell; empty for absent cells.
    pub fn display_value(&self, id: &str) -> &str {
        self.cells.get(id).map(|c| c.value.as_str()).unwrap_or("")
    }

    pub fn column_width(&self, label: &str) -> f64 {
        self.column_widths
            .get(label)
            .copied()
            .unwrap_or(DEFAULT_COLUMN_WIDTH)
    }

    pub fn row_height(&self, label: &str) -> f64 {
        self.row_heights
            .get(label)
            .copied()
            .unwrap_or(DEFAULT_ROW_HEIGHT)
    }

    /// All populated cell identifiers in (row, col) order.
    ///
    /// Keys that do not parse as identifiers sort last, by string. Scans
    /// that mutate while iterating (find/replace) rely on this order being
    /// deterministic.
    pub fn cell_ids_ordered(&self) -> Vec<String> {
        let mut ids: Vec<&String> = self.cells.keys().collect();
        ids.sort_by_key(|id| match address::from_identifier(id) {
            Ok((row, col)) => (0, row, col, String::new()),
            Err(_) => (1, 0, 0, (*id).clone()),
        });
        ids.into_iter().cloned().collect()
    }
}
