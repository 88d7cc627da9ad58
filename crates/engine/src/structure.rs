//! Structural edits: row and column insertion and deletion.
//!
//! Each operation takes the current snapshot and a 0-based structural index
//! and produces a new snapshot with every cell identifier recomputed and
//! the affected sizing entries shifted. Maps are fully rebuilt rather than
//! mutated in place, so identifiers can never collide mid-shift.
//!
//! Formulas are not re-evaluated: a formula cell's stored value travels
//! with it even though the references in its formula text may now point at
//! shifted data.

use rustc_hash::FxHashMap;

use crate::address;
use crate::snapshot::{CellMap, SheetSnapshot, DEFAULT_COLUMN_WIDTH, DEFAULT_ROW_HEIGHT};

/// Insert an empty row at index `at`; rows at or below it shift down.
pub fn insert_row(snapshot: &SheetSnapshot, at: usize) -> SheetSnapshot {
    let cells = remap_cells(&snapshot.cells, |row, col| {
        if row >= at {
            (row + 1, col)
        } else {
            (row, col)
        }
    });

    // Height entries are keyed by 1-based row number
    let mut row_heights = FxHashMap::default();
    for (key, height) in &snapshot.row_heights {
        match key.parse::<usize>() {
            Ok(n) if n >= at + 1 => row_heights.insert((n + 1).to_string(), *height),
            _ => row_heights.insert(key.clone(), *height),
        };
    }
    row_heights.insert((at + 1).to_string(), DEFAULT_ROW_HEIGHT);

    SheetSnapshot {
        cells,
        column_widths: snapshot.column_widths.clone(),
        row_heights,
        total_rows: snapshot.total_rows + 1,
        total_columns: snapshot.total_columns,
    }
}

/// Insert an empty column at index `at`; columns at or right of it shift.
pub fn insert_column(snapshot: &SheetSnapshot, at: usize) -> SheetSnapshot {
    let cells = remap_cells(&snapshot.cells, |row, col| {
        if col >= at {
            (row, col + 1)
        } else {
            (row, col)
        }
    });

    let mut column_widths = FxHashMap::default();
    for (label, width) in &snapshot.column_widths {
        match address::column_index(label) {
            Some(col) if col >= at => {
                column_widths.insert(address::column_label(col + 1), *width)
            }
            _ => column_widths.insert(label.clone(), *width),
        };
    }
    column_widths.insert(address::column_label(at), DEFAULT_COLUMN_WIDTH);

    SheetSnapshot {
        cells,
        column_widths,
        row_heights: snapshot.row_heights.clone(),
        total_rows: snapshot.total_rows,
        total_columns: snapshot.total_columns + 1,
    }
}

/// Delete the row at `index`; rows below shift up. Silently refuses when
/// only one row remains or the index is out of range.
pub fn delete_row(snapshot: &SheetSnapshot, index: usize) -> SheetSnapshot {
    if snapshot.total_rows <= 1 || index >= snapshot.total_rows {
        return snapshot.clone();
    }

    let mut cells = CellMap::default();
    for (id, cell) in &snapshot.cells {
        match address::from_identifier(id) {
            Ok((row, _)) if row == index => continue,
            Ok((row, col)) if row > index => {
                cells.insert(address::to_identifier(row - 1, col), cell.clone());
            }
            _ => {
                cells.insert(id.clone(), cell.clone());
            }
        }
    }

    let mut row_heights = FxHashMap::default();
    for (key, height) in &snapshot.row_heights {
        match key.parse::<usize>() {
            Ok(n) if n == index + 1 => continue,
            Ok(n) if n > index + 1 => {
                row_heights.insert((n - 1).to_string(), *height);
            }
            _ => {
                row_heights.insert(key.clone(), *height);
            }
        }
    }

    SheetSnapshot {
        cells,
        column_widths: snapshot.column_widths.clone(),
        row_heights,
        total_rows: snapshot.total_rows - 1,
        total_columns: snapshot.total_columns,
    }
}

/// Delete the column at `index`; columns right of it shift left. Silently
/// refuses when only one column remains or the index is out of range.
pub fn delete_column(snapshot: &SheetSnapshot, index: usize) -> SheetSnapshot {
    if snapshot.total_columns <= 1 || index >= snapshot.total_columns {
        return snapshot.clone();
    }

    let mut cells = CellMap::default();
    for (id, cell) in &snapshot.cells {
        match address::from_identifier(id) {
            Ok((_, col)) if col == index => continue,
            Ok((row, col)) if col > index => {
                cells.insert(address::to_identifier(row, col - 1), cell.clone());
            }
            _ => {
                cells.insert(id.clone(), cell.clone());
            }
        }
    }

    let mut column_widths = FxHashMap::default();
    for (label, width) in &snapshot.column_widths {
        match address::column_index(label) {
            Some(col) if col == index => continue,
            Some(col) if col > index => {
                column_widths.insert(address::column_label(col - 1), *width);
            }
            _ => {
                column_widths.insert(label.clone(), *width);
            }
        }
    }

    SheetSnapshot {
        cells,
        column_widths,
        row_heights: snapshot.row_heights.clone(),
        total_rows: snapshot.total_rows,
        total_columns: snapshot.total_columns - 1,
    }
}

/// Rebuild the cell map, relocating every parsable identifier through
/// `shift`. Keys that don't parse are carried over untouched.
fn remap_cells(
    cells: &CellMap,
    shift: impl Fn(usize, usize) -> (usize, usize),
) -> CellMap {
    let mut remapped = CellMap::default();
    for (id, cell) in cells {
        match address::from_identifier(id) {
            Ok((row, col)) => {
                let (row, col) = shift(row, col);
                remapped.insert(address::to_identifier(row, col), cell.clone());
            }
            Err(_) => {
                remapped.insert(id.clone(), cell.clone());
            }
        }
    }
    remapped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Cell;

    fn sheet(rows: usize, cols: usize, entries: &[(&str, &str)]) -> SheetSnapshot {
        let mut snapshot = SheetSnapshot::new(rows, cols);
        for (id, value) in entries {
            snapshot
                .cells
                .insert(id.to_string(), Cell::literal(value));
        }
        snapshot
    }

    #[test]
    fn test_insert_row_shifts_cells_below() {
        let snapshot = sheet(5, 5, &[("A1", "top"), ("A2", "mid"), ("A4", "low")]);
        let result = insert_row(&snapshot, 1);

        assert_eq!(result.total_rows, 6);
        assert_eq!(result.display_value("A1"), "top"); // row 0 untouched
        assert!(result.cell("A2").is_none()); // opened row is empty
        assert_eq!(result.display_value("A3"), "mid");
        assert_eq!(result.display_value("A5"), "low");
    }

    #[test]
    fn test_insert_row_shifts_heights_and_adds_default() {
        let mut snapshot = sheet(5, 5, &[]);
        snapshot.row_heights.insert("1".to_string(), 40.0);
        snapshot.row_heights.insert("3".to_string(), 60.0);

        let result = insert_row(&snapshot, 1);

        assert_eq!(result.row_heights.get("1"), Some(&40.0));
        assert_eq!(result.row_heights.get("2"), Some(&DEFAULT_ROW_HEIGHT));
        assert_eq!(result.row_heights.get("4"), Some(&60.0));
        assert!(result.row_heights.get("3").is_none());
    }

    #[test]
    fn test_insert_column_shifts_cells_and_widths() {
        let mut snapshot = sheet(5, 3, &[("A1", "keep"), ("B1", "move"), ("C2", "too")]);
        snapshot.column_widths.insert("B".to_string(), 150.0);

        let result = insert_column(&snapshot, 1);

        assert_eq!(result.total_columns, 4);
        assert_eq!(result.display_value("A1"), "keep");
        assert!(result.cell("B1").is_none());
        assert_eq!(result.display_value("C1"), "move");
        assert_eq!(result.display_value("D2"), "too");
        assert_eq!(result.column_widths.get("C"), Some(&150.0));
        assert_eq!(result.column_widths.get("B"), Some(&DEFAULT_COLUMN_WIDTH));
    }

    #[test]
    fn test_delete_row_drops_and_shifts() {
        let mut snapshot = sheet(5, 5, &[("A1", "top"), ("A2", "gone"), ("A3", "low")]);
        snapshot.row_heights.insert("2".to_string(), 50.0);
        snapshot.row_heights.insert("3".to_string(), 60.0);

        let result = delete_row(&snapshot, 1);

        assert_eq!(result.total_rows, 4);
        assert_eq!(result.display_value("A1"), "top");
        assert_eq!(result.display_value("A2"), "low");
        assert!(result.cell("A3").is_none());
        assert_eq!(result.row_heights.get("2"), Some(&60.0));
    }

    #[test]
    fn test_delete_column_drops_and_shifts() {
        let mut snapshot = sheet(5, 3, &[("A1", "keep"), ("B1", "gone"), ("C1", "move")]);
        snapshot.column_widths.insert("C".to_string(), 170.0);

        let result = delete_column(&snapshot, 1);

        assert_eq!(result.total_columns, 2);
        assert_eq!(result.display_value("A1"), "keep");
        assert_eq!(result.display_value("B1"), "move");
        assert!(result.cell("C1").is_none());
        assert_eq!(result.column_widths.get("B"), Some(&170.0));
    }

    #[test]
    fn test_delete_last_row_is_noop() {
        let snapshot = sheet(1, 5, &[("A1", "only")]);
        let result = delete_row(&snapshot, 0);
        assert_eq!(result, snapshot);
    }

    #[test]
    fn test_delete_last_column_is_noop() {
        let snapshot = sheet(5, 1, &[("A1", "only")]);
        let result = delete_column(&snapshot, 0);
        assert_eq!(result, snapshot);
    }

    #[test]
    fn test_delete_out_of_range_is_noop() {
        let snapshot = sheet(3, 3, &[("A1", "x")]);
        assert_eq!(delete_row(&snapshot, 3), snapshot);
        assert_eq!(delete_column(&snapshot, 7), snapshot);
    }

    #[test]
    fn test_insert_then_delete_is_identity() {
        let mut snapshot = sheet(4, 4, &[("A1", "a"), ("B2", "b"), ("C4", "c")]);
        snapshot.row_heights.insert("2".to_string(), 33.0);
        snapshot.row_heights.insert("4".to_string(), 44.0);

        for at in 0..4 {
            let round = delete_row(&insert_row(&snapshot, at), at);
            assert_eq!(round.cells, snapshot.cells, "row index {}", at);
            assert_eq!(round.total_rows, snapshot.total_rows);
            assert_eq!(round.row_heights, snapshot.row_heights);

            let round = delete_column(&insert_column(&snapshot, at), at);
            assert_eq!(round.cells, snapshot.cells, "column index {}", at);
            assert_eq!(round.total_columns, snapshot.total_columns);
            assert_eq!(round.column_widths, snapshot.column_widths);
        }
    }

    #[test]
    fn test_formula_values_are_not_reevaluated() {
        let mut snapshot = sheet(5, 5, &[("A1", "1"), ("A2", "2")]);
        snapshot.cells.insert(
            "B1".to_string(),
            Cell {
                value: "3".to_string(),
                formula: "=SUM(A1:A2)".to_string(),
                style: Default::default(),
            },
        );

        // Inserting a row above shifts the formula cell but keeps its
        // stored value and formula text byte for byte.
        let result = insert_row(&snapshot, 0);
        let moved = result.cell("B2").expect("shifted formula cell");
        assert_eq!(moved.value, "3");
        assert_eq!(moved.formula, "=SUM(A1:A2)");
    }

    #[test]
    fn test_remap_past_column_z() {
        let snapshot = sheet(3, 30, &[("Z1", "z"), ("AA1", "aa")]);
        let result = insert_column(&snapshot, 0);
        assert_eq!(result.display_value("AA1"), "z");
        assert_eq!(result.display_value("AB1"), "aa");
    }
}
