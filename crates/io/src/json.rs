//! Snapshot blob serialization.
//!
//! The wire form is the five-field camelCase JSON object the engine types
//! serialize to. Loading is permissive: missing fields get defaults, the
//! grid is clamped to at least one row and column, and every addressable
//! column is guaranteed a width entry. The engine expects an already
//! validated snapshot.

use rustc_hash::FxHashMap;
use serde::Deserialize;

use gridsheet_engine::address;
use gridsheet_engine::snapshot::{CellMap, SheetSnapshot, DEFAULT_COLUMN_WIDTH};

use crate::Result;

/// Grid bounds used when a loaded blob carries none.
const FALLBACK_ROWS: usize = 10;
const FALLBACK_COLUMNS: usize = 10;

/// Serialize a snapshot to its JSON blob.
pub fn to_json(snapshot: &SheetSnapshot) -> Result<String> {
    Ok(serde_json::to_string(snapshot)?)
}

/// Permissive counterpart of `SheetSnapshot` for loading: every field is
/// optional in old or hand-edited blobs.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawSnapshot {
    cells: CellMap,
    column_widths: FxHashMap<String, f64>,
    row_heights: FxHashMap<String, f64>,
    total_rows: usize,
    total_columns: usize,
}

/// Parse and validate a snapshot blob.
pub fn from_json(data: &str) -> Result<SheetSnapshot> {
    let raw: RawSnapshot = serde_json::from_str(data)?;

    let total_rows = if raw.total_rows == 0 {
        log::debug!("blob carried no row count, defaulting to {}", FALLBACK_ROWS);
        FALLBACK_ROWS
    } else {
        raw.total_rows
    };
    let total_columns = if raw.total_columns == 0 {
        FALLBACK_COLUMNS
    } else {
        raw.total_columns
    };

    let mut column_widths = raw.column_widths;
    for col in 0..total_columns {
        column_widths
            .entry(address::column_label(col))
            .or_insert(DEFAULT_COLUMN_WIDTH);
    }

    Ok(SheetSnapshot {
        cells: raw.cells,
        column_widths,
        row_heights: raw.row_heights,
        total_rows,
        total_columns,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridsheet_engine::cell::{Cell, TextAlign};

    #[test]
    fn test_round_trip() {
        let mut snapshot = SheetSnapshot::new(20, 5);
        snapshot
            .cells
            .insert("A1".to_string(), Cell::literal("hello"));
        snapshot.cells.insert(
            "B2".to_string(),
            Cell {
                value: "8".to_string(),
                formula: "=SUM(A1:A3)".to_string(),
                style: Default::default(),
            },
        );
        snapshot.column_widths.insert("B".to_string(), 140.0);
        snapshot.row_heights.insert("2".to_string(), 36.0);

        let blob = to_json(&snapshot).unwrap();
        let loaded = from_json(&blob).unwrap();
        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn test_round_trip_preserves_style() {
        let mut snapshot = SheetSnapshot::new(5, 5);
        let mut cell = Cell::literal("styled");
        cell.style.bold = true;
        cell.style.text_align = TextAlign::Right;
        cell.style.color = "#ff00ff".to_string();
        snapshot.cells.insert("C3".to_string(), cell);

        let loaded = from_json(&to_json(&snapshot).unwrap()).unwrap();
        let style = &loaded.cells["C3"].style;
        assert!(style.bold);
        assert_eq!(style.text_align, TextAlign::Right);
        assert_eq!(style.color, "#ff00ff");
    }

    #[test]
    fn test_wire_field_names_are_camel_case() {
        let snapshot = SheetSnapshot::new(2, 2);
        let blob = to_json(&snapshot).unwrap();
        assert!(blob.contains("\"columnWidths\""));
        assert!(blob.contains("\"rowHeights\""));
        assert!(blob.contains("\"totalRows\""));
        assert!(blob.contains("\"totalColumns\""));
    }

    #[test]
    fn test_load_empty_object_gets_defaults() {
        let loaded = from_json("{}").unwrap();
        assert_eq!(loaded.total_rows, FALLBACK_ROWS);
        assert_eq!(loaded.total_columns, FALLBACK_COLUMNS);
        assert!(loaded.cells.is_empty());
        // Widths filled in for every addressable column
        assert_eq!(loaded.column_widths.len(), FALLBACK_COLUMNS);
        assert_eq!(loaded.column_widths.get("A"), Some(&DEFAULT_COLUMN_WIDTH));
    }

    #[test]
    fn test_load_keeps_existing_widths() {
        let blob = r#"{"columnWidths":{"A":55.0},"totalRows":3,"totalColumns":2}"#;
        let loaded = from_json(blob).unwrap();
        assert_eq!(loaded.column_widths.get("A"), Some(&55.0));
        assert_eq!(loaded.column_widths.get("B"), Some(&DEFAULT_COLUMN_WIDTH));
    }

    #[test]
    fn test_load_clamps_to_one_row_and_column() {
        let loaded = from_json(r#"{"totalRows":0,"totalColumns":0}"#).unwrap();
        assert!(loaded.total_rows >= 1);
        assert!(loaded.total_columns >= 1);
    }

    #[test]
    fn test_load_original_wire_form() {
        // A fully populated blob, every field present
        let blob = r##"{
            "cells": {
                "A1": {
                    "value": "10",
                    "formula": "",
                    "style": {
                        "bold": false,
                        "italic": false,
                        "underline": false,
                        "strikethrough": false,
                        "fontSize": 14.0,
                        "color": "#000000",
                        "backgroundColor": "#ffffff",
                        "textAlign": "left",
                        "fontFamily": "Arial, sans-serif"
                    }
                }
            },
            "columnWidths": {"A": 100.0},
            "rowHeights": {"1": 24.0},
            "totalRows": 100,
            "totalColumns": 100
        }"##;
        let loaded = from_json(blob).unwrap();
        assert_eq!(loaded.cells["A1"].value, "10");
        assert_eq!(loaded.total_rows, 100);
        assert_eq!(loaded.column_widths.len(), 100);
    }

    #[test]
    fn test_partial_cell_style_fills_defaults() {
        // Older blobs omit style fields their default style never set
        let blob = r#"{
            "cells": {"A1": {"value": "x", "formula": "", "style": {"bold": true}}},
            "totalRows": 5,
            "totalColumns": 5
        }"#;
        let loaded = from_json(blob).unwrap();
        let style = &loaded.cells["A1"].style;
        assert!(style.bold);
        assert!(!style.underline);
        assert_eq!(style.font_size, 14.0);
        assert_eq!(style.font_family, "Arial, sans-serif");
    }

    #[test]
    fn test_corrupt_blob_is_an_error() {
        assert!(from_json("not json").is_err());
        assert!(from_json(r#"{"cells": 5}"#).is_err());
    }
}
