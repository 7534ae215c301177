//! Plain-text canvas summary handed to the agent so it can "see" the design.

use crate::cell::CellMap;
use crate::grid::GridType;
use std::collections::BTreeMap;
use std::fmt::Write;

/// Describe the canvas row by row.
///
/// Lists the cell count, grid, index bounds and distinct colors, then one
/// line per row with its `(col,color)` pairs in column order.
pub fn describe_canvas(cells: &CellMap, grid: GridType) -> String {
    if cells.is_empty() {
        return "\nCanvas is empty.".to_string();
    }

    let mut rows: BTreeMap<i32, Vec<String>> = BTreeMap::new();
    let mut colors: Vec<String> = Vec::new();
    let (mut min_col, mut max_col) = (i32::MAX, i32::MIN);

    // Keys iterate row-major, so each row's columns arrive sorted.
    for (key, value) in cells {
        let hex = value.color.to_hex();
        rows.entry(key.row)
            .or_default()
            .push(format!("({},{hex})", key.col));
        if !colors.contains(&hex) {
            colors.push(hex);
        }
        min_col = min_col.min(key.col);
        max_col = max_col.max(key.col);
    }

    let (min_row, max_row) = match (rows.keys().next(), rows.keys().next_back()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => (0, 0),
    };

    let mut out = format!(
        "\nCurrent canvas ({} cells, grid: {grid}, bounds: rows {min_row}..{max_row}, cols {min_col}..{max_col}):\nColors used: {}",
        cells.len(),
        colors.join(", "),
    );
    for (row, entries) in &rows {
        let _ = write!(out, "\n  Row {row}: {}", entries.join(" "));
    }
    out
}
