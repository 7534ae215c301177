//! Cell selection helpers and named groups.

use crate::cell::CellMap;
use crate::color::CellColor;
use crate::grid::{CellKey, GridType};
use kurbo::Rect;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Unique identifier for a group.
pub type GroupId = Uuid;

/// A named selection that can be recalled later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub keys: BTreeSet<CellKey>,
    /// Tag color shown next to the group in the group list.
    pub color: CellColor,
}

impl Group {
    /// Create a new group from a set of keys.
    pub fn new(keys: BTreeSet<CellKey>, color: CellColor) -> Self {
        Self {
            id: Uuid::new_v4(),
            keys,
            color,
        }
    }
}

/// Painted cells whose centroid lies inside `rect` (edges inclusive).
pub fn cells_in_rect(cells: &CellMap, grid: GridType, size: f64, rect: Rect) -> BTreeSet<CellKey> {
    let rect = rect.abs();
    cells
        .keys()
        .filter(|k| {
            let c = grid.centroid(**k, size);
            c.x >= rect.x0 && c.x <= rect.x1 && c.y >= rect.y0 && c.y <= rect.y1
        })
        .copied()
        .collect()
}
