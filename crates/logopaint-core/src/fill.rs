//! Bounded flood fill over the grid adjacency.

use crate::cell::CellMap;
use crate::grid::{CellKey, GridType};
use crate::symmetry::{SymmetryMode, orbit};
use std::collections::{BTreeSet, VecDeque};
use thiserror::Error;

/// Largest region a single fill may visit.
pub const MAX_FILL_CELLS: usize = 20_000;

/// Reasons a fill leaves the canvas untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FillError {
    #[error("start cell is already painted")]
    AlreadyPainted,
    #[error("region is not enclosed (more than {limit} cells)")]
    Unbounded { limit: usize },
}

/// Compute the cells a flood fill from `start` would paint.
///
/// Breadth-first over unpainted neighbors. Each visited cell paints its
/// symmetry orbit, and those orbit cells count as painted for the rest of
/// the traversal. Returns every key to paint (orbits included), in visit
/// order, without duplicates.
pub fn fill_region(
    cells: &CellMap,
    grid: GridType,
    start: CellKey,
    symmetry: SymmetryMode,
    limit: usize,
) -> Result<Vec<CellKey>, FillError> {
    if cells.contains_key(&start) {
        return Err(FillError::AlreadyPainted);
    }

    let mut painted: BTreeSet<CellKey> = BTreeSet::new();
    let mut order = Vec::new();
    let mut visited = BTreeSet::from([start]);
    let mut queue = VecDeque::from([start]);

    while let Some(key) = queue.pop_front() {
        for k in orbit(grid, key, symmetry) {
            if painted.insert(k) {
                order.push(k);
            }
        }
        for n in grid.neighbors(key) {
            if visited.contains(&n) || cells.contains_key(&n) || painted.contains(&n) {
                continue;
            }
            if visited.len() >= limit {
                log::warn!("flood fill from {start} exceeded {limit} cells, abandoning");
                return Err(FillError::Unbounded { limit });
            }
            visited.insert(n);
            queue.push_back(n);
        }
    }

    log::debug!("flood fill from {start}: {} cells", order.len());
    Ok(order)
}
