//! Symmetry replication in cell-index space.
//!
//! Every mode is a finite group acting on cell keys. Where a tiling has a
//! genuine rotation about a lattice point the generator is that rotation
//! (hexagon 60 degrees, diamond 90 degrees, triangle 60 degrees about a
//! shared vertex); other grid/mode pairs use an index-space formula of the
//! same order so replication still closes.

use crate::grid::{CellKey, GridType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Active symmetry mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymmetryMode {
    #[default]
    None,
    /// Reflection across the vertical axis.
    Mirror,
    /// Three-fold rotation.
    R3,
    /// Four-fold rotation.
    R4,
    /// Six-fold rotation.
    R6,
}

impl SymmetryMode {
    /// All modes, in toolbar order.
    pub const ALL: [SymmetryMode; 5] = [
        SymmetryMode::None,
        SymmetryMode::Mirror,
        SymmetryMode::R3,
        SymmetryMode::R4,
        SymmetryMode::R6,
    ];

    /// Size of the symmetry group.
    pub fn order(self) -> usize {
        match self {
            SymmetryMode::None => 1,
            SymmetryMode::Mirror => 2,
            SymmetryMode::R3 => 3,
            SymmetryMode::R4 => 4,
            SymmetryMode::R6 => 6,
        }
    }

    /// Wire name (`none`, `mirror`, `r3`, `r4`, `r6`).
    pub fn name(self) -> &'static str {
        match self {
            SymmetryMode::None => "none",
            SymmetryMode::Mirror => "mirror",
            SymmetryMode::R3 => "r3",
            SymmetryMode::R4 => "r4",
            SymmetryMode::R6 => "r6",
        }
    }

    /// Parse a wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.name() == name)
    }

    /// Apply the group generator once.
    pub fn step(self, grid: GridType, key: CellKey) -> CellKey {
        match self {
            SymmetryMode::None => key,
            SymmetryMode::Mirror => mirror(grid, key),
            SymmetryMode::R3 => rotate60(grid, rotate60(grid, key)),
            SymmetryMode::R4 => rotate90(grid, key),
            SymmetryMode::R6 => rotate60(grid, key),
        }
    }
}

impl fmt::Display for SymmetryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Every key equivalent to `key` under `mode`, starting with `key` itself.
///
/// Duplicates (cells on a symmetry axis or center) appear once.
pub fn orbit(grid: GridType, key: CellKey, mode: SymmetryMode) -> Vec<CellKey> {
    let mut keys = Vec::with_capacity(mode.order());
    let mut current = key;
    for _ in 0..mode.order() {
        if !keys.contains(&current) {
            keys.push(current);
        }
        current = mode.step(grid, current);
    }
    keys
}

fn to_key(row: i64, col: i64) -> CellKey {
    // Keys stay far inside i32 range for any drawable canvas.
    CellKey::new(row as i32, col as i32)
}

fn odd(v: i64) -> i64 {
    v.rem_euclid(2)
}

fn mirror(grid: GridType, key: CellKey) -> CellKey {
    let (r, c) = (i64::from(key.row), i64::from(key.col));
    match grid {
        GridType::Square | GridType::Triangle => to_key(r, -c),
        GridType::RightTriangle => to_key(r, -c - 1),
        GridType::Diamond | GridType::Hexagon => to_key(r, -c - odd(r)),
    }
}

fn rotate90(grid: GridType, key: CellKey) -> CellKey {
    let (r, c) = (i64::from(key.row), i64::from(key.col));
    match grid {
        GridType::Diamond => {
            // Rhombus centers sit on a checkerboard lattice (x, y) with
            // x = 2c + (r mod 2) and y = r, in half-cell units.
            let x = 2 * c + odd(r);
            let (nx, ny) = (-r, x);
            to_key(ny, (nx - odd(ny)).div_euclid(2))
        }
        _ => to_key(c, -r),
    }
}

fn rotate60(grid: GridType, key: CellKey) -> CellKey {
    let (r, c) = (i64::from(key.row), i64::from(key.col));
    match grid {
        GridType::Hexagon => {
            // Odd-row offset to axial coordinates and back.
            let q = c - (r - odd(r)) / 2;
            let (nq, nr) = (-r, q + r);
            to_key(nr, nq + (nr - odd(nr)) / 2)
        }
        GridType::Triangle => {
            // Triangle centroids in sixth-of-a-row units around the vertex
            // shared by (0,0), (0,1), (-1,0) and their neighbors.
            let up = (r + c).rem_euclid(2) == 0;
            let (i, j) = if up {
                (3 * (c - r) - 2, 6 * r + 4)
            } else {
                (3 * (c - r) - 1, 6 * r + 2)
            };
            let (ni, nj) = (-j, i + j);
            let nr = nj.div_euclid(6);
            let n_up = nj.rem_euclid(6) == 4;
            let nc = nr + (ni + if n_up { 2 } else { 1 }).div_euclid(3);
            to_key(nr, nc)
        }
        _ => to_key(-c, r + c),
    }
}
