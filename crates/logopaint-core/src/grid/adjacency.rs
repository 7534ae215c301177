//! Edge-sharing neighbors for each tessellation.

use super::geometry::triangle_points_up;
use super::{CellKey, GridType, is_odd};

impl GridType {
    /// Cells sharing a full edge with `key`.
    ///
    /// The relation is symmetric: if `b` is a neighbor of `a`, `a` is a
    /// neighbor of `b`.
    pub fn neighbors(self, key: CellKey) -> Vec<CellKey> {
        let offsets: &[(i32, i32)] = match self {
            GridType::Square => &[(-1, 0), (1, 0), (0, -1), (0, 1)],
            GridType::Triangle => {
                if triangle_points_up(key) {
                    &[(0, -1), (0, 1), (1, 0)]
                } else {
                    &[(0, -1), (0, 1), (-1, 0)]
                }
            }
            GridType::RightTriangle => {
                if is_odd(key.col) {
                    &[(0, -1), (0, 1), (1, -1)]
                } else {
                    &[(0, 1), (-1, 1), (0, -1)]
                }
            }
            GridType::Diamond => {
                if is_odd(key.row) {
                    &[(-1, 0), (-1, 1), (1, 0), (1, 1)]
                } else {
                    &[(-1, -1), (-1, 0), (1, -1), (1, 0)]
                }
            }
            GridType::Hexagon => {
                if is_odd(key.row) {
                    &[(-1, 0), (-1, 1), (0, -1), (0, 1), (1, 0), (1, 1)]
                } else {
                    &[(-1, -1), (-1, 0), (0, -1), (0, 1), (1, -1), (1, 0)]
                }
            }
        };
        offsets.iter().map(|&(dr, dc)| key.offset(dr, dc)).collect()
    }
}
