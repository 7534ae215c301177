//! World point to cell resolution.

use super::geometry::hex_spacing;
use super::{CellKey, GridType, is_odd};
use kurbo::Point;

impl GridType {
    /// Find the cell containing a world-space point.
    ///
    /// Returns `None` for non-finite input or a non-positive cell size.
    /// Points on a shared edge resolve to one of the adjacent cells.
    pub fn cell_at(self, point: Point, size: f64) -> Option<CellKey> {
        if !point.is_finite() || !size.is_finite() || size <= 0.0 {
            return None;
        }
        let s = size;
        let (wx, wy) = (point.x, point.y);
        let key = match self {
            GridType::Square => CellKey::new(floor_i32(wy / s), floor_i32(wx / s)),
            GridType::Triangle => triangle_at(point, s),
            GridType::RightTriangle => {
                let rc = floor_i32(wx / s);
                let row = floor_i32(wy / s);
                let lx = wx / s - f64::from(rc);
                let ly = wy / s - f64::from(row);
                let col = rc.wrapping_mul(2);
                if lx + ly <= 1.0 {
                    CellKey::new(row, col)
                } else {
                    CellKey::new(row, col.wrapping_add(1))
                }
            }
            GridType::Diamond => {
                let row_step = s / 2.0;
                nearest_center(self, point, s, row_step, s, |d| d.x.abs() + d.y.abs())
            }
            GridType::Hexagon => {
                let (w, h) = hex_spacing(s);
                nearest_center(self, point, s, h, w, |d| d.hypot2())
            }
        };
        Some(key)
    }
}

fn floor_i32(v: f64) -> i32 {
    // `as` saturates, which keeps far-away points on the outermost cells.
    v.floor() as i32
}

fn round_i32(v: f64) -> i32 {
    v.round() as i32
}

/// Search the row/column neighborhood around the nearest lattice point and
/// keep the cell whose center is closest under `metric`.
///
/// Rhombi are the L1 Voronoi cells of their centers and hexagons the
/// Euclidean ones, so the closest center is the containing cell.
fn nearest_center(
    grid: GridType,
    point: Point,
    size: f64,
    row_step: f64,
    col_step: f64,
    metric: impl Fn(kurbo::Vec2) -> f64,
) -> CellKey {
    let row_guess = round_i32(point.y / row_step);
    let mut best = (f64::INFINITY, CellKey::new(row_guess, 0));
    for d_row in -1..=1 {
        let row = row_guess.wrapping_add(d_row);
        let shift = if is_odd(row) { col_step / 2.0 } else { 0.0 };
        let col_guess = round_i32((point.x - shift) / col_step);
        for d_col in -1..=1 {
            let key = CellKey::new(row, col_guess.wrapping_add(d_col));
            let dist = metric(point - grid.centroid(key, size));
            if dist < best.0 {
                best = (dist, key);
            }
        }
    }
    best.1
}

fn triangle_at(point: Point, size: f64) -> CellKey {
    let row = floor_i32(point.y / size);
    let mid = floor_i32(2.0 * point.x / size);
    let grid = GridType::Triangle;

    for d_col in [0, -1, 1, -2, 2] {
        let key = CellKey::new(row, mid.wrapping_add(d_col));
        if point_in_triangle(point, &grid.vertices(key, size)) {
            return key;
        }
    }
    for d_row in [-1, 1] {
        for d_col in [0, -1, 1] {
            let key = CellKey::new(row.wrapping_add(d_row), mid.wrapping_add(d_col));
            if point_in_triangle(point, &grid.vertices(key, size)) {
                return key;
            }
        }
    }
    CellKey::new(row, mid)
}

/// Barycentric containment test, inclusive of edges.
pub(crate) fn point_in_triangle(p: Point, tri: &[Point]) -> bool {
    let [a, b, c] = match tri {
        [a, b, c] => [*a, *b, *c],
        _ => return false,
    };
    let v0 = c - a;
    let v1 = b - a;
    let v2 = p - a;
    let d00 = v0.dot(v0);
    let d01 = v0.dot(v1);
    let d02 = v0.dot(v2);
    let d11 = v1.dot(v1);
    let d12 = v1.dot(v2);
    let denom = d00 * d11 - d01 * d01;
    if denom.abs() < 1e-8 {
        return false;
    }
    let u = (d11 * d02 - d01 * d12) / denom;
    let v = (d00 * d12 - d01 * d02) / denom;
    const TOL: f64 = 1e-9;
    u >= -TOL && v >= -TOL && u + v <= 1.0 + TOL
}
