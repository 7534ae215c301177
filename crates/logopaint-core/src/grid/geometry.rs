//! Vertex and centroid generation for each tessellation.

use super::{CellKey, GridType, SQRT_3, is_odd};
use kurbo::{BezPath, Point, Rect};

impl GridType {
    /// Boundary polygon of one cell in world space.
    ///
    /// Adjacent cells share edges exactly, so filling every cell of a region
    /// leaves no gaps and no overlaps.
    pub fn vertices(self, key: CellKey, size: f64) -> Vec<Point> {
        let (r, c) = (f64::from(key.row), f64::from(key.col));
        let s = size;
        match self {
            GridType::Square => {
                let (x, y) = (c * s, r * s);
                vec![
                    Point::new(x, y),
                    Point::new(x + s, y),
                    Point::new(x + s, y + s),
                    Point::new(x, y + s),
                ]
            }
            GridType::Triangle => {
                let x = c * s / 2.0;
                let (y0, y1) = (r * s, (r + 1.0) * s);
                if triangle_points_up(key) {
                    vec![
                        Point::new(x + s / 2.0, y0),
                        Point::new(x, y1),
                        Point::new(x + s, y1),
                    ]
                } else {
                    vec![
                        Point::new(x, y0),
                        Point::new(x + s, y0),
                        Point::new(x + s / 2.0, y1),
                    ]
                }
            }
            GridType::RightTriangle => {
                let x = f64::from(key.col.div_euclid(2)) * s;
                let y = r * s;
                if is_odd(key.col) {
                    vec![
                        Point::new(x + s, y),
                        Point::new(x + s, y + s),
                        Point::new(x, y + s),
                    ]
                } else {
                    vec![Point::new(x, y), Point::new(x + s, y), Point::new(x, y + s)]
                }
            }
            GridType::Diamond => {
                let center = self.centroid(key, size);
                let h = s / 2.0;
                vec![
                    Point::new(center.x, center.y - h),
                    Point::new(center.x + h, center.y),
                    Point::new(center.x, center.y + h),
                    Point::new(center.x - h, center.y),
                ]
            }
            GridType::Hexagon => {
                let center = self.centroid(key, size);
                let radius = s / 2.0;
                (0..6)
                    .map(|i| {
                        let angle = std::f64::consts::FRAC_PI_3 * f64::from(i)
                            - std::f64::consts::FRAC_PI_6;
                        Point::new(
                            center.x + radius * angle.cos(),
                            center.y + radius * angle.sin(),
                        )
                    })
                    .collect()
            }
        }
    }

    /// Area centroid of one cell in world space.
    ///
    /// For the triangle grids this is the true triangle centroid, which is
    /// also what hit testing and transforms resolve against.
    pub fn centroid(self, key: CellKey, size: f64) -> Point {
        let (r, c) = (f64::from(key.row), f64::from(key.col));
        let s = size;
        match self {
            GridType::Square => Point::new((c + 0.5) * s, (r + 0.5) * s),
            GridType::Triangle => {
                let x = c * s / 2.0 + s / 2.0;
                if triangle_points_up(key) {
                    Point::new(x, r * s + s * 2.0 / 3.0)
                } else {
                    Point::new(x, r * s + s / 3.0)
                }
            }
            GridType::RightTriangle => {
                let x = f64::from(key.col.div_euclid(2)) * s;
                let y = r * s;
                if is_odd(key.col) {
                    Point::new(x + 2.0 * s / 3.0, y + 2.0 * s / 3.0)
                } else {
                    Point::new(x + s / 3.0, y + s / 3.0)
                }
            }
            GridType::Diamond => {
                let shift = if is_odd(key.row) { s / 2.0 } else { 0.0 };
                Point::new(c * s + shift, r * s / 2.0)
            }
            GridType::Hexagon => {
                let (w, h) = hex_spacing(s);
                let shift = if is_odd(key.row) { w / 2.0 } else { 0.0 };
                Point::new(c * w + shift, r * h)
            }
        }
    }
}

/// Whether a triangle-grid cell points up.
pub(crate) fn triangle_points_up(key: CellKey) -> bool {
    (i64::from(key.row) + i64::from(key.col)).rem_euclid(2) == 0
}

/// Horizontal and vertical center spacing of the hexagon grid.
pub(crate) fn hex_spacing(size: f64) -> (f64, f64) {
    let radius = size / 2.0;
    (SQRT_3 * radius, 1.5 * radius)
}

/// Build a cell outline, rounding the corners enabled in `mask`.
///
/// Each corner is cut back along both adjacent edges by at most half the edge
/// length and joined with a quadratic curve through the original vertex.
/// A missing mask, or one whose length does not match the vertex count,
/// rounds every corner.
pub fn cell_path(vertices: &[Point], radius: f64, mask: Option<&[bool]>) -> BezPath {
    let mut path = BezPath::new();
    let n = vertices.len();
    if n == 0 {
        return path;
    }

    if radius <= 0.0 {
        path.move_to(vertices[0]);
        for &p in &vertices[1..] {
            path.line_to(p);
        }
        path.close_path();
        return path;
    }

    for i in 0..n {
        let rounded = mask.is_none_or(|m| m.len() != n || m[i]);
        let curr = vertices[i];
        if !rounded {
            if i == 0 {
                path.move_to(curr);
            } else {
                path.line_to(curr);
            }
            continue;
        }

        let prev = vertices[(i + n - 1) % n];
        let next = vertices[(i + 1) % n];
        let to_prev = prev - curr;
        let to_next = next - curr;
        let (d1, d2) = (to_prev.hypot(), to_next.hypot());
        if d1 <= f64::EPSILON || d2 <= f64::EPSILON {
            if i == 0 {
                path.move_to(curr);
            } else {
                path.line_to(curr);
            }
            continue;
        }
        let r = radius.min(d1 / 2.0).min(d2 / 2.0);
        let p1 = curr + to_prev * (r / d1);
        let p2 = curr + to_next * (r / d2);
        if i == 0 {
            path.move_to(p1);
        } else {
            path.line_to(p1);
        }
        path.quad_to(curr, p2);
    }
    path.close_path();
    path
}

/// Bounding box of every listed cell, padded by half a cell.
///
/// Returns `None` when there are no cells.
pub fn content_bounds(
    keys: impl IntoIterator<Item = CellKey>,
    grid: GridType,
    size: f64,
) -> Option<Rect> {
    let mut result: Option<Rect> = None;
    for key in keys {
        for p in grid.vertices(key, size) {
            result = Some(match result {
                Some(r) => r.union_pt(p),
                None => Rect::from_points(p, p),
            });
        }
    }
    result.map(|r| r.inflate(size * 0.5, size * 0.5))
}
