//! Cell-set transforms shared by selection commands and agent batches.
//!
//! Geometric transforms move each cell's centroid in world space and
//! re-resolve it through hit testing, so they work on every grid type.
//! Only painted keys take part; every transform removes all old keys before
//! inserting the new ones.

use crate::cell::{CellMap, CellValue};
use crate::color::CellColor;
use crate::grid::{CellKey, GridType};
use kurbo::{Point, Vec2};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Largest disc radius, in cells, that `fill_disc` scans.
pub const MAX_DISC_RADIUS: f64 = 100.0;

/// A rigid transform about the centroid of the affected cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    FlipHorizontal,
    FlipVertical,
    /// Quarter turn, clockwise on screen.
    Rotate90,
}

impl Transform {
    fn apply(self, p: Point, center: Point) -> Point {
        let d = p - center;
        match self {
            Transform::FlipHorizontal => Point::new(center.x - d.x, p.y),
            Transform::FlipVertical => Point::new(p.x, center.y - d.y),
            Transform::Rotate90 => Point::new(center.x - d.y, center.y + d.x),
        }
    }
}

/// Axis a gradient runs along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientDirection {
    #[default]
    Horizontal,
    Vertical,
    Diagonal,
}

impl GradientDirection {
    fn project(self, p: Point) -> f64 {
        match self {
            GradientDirection::Horizontal => p.x,
            GradientDirection::Vertical => p.y,
            GradientDirection::Diagonal => p.x + p.y,
        }
    }

    /// Parse a wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "horizontal" => Some(Self::Horizontal),
            "vertical" => Some(Self::Vertical),
            "diagonal" => Some(Self::Diagonal),
            _ => None,
        }
    }
}

/// Remove the painted entries among `keys`, in key order.
fn take_painted(
    cells: &mut CellMap,
    keys: impl IntoIterator<Item = CellKey>,
) -> Vec<(CellKey, CellValue)> {
    let keys: BTreeSet<CellKey> = keys.into_iter().collect();
    keys.into_iter()
        .filter_map(|k| cells.remove(&k).map(|v| (k, v)))
        .collect()
}

/// Mean centroid of a set of cells.
pub fn mean_centroid<'a>(
    keys: impl IntoIterator<Item = &'a CellKey>,
    grid: GridType,
    size: f64,
) -> Option<Point> {
    let mut sum = Vec2::ZERO;
    let mut count = 0usize;
    for key in keys {
        sum += grid.centroid(*key, size).to_vec2();
        count += 1;
    }
    (count > 0).then(|| (sum / count as f64).to_point())
}

/// Flip or rotate the painted cells among `keys` about their mean centroid.
///
/// Returns the new keys. Cells landing on the same key collapse to the last
/// one written; an empty result means nothing was painted.
pub fn transform_cells(
    cells: &mut CellMap,
    keys: impl IntoIterator<Item = CellKey>,
    grid: GridType,
    size: f64,
    transform: Transform,
) -> BTreeSet<CellKey> {
    let entries = take_painted(cells, keys);
    let Some(center) = mean_centroid(entries.iter().map(|(k, _)| k), grid, size) else {
        return BTreeSet::new();
    };

    let mut moved = BTreeSet::new();
    for (key, value) in entries {
        let target = transform.apply(grid.centroid(key, size), center);
        let new_key = grid.cell_at(target, size).unwrap_or(key);
        cells.insert(new_key, value);
        moved.insert(new_key);
    }
    moved
}

/// Shift the painted cells among `keys` by a row/column delta.
pub fn shift_cells(
    cells: &mut CellMap,
    keys: impl IntoIterator<Item = CellKey>,
    d_row: i32,
    d_col: i32,
) -> BTreeSet<CellKey> {
    let entries = take_painted(cells, keys);
    let mut moved = BTreeSet::new();
    for (key, value) in entries {
        let new_key = key.offset(d_row, d_col);
        cells.insert(new_key, value);
        moved.insert(new_key);
    }
    moved
}

/// Recolor the painted cells among `keys` along a linear gradient.
///
/// The cell with the smallest projection gets `from`, the largest `to`.
/// Radius and corner mask are kept. Returns the number of cells recolored.
pub fn apply_gradient(
    cells: &mut CellMap,
    keys: impl IntoIterator<Item = CellKey>,
    grid: GridType,
    size: f64,
    from: CellColor,
    to: CellColor,
    direction: GradientDirection,
) -> usize {
    let positions: Vec<(CellKey, f64)> = keys
        .into_iter()
        .filter(|k| cells.contains_key(k))
        .map(|k| (k, direction.project(grid.centroid(k, size))))
        .collect();
    if positions.is_empty() {
        return 0;
    }

    let min = positions.iter().map(|(_, v)| *v).fold(f64::INFINITY, f64::min);
    let max = positions.iter().map(|(_, v)| *v).fold(f64::NEG_INFINITY, f64::max);
    let range = if max - min > 0.0 { max - min } else { 1.0 };

    for (key, v) in &positions {
        if let Some(value) = cells.get_mut(key) {
            value.color = from.lerp(to, (v - min) / range);
        }
    }
    positions.len()
}

/// Jitter the hue, saturation and lightness of the painted cells among `keys`.
pub fn randomize_colors(
    cells: &mut CellMap,
    keys: impl IntoIterator<Item = CellKey>,
    rng: &mut impl Rng,
) -> usize {
    let mut count = 0;
    for key in keys {
        if let Some(value) = cells.get_mut(&key) {
            value.color = value.color.jitter(rng);
            count += 1;
        }
    }
    count
}

/// Replace every cell of color `from` with `to`, keeping shape.
pub fn recolor(cells: &mut CellMap, from: CellColor, to: CellColor) -> usize {
    let mut count = 0;
    for value in cells.values_mut().filter(|v| v.color == from) {
        value.color = to;
        count += 1;
    }
    count
}

/// Paint every cell whose centroid lies within the annulus
/// `inner..=outer` (in cells) around the centroid of `center`.
///
/// Candidates are scanned over `ceil(outer * 2.5)` rows and columns around
/// the anchor, which covers the disc on every grid type. The outer radius is
/// capped at `MAX_DISC_RADIUS`.
pub fn fill_disc(
    cells: &mut CellMap,
    grid: GridType,
    size: f64,
    center: CellKey,
    inner: f64,
    outer: f64,
    value: &CellValue,
) -> usize {
    if !outer.is_finite() || outer < 0.0 || size.is_nan() || size <= 0.0 {
        return 0;
    }
    let outer = outer.min(MAX_DISC_RADIUS);
    let inner = if inner.is_finite() { inner.max(0.0) } else { 0.0 };
    let origin = grid.centroid(center, size);
    let (outer_sq, inner_sq) = ((outer * size).powi(2), (inner * size).powi(2));
    let scan = (outer * 2.5).ceil() as i32;

    let mut count = 0;
    for d_row in -scan..=scan {
        for d_col in -scan..=scan {
            let key = center.offset(d_row, d_col);
            let d2 = (grid.centroid(key, size) - origin).hypot2();
            if d2 <= outer_sq && d2 >= inner_sq {
                cells.insert(key, value.clone());
                count += 1;
            }
        }
    }
    count
}
