//! Read-only traversals for rendering and export consumers.

use crate::camera::Camera;
use crate::cell::{CellMap, CellValue};
use crate::grid::{CellKey, GridType, cell_path};
use kurbo::{BezPath, Point, Rect};

/// Extra rows and columns drawn past the viewport edge.
const MARGIN: i32 = 6;

/// Inclusive index range of cells to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleRange {
    pub row_min: i32,
    pub row_max: i32,
    pub col_min: i32,
    pub col_max: i32,
}

impl VisibleRange {
    /// Index range covering a world-space rectangle plus the margin.
    pub fn covering(rect: Rect, grid: GridType, size: f64) -> Self {
        let (row_step, col_step, col_margin) = match grid {
            GridType::Square => (size, size, MARGIN),
            // Columns are half a cell wide (right triangles pair up per square).
            GridType::Triangle | GridType::RightTriangle => (size, size / 2.0, MARGIN * 2),
            GridType::Diamond => (size / 2.0, size, MARGIN),
            GridType::Hexagon => {
                let radius = size / 2.0;
                (1.5 * radius, crate::grid::SQRT_3 * radius, MARGIN)
            }
        };
        let lo = |v: f64, step: f64| (v / step).floor() as i32;
        let hi = |v: f64, step: f64| (v / step).ceil() as i32;
        Self {
            row_min: lo(rect.y0, row_step).saturating_sub(MARGIN),
            row_max: hi(rect.y1, row_step).saturating_add(MARGIN),
            col_min: lo(rect.x0, col_step).saturating_sub(col_margin),
            col_max: hi(rect.x1, col_step).saturating_add(col_margin),
        }
    }

    /// Range visible through `camera`, accounting for its rotation.
    pub fn for_camera(camera: &Camera, grid: GridType, size: f64) -> Self {
        let [a, b, c, d] = camera.visible_corners();
        let rect = Rect::from_points(a, b).union_pt(c).union_pt(d);
        Self::covering(rect, grid, size)
    }

    /// Whether `key` falls inside the range.
    pub fn contains(&self, key: CellKey) -> bool {
        (self.row_min..=self.row_max).contains(&key.row)
            && (self.col_min..=self.col_max).contains(&key.col)
    }

    /// Every key in the range, row-major. Used for drawing grid lines.
    pub fn keys(&self) -> impl Iterator<Item = CellKey> {
        let (cols, rows) = (self.col_min..=self.col_max, self.row_min..=self.row_max);
        rows.flat_map(move |row| cols.clone().map(move |col| CellKey::new(row, col)))
    }
}

/// One painted cell ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderCell<'a> {
    pub key: CellKey,
    pub vertices: Vec<Point>,
    pub value: &'a CellValue,
}

impl RenderCell<'_> {
    /// Rounded outline with the mask fitted to this polygon.
    pub fn outline(&self) -> BezPath {
        let mask = self.value.mask_for(self.vertices.len());
        cell_path(&self.vertices, self.value.corner_radius, Some(&mask))
    }
}

/// Every painted cell in row-major order, for export.
pub fn render_cells(cells: &CellMap, grid: GridType, size: f64) -> impl Iterator<Item = RenderCell<'_>> {
    cells.iter().map(move |(key, value)| RenderCell {
        key: *key,
        vertices: grid.vertices(*key, size),
        value,
    })
}

/// Painted cells inside `range`, in row-major order.
pub fn visible_cells(
    cells: &CellMap,
    grid: GridType,
    size: f64,
    range: VisibleRange,
) -> impl Iterator<Item = RenderCell<'_>> {
    render_cells(cells, grid, size).filter(move |cell| range.contains(cell.key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::CellColor;
    use kurbo::Size;

    #[test]
    fn test_square_range_covers_viewport() {
        let camera = Camera::with_viewport(Size::new(200.0, 100.0));
        let range = VisibleRange::for_camera(&camera, GridType::Square, 10.0);
        // World spans x -100..100, y -50..50.
        assert_eq!(range, VisibleRange { row_min: -11, row_max: 11, col_min: -16, col_max: 16 });
    }

    #[test]
    fn test_triangle_columns_doubled() {
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        let range = VisibleRange::covering(rect, GridType::Triangle, 10.0);
        assert_eq!((range.col_min, range.col_max), (-12, 32));
        assert_eq!((range.row_min, range.row_max), (-6, 16));
    }

    #[test]
    fn test_rotated_camera_widens_range() {
        let mut camera = Camera::with_viewport(Size::new(400.0, 100.0));
        let flat = VisibleRange::for_camera(&camera, GridType::Square, 10.0);
        camera.rotate_by(std::f64::consts::FRAC_PI_2);
        let turned = VisibleRange::for_camera(&camera, GridType::Square, 10.0);
        assert!(turned.row_max - turned.row_min > flat.row_max - flat.row_min);
        assert!(turned.col_max - turned.col_min < flat.col_max - flat.col_min);
    }

    #[test]
    fn test_every_visible_cell_center_is_in_range() {
        let camera = Camera::with_viewport(Size::new(300.0, 300.0));
        for grid in GridType::ALL {
            let range = VisibleRange::for_camera(&camera, grid, 20.0);
            let probe = [Point::new(-150.0, -150.0), Point::new(149.0, 149.0), Point::ZERO];
            for p in probe {
                let key = grid.cell_at(p, 20.0).unwrap();
                assert!(range.contains(key), "{grid} {key}");
            }
        }
    }

    #[test]
    fn test_visible_cells_filters_and_orders() {
        let mut cells = CellMap::new();
        cells.insert(CellKey::new(2, 0), CellValue::solid(CellColor::WHITE));
        cells.insert(CellKey::new(0, 1), CellValue::solid(CellColor::BLACK));
        cells.insert(CellKey::new(500, 0), CellValue::solid(CellColor::BLACK));
        let range = VisibleRange { row_min: 0, row_max: 10, col_min: 0, col_max: 10 };

        let drawn: Vec<_> = visible_cells(&cells, GridType::Hexagon, 20.0, range).collect();
        assert_eq!(drawn.len(), 2);
        assert_eq!(drawn[0].key, CellKey::new(0, 1));
        assert_eq!(drawn[0].vertices.len(), 6);
        assert_eq!(render_cells(&cells, GridType::Hexagon, 20.0).count(), 3);
    }

    #[test]
    fn test_outline_uses_fitted_mask() {
        let mut cells = CellMap::new();
        let mask = vec![false, true, true, true];
        cells.insert(CellKey::new(0, 0), CellValue::new(CellColor::WHITE, 4.0, Some(mask)));
        let cell = render_cells(&cells, GridType::Square, 20.0).next().unwrap();
        let rounded = cell
            .outline()
            .elements()
            .iter()
            .filter(|e| matches!(e, kurbo::PathEl::QuadTo(..)))
            .count();
        assert_eq!(rounded, 3);
    }

    #[test]
    fn test_range_keys() {
        let range = VisibleRange { row_min: 0, row_max: 1, col_min: -1, col_max: 0 };
        let keys: Vec<_> = range.keys().collect();
        assert_eq!(
            keys,
            vec![CellKey::new(0, -1), CellKey::new(0, 0), CellKey::new(1, -1), CellKey::new(1, 0)]
        );
    }
}
