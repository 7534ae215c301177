//! Pointer gestures: the tool state machine.

use super::Canvas;
use crate::grid::CellKey;
use crate::input::{Modifiers, MouseButton, PointerEvent};
use crate::selection::cells_in_rect;
use crate::tools::{PaintMode, ToolKind, ToolState};
use crate::transform;
use kurbo::{Point, Rect, Vec2};

impl Canvas {
    /// Dispatch a pointer event.
    pub fn handle_pointer_event(&mut self, event: &PointerEvent) {
        match *event {
            PointerEvent::Down {
                position,
                button,
                modifiers,
            } => self.pointer_down(position, button, modifiers),
            PointerEvent::Move { position } => self.pointer_move(position),
            PointerEvent::Up { position, .. } => self.pointer_up(position),
            PointerEvent::Wheel {
                position,
                delta,
                modifiers,
            } => self.wheel(position, delta, modifiers),
        }
    }

    fn cell_under(&self, world: Point) -> Option<CellKey> {
        self.grid().cell_at(world, self.cell_size())
    }

    /// Start a gesture at a screen position.
    pub fn pointer_down(&mut self, screen: Point, button: MouseButton, modifiers: Modifiers) {
        if button.pans() {
            self.tools.state = ToolState::Panning { last: screen };
            return;
        }

        let world = self.camera.screen_to_world(screen);
        let key = self.cell_under(world);

        match self.tools.current_tool {
            ToolKind::Paint | ToolKind::Erase => {
                let Some(key) = key else {
                    return;
                };
                let mode = if self.tools.current_tool == ToolKind::Erase || self.cells.contains_key(&key) {
                    PaintMode::Erase
                } else {
                    PaintMode::Paint
                };
                self.push_undo();
                self.paint_with(mode, key);
                self.tools.state = ToolState::Painting {
                    mode,
                    last: Some(key),
                };
            }
            ToolKind::Select => match key {
                Some(key) if self.selection.contains(&key) => {
                    self.push_undo();
                    self.tools.state = ToolState::MovingSelection { anchor: key };
                }
                Some(key) if self.cells.contains_key(&key) => {
                    if modifiers.extends_selection() {
                        self.extend_selection(key);
                    } else {
                        self.select_keys([key]);
                    }
                }
                _ => {
                    self.tools.state = ToolState::BoxSelecting {
                        start: world,
                        current: world,
                    };
                }
            },
            ToolKind::ColorPick => {
                if let Some(key) = key {
                    self.pick(key);
                }
            }
            ToolKind::RegionFill => {
                if let Some(key) = key {
                    if let Err(err) = self.fill_at(key) {
                        log::debug!("fill at {key} skipped: {err}");
                    }
                }
            }
            ToolKind::Line => match self.tools.take_line_anchor() {
                None => self.tools.set_line_anchor(world),
                Some(start) => {
                    self.draw_line(start, world);
                }
            },
        }
    }

    /// Continue the current gesture.
    pub fn pointer_move(&mut self, screen: Point) {
        let world = self.camera.screen_to_world(screen);

        match self.tools.state.clone() {
            ToolState::Idle => {}
            ToolState::Panning { last } => {
                self.camera.pan_by_screen(screen - last);
                self.tools.state = ToolState::Panning { last: screen };
            }
            ToolState::Painting { mode, last } => {
                let key = self.cell_under(world);
                if let Some(key) = key.filter(|k| Some(*k) != last) {
                    self.paint_with(mode, key);
                    self.tools.state = ToolState::Painting {
                        mode,
                        last: Some(key),
                    };
                }
            }
            ToolState::MovingSelection { anchor } => {
                let Some(key) = self.cell_under(world).filter(|k| *k != anchor) else {
                    return;
                };
                let (d_row, d_col) = (key.row - anchor.row, key.col - anchor.col);
                let keys = std::mem::take(&mut self.selection);
                self.selection = transform::shift_cells(&mut self.cells, keys, d_row, d_col);
                self.tools.state = ToolState::MovingSelection { anchor: key };
            }
            ToolState::BoxSelecting { start, .. } => {
                self.tools.state = ToolState::BoxSelecting {
                    start,
                    current: world,
                };
            }
        }
    }

    /// Finish the current gesture.
    pub fn pointer_up(&mut self, screen: Point) {
        if let ToolState::BoxSelecting { start, .. } = self.tools.state {
            let world = self.camera.screen_to_world(screen);
            let rect = Rect::from_points(start, world);
            let keys = cells_in_rect(&self.cells, self.grid(), self.cell_size(), rect);
            log::debug!("box selected {} cells", keys.len());
            self.select_keys(keys);
        }
        self.tools.reset();
    }

    /// Zoom at the pointer, or rotate the view while shift is held.
    pub fn wheel(&mut self, screen: Point, delta: Vec2, modifiers: Modifiers) {
        self.camera.wheel(screen, delta.y, modifiers.shift);
    }

    fn paint_with(&mut self, mode: PaintMode, key: CellKey) {
        match mode {
            PaintMode::Paint => {
                let value = self.paint_value();
                self.apply_orbit(key, Some(&value));
            }
            PaintMode::Erase => self.apply_orbit(key, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellValue;
    use crate::color::CellColor;
    use crate::grid::GridType;
    use crate::symmetry::SymmetryMode;
    use std::collections::BTreeSet;

    fn canvas(grid: GridType, size: f64) -> Canvas {
        let mut canvas = Canvas::with_seed(5);
        canvas.set_grid(grid);
        canvas.set_cell_size(size);
        canvas
    }

    /// Screen position of a cell's centroid.
    fn at(canvas: &Canvas, row: i32, col: i32) -> Point {
        let center = canvas.grid().centroid(CellKey::new(row, col), canvas.cell_size());
        canvas.camera.world_to_screen(center)
    }

    fn click(canvas: &mut Canvas, p: Point) {
        canvas.handle_pointer_event(&PointerEvent::down(p.x, p.y));
        canvas.handle_pointer_event(&PointerEvent::up(p.x, p.y));
    }

    fn drag(canvas: &mut Canvas, points: &[Point]) {
        let (first, rest) = points.split_first().expect("at least one point");
        canvas.handle_pointer_event(&PointerEvent::down(first.x, first.y));
        for p in rest {
            canvas.handle_pointer_event(&PointerEvent::moved(p.x, p.y));
        }
        let last = points.last().expect("at least one point");
        canvas.handle_pointer_event(&PointerEvent::up(last.x, last.y));
    }

    #[test]
    fn test_paint_and_flip_scenario() {
        let mut c = canvas(GridType::Square, 40.0);
        c.style.color = CellColor::rgb(255, 0, 0);
        let p = at(&c, 0, 0);
        click(&mut c, p);
        c.style.color = CellColor::rgb(0, 0, 255);
        let p = at(&c, 0, 1);
        click(&mut c, p);

        c.select_all();
        c.flip_selection_horizontal();
        assert_eq!(c.cells()[&CellKey::new(0, 0)].color.to_hex(), "#0000ff");
        assert_eq!(c.cells()[&CellKey::new(0, 1)].color.to_hex(), "#ff0000");
    }

    #[test]
    fn test_triangle_r3_paints_orbit() {
        let mut c = canvas(GridType::Triangle, 50.0);
        c.set_symmetry(SymmetryMode::R3);
        let p = at(&c, 0, 0);
        click(&mut c, p);
        assert_eq!(c.len(), 3);
        assert!(c.cells().contains_key(&CellKey::new(0, 0)));
    }

    #[test]
    fn test_paint_drag_is_one_history_entry() {
        let mut c = canvas(GridType::Square, 20.0);
        let path: Vec<_> = (0..5).map(|col| at(&c, 0, col)).collect();
        drag(&mut c, &path);
        assert_eq!(c.len(), 5);
        assert_eq!(c.history.undo_len(), 1);
        assert!(c.undo());
        assert!(c.is_empty());
    }

    #[test]
    fn test_paint_gesture_mode_fixed_at_start() {
        let mut c = canvas(GridType::Square, 20.0);
        c.cells.insert(CellKey::new(0, 0), CellValue::solid(CellColor::WHITE));
        c.cells.insert(CellKey::new(0, 2), CellValue::solid(CellColor::WHITE));

        // Starts on a painted cell, so the whole drag erases.
        let path = [at(&c, 0, 0), at(&c, 0, 1), at(&c, 0, 2)];
        drag(&mut c, &path);
        assert!(c.is_empty());

        // Starts on an empty cell, so the whole drag paints, even over painted cells.
        c.cells.insert(CellKey::new(1, 1), CellValue::solid(CellColor::WHITE));
        let path = [at(&c, 1, 0), at(&c, 1, 1)];
        drag(&mut c, &path);
        assert_eq!(c.len(), 2);
        assert_eq!(c.cells()[&CellKey::new(1, 1)].color, c.style.color);
    }

    #[test]
    fn test_erase_tool_with_symmetry() {
        let mut c = canvas(GridType::Square, 20.0);
        c.set_symmetry(SymmetryMode::Mirror);
        let p = at(&c, 2, 3);
        click(&mut c, p);
        assert_eq!(c.len(), 2);
        c.set_tool(ToolKind::Erase);
        let p = at(&c, 2, -3);
        click(&mut c, p);
        assert!(c.is_empty());
    }

    #[test]
    fn test_pan_does_not_touch_cells() {
        let mut c = canvas(GridType::Square, 20.0);
        c.handle_pointer_event(&PointerEvent::Down {
            position: Point::new(100.0, 100.0),
            button: MouseButton::Right,
            modifiers: Modifiers::default(),
        });
        c.handle_pointer_event(&PointerEvent::moved(130.0, 90.0));
        c.handle_pointer_event(&PointerEvent::Up {
            position: Point::new(130.0, 90.0),
            button: MouseButton::Right,
        });
        assert_eq!(c.camera.pan, Vec2::new(30.0, -10.0));
        assert!(c.is_empty());
        assert!(!c.can_undo());
        assert!(!c.tools.is_active());
    }

    #[test]
    fn test_wheel_zooms_and_rotates() {
        let mut c = canvas(GridType::Square, 20.0);
        let p = Point::new(400.0, 300.0);
        c.handle_pointer_event(&PointerEvent::Wheel {
            position: p,
            delta: Vec2::new(0.0, -500.0),
            modifiers: Modifiers::default(),
        });
        assert!((c.camera.zoom - 1.5).abs() < 1e-12);
        c.handle_pointer_event(&PointerEvent::Wheel {
            position: p,
            delta: Vec2::new(0.0, 100.0),
            modifiers: Modifiers::SHIFT,
        });
        assert!((c.camera.rotation - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_select_click_and_shift_click() {
        let mut c = canvas(GridType::Hexagon, 30.0);
        for col in 0..3 {
            c.cells.insert(CellKey::new(0, col), CellValue::solid(CellColor::WHITE));
        }
        c.set_tool(ToolKind::Select);
        let p = at(&c, 0, 0);
        click(&mut c, p);
        assert_eq!(c.selection(), &BTreeSet::from([CellKey::new(0, 0)]));

        let p = at(&c, 0, 2);
        c.handle_pointer_event(&PointerEvent::Down {
            position: p,
            button: MouseButton::Left,
            modifiers: Modifiers::SHIFT,
        });
        c.handle_pointer_event(&PointerEvent::up(p.x, p.y));
        assert_eq!(c.selection().len(), 2);
        assert!(!c.can_undo());
    }

    #[test]
    fn test_box_select_uses_centroids() {
        let mut c = canvas(GridType::Square, 20.0);
        for key in [CellKey::new(0, 0), CellKey::new(0, 1), CellKey::new(5, 5)] {
            c.cells.insert(key, CellValue::solid(CellColor::WHITE));
        }
        c.set_tool(ToolKind::Select);
        let start = c.camera.world_to_screen(Point::new(-5.0, -5.0));
        let end = c.camera.world_to_screen(Point::new(45.0, 25.0));
        drag(&mut c, &[start, end]);

        assert_eq!(
            c.selection(),
            &BTreeSet::from([CellKey::new(0, 0), CellKey::new(0, 1)])
        );
        assert!(c.tools.selection_box().is_none());
    }

    #[test]
    fn test_move_drag_shifts_selection() {
        let mut c = canvas(GridType::Square, 20.0);
        c.cells.insert(CellKey::new(0, 0), CellValue::solid(CellColor::WHITE));
        c.cells.insert(CellKey::new(1, 0), CellValue::solid(CellColor::BLACK));
        c.select_keys([CellKey::new(0, 0), CellKey::new(1, 0)]);
        c.set_tool(ToolKind::Select);

        let path = [at(&c, 0, 0), at(&c, 0, 1), at(&c, 0, 2)];
        drag(&mut c, &path);

        assert_eq!(c.cells()[&CellKey::new(0, 2)].color, CellColor::WHITE);
        assert_eq!(c.cells()[&CellKey::new(1, 2)].color, CellColor::BLACK);
        assert_eq!(c.len(), 2);
        assert_eq!(
            c.selection(),
            &BTreeSet::from([CellKey::new(0, 2), CellKey::new(1, 2)])
        );
        assert_eq!(c.history.undo_len(), 1);
        assert!(c.undo());
        assert!(c.cells().contains_key(&CellKey::new(0, 0)));
    }

    #[test]
    fn test_color_pick_tool() {
        let mut c = canvas(GridType::Square, 20.0);
        c.cells.insert(CellKey::new(0, 0), CellValue::new(CellColor::rgba(9, 8, 7, 40), 3.0, None));
        c.set_tool(ToolKind::ColorPick);
        let p = at(&c, 0, 0);
        click(&mut c, p);
        assert_eq!(c.style.color, CellColor::rgb(9, 8, 7));
        assert_eq!(c.style.corner_radius, 3.0);
    }

    #[test]
    fn test_fill_tool() {
        let mut c = canvas(GridType::Triangle, 40.0);
        let hole = CellKey::new(0, 0);
        for key in GridType::Triangle.neighbors(hole) {
            c.cells.insert(key, CellValue::solid(CellColor::BLACK));
        }
        c.set_tool(ToolKind::RegionFill);
        let p = at(&c, 0, 0);
        click(&mut c, p);
        assert_eq!(c.len(), 4);
        assert_eq!(c.history.undo_len(), 1);

        // Open space: abandoned without a history entry.
        let p = c.camera.world_to_screen(Point::new(-300.0, -200.0));
        click(&mut c, p);
        assert_eq!(c.len(), 4);
        assert_eq!(c.history.undo_len(), 1);
    }

    #[test]
    fn test_line_tool_two_clicks() {
        let mut c = canvas(GridType::Square, 20.0);
        c.set_tool(ToolKind::Line);
        let a = at(&c, 2, 0);
        click(&mut c, a);
        assert!(c.is_empty());
        assert!(c.tools.line_anchor().is_some());

        let b = at(&c, 2, 4);
        click(&mut c, b);
        let expected: BTreeSet<_> = (0..5).map(|col| CellKey::new(2, col)).collect();
        assert_eq!(c.cells().keys().copied().collect::<BTreeSet<_>>(), expected);
        assert!(c.tools.line_anchor().is_none());
        assert_eq!(c.history.undo_len(), 1);
    }

    #[test]
    fn test_painting_under_rotated_zoomed_camera() {
        let mut c = canvas(GridType::Diamond, 30.0);
        c.camera.zoom = 0.2;
        c.camera.rotation = 0.9;
        let p = at(&c, -4, 3);
        click(&mut c, p);
        assert!(c.cells().contains_key(&CellKey::new(-4, 3)));
    }
}
