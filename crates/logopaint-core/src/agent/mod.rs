//! Interpreter for command batches issued by an external agent.
//!
//! A batch runs against a working copy of the cells, settings and style.
//! The caller swaps the copy in once the whole batch has been applied.

mod command;
mod prompt;
mod reply;

pub use command::{AgentCommand, CommandError, Placement, SettingsChange};
pub use prompt::describe_canvas;
pub use reply::{AgentError, AgentReply, response_text};

use crate::cell::{self, CellMap, CellValue};
use crate::settings::{DrawStyle, Settings};
use crate::transform::{self, Transform};
use rand::Rng;
use serde_json::Value;

/// Outcome counts for one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Commands that were applied.
    pub applied: usize,
    /// Malformed commands that were skipped.
    pub skipped: usize,
    /// Commands of an unknown type.
    pub ignored: usize,
}

impl BatchReport {
    /// Whether any command took effect.
    pub fn changed(&self) -> bool {
        self.applied > 0
    }
}

/// Working copy a batch mutates.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchState {
    pub cells: CellMap,
    pub settings: Settings,
    pub style: DrawStyle,
}

impl BatchState {
    /// Apply one command. Geometry follows the settings as they stand now,
    /// so a `set` earlier in the batch affects later commands.
    pub fn apply(&mut self, command: &AgentCommand, rng: &mut impl Rng) {
        let grid = self.settings.grid;
        let size = self.settings.cell_size;
        let all: Vec<_> = self.cells.keys().copied().collect();

        match command {
            AgentCommand::Set(change) => self.apply_settings(change),
            AgentCommand::Clear => self.cells.clear(),
            AgentCommand::Place(cells) => {
                for p in cells {
                    let color = p.color.unwrap_or(self.style.color);
                    let radius = p.radius.unwrap_or(self.style.corner_radius);
                    self.cells.insert(p.key, CellValue::new(color, radius, None));
                }
            }
            AgentCommand::Delete(keys) => {
                for key in keys {
                    self.cells.remove(key);
                }
            }
            AgentCommand::Rotate => {
                transform::transform_cells(&mut self.cells, all, grid, size, Transform::Rotate90);
            }
            AgentCommand::FlipHorizontal => {
                transform::transform_cells(&mut self.cells, all, grid, size, Transform::FlipHorizontal);
            }
            AgentCommand::FlipVertical => {
                transform::transform_cells(&mut self.cells, all, grid, size, Transform::FlipVertical);
            }
            AgentCommand::Move { d_row, d_col } => {
                transform::shift_cells(&mut self.cells, all, *d_row, *d_col);
            }
            AgentCommand::Gradient { from, to, direction } => {
                transform::apply_gradient(&mut self.cells, all, grid, size, *from, *to, *direction);
            }
            AgentCommand::Recolor { from, to } => {
                transform::recolor(&mut self.cells, *from, *to);
            }
            AgentCommand::Randomize => {
                transform::randomize_colors(&mut self.cells, all, rng);
            }
            AgentCommand::Circle { center, radius, color } => {
                let value = CellValue::new(*color, self.style.corner_radius, None);
                transform::fill_disc(&mut self.cells, grid, size, *center, 0.0, *radius, &value);
            }
            AgentCommand::Ring { center, inner, outer, color } => {
                let value = CellValue::new(*color, self.style.corner_radius, None);
                transform::fill_disc(&mut self.cells, grid, size, *center, *inner, *outer, &value);
            }
        }
    }

    fn apply_settings(&mut self, change: &SettingsChange) {
        if let Some(grid) = change.grid {
            self.settings.grid = grid;
            self.style.fit_mask_to(grid);
            cell::fit_masks(&mut self.cells, grid.corner_count());
        }
        if let Some(size) = change.cell_size {
            self.settings.set_cell_size(size);
        }
        if let Some(background) = change.background {
            self.settings.background = background;
        }
        if let Some(symmetry) = change.symmetry {
            self.settings.symmetry = symmetry;
        }
        if let Some(width) = change.stroke_width {
            self.settings.set_stroke_width(width);
        }
        if let Some(color) = change.stroke_color {
            self.settings.stroke_color = color;
        }
        if let Some(radius) = change.corner_radius {
            self.style.set_corner_radius(radius);
        }
    }
}

/// Apply raw command objects in order, skipping the ones that do not parse.
pub fn apply_batch(state: &mut BatchState, actions: &[Value], rng: &mut impl Rng) -> BatchReport {
    let mut report = BatchReport::default();
    for (index, action) in actions.iter().enumerate() {
        match AgentCommand::from_value(action) {
            Ok(command) => {
                log::debug!("agent command {index}: {}", command.name());
                state.apply(&command, rng);
                report.applied += 1;
            }
            Err(CommandError::UnknownType(kind)) => {
                log::debug!("ignoring agent command {index} of unknown type {kind:?}");
                report.ignored += 1;
            }
            Err(err) => {
                log::warn!("skipping agent command {index}: {err}");
                report.skipped += 1;
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::CellColor;
    use crate::grid::{CellKey, GridType};
    use crate::settings::Background;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use serde_json::json;

    fn state(grid: GridType, size: f64) -> BatchState {
        let mut settings = Settings::new();
        settings.grid = grid;
        settings.cell_size = size;
        BatchState {
            cells: CellMap::new(),
            settings,
            style: DrawStyle::new(),
        }
    }

    fn run(state: &mut BatchState, actions: Value) -> BatchReport {
        let actions = actions.as_array().cloned().unwrap_or_default();
        apply_batch(state, &actions, &mut StdRng::seed_from_u64(7))
    }

    #[test]
    fn test_set_grid_resets_stale_masks() {
        let mut st = state(GridType::Hexagon, 30.0);
        let hex_mask = vec![true, true, false, true, true, true];
        st.cells.insert(CellKey::new(0, 0), CellValue::new(CellColor::WHITE, 4.0, Some(hex_mask)));
        run(&mut st, json!([{"type": "set", "grid": "sq"}]));
        assert_eq!(st.cells[&CellKey::new(0, 0)].corner_mask, None);
        assert_eq!(st.style.corner_mask.len(), 4);
    }

    #[test]
    fn test_clear_then_circle() {
        let mut st = state(GridType::Square, 20.0);
        st.cells.insert(CellKey::new(30, 30), CellValue::solid(CellColor::WHITE));
        let report = run(
            &mut st,
            json!([
                {"type": "clear"},
                {"type": "circle", "row": 0, "col": 0, "radius": 2, "color": "#112233"}
            ]),
        );
        assert_eq!(report.applied, 2);
        assert_eq!(st.cells.len(), 13);
        let origin = GridType::Square.centroid(CellKey::new(0, 0), 20.0);
        for (key, value) in &st.cells {
            assert!((GridType::Square.centroid(*key, 20.0) - origin).hypot() <= 40.0 + 1e-9);
            assert_eq!(value.color.to_hex(), "#112233");
        }
    }

    #[test]
    fn test_place_uses_style_defaults() {
        let mut st = state(GridType::Square, 20.0);
        st.style.corner_radius = 4.0;
        run(
            &mut st,
            json!([{"type": "place", "cells": [{"row": 0, "col": 0}, {"row": 0, "col": 1, "color": "#fff", "radius": 0}]}]),
        );
        assert_eq!(st.cells[&CellKey::new(0, 0)].color, st.style.color);
        assert_eq!(st.cells[&CellKey::new(0, 0)].corner_radius, 4.0);
        assert_eq!(st.cells[&CellKey::new(0, 1)], CellValue::solid(CellColor::WHITE));
    }

    #[test]
    fn test_set_affects_later_commands() {
        let mut st = state(GridType::Square, 20.0);
        run(
            &mut st,
            json!([
                {"type": "set", "grid": "hex", "cellSize": 200, "bg": "dark", "cornerRadius": 3},
                {"type": "circle", "row": 0, "col": 0, "radius": 1}
            ]),
        );
        assert_eq!(st.settings.grid, GridType::Hexagon);
        assert_eq!(st.settings.cell_size, 80.0);
        assert_eq!(st.settings.background, Background::Dark);
        assert_eq!(st.style.corner_mask.len(), 6);
        // A hex and its six neighbors sit within one cell size of the center.
        assert_eq!(st.cells.len(), 7);
        assert!(st.cells.values().all(|v| v.corner_radius == 3.0 && v.color == CellColor::WHITE));
    }

    #[test]
    fn test_malformed_and_unknown_commands_are_skipped() {
        let mut st = state(GridType::Square, 20.0);
        let report = run(
            &mut st,
            json!([
                {"type": "place", "cells": [{"row": 0, "col": 0}]},
                {"type": "move", "dr": "one", "dc": 1},
                {"type": "sparkle"},
                "garbage",
                {"type": "move", "dr": 1, "dc": 1}
            ]),
        );
        assert_eq!(report, BatchReport { applied: 2, skipped: 2, ignored: 1 });
        assert!(st.cells.contains_key(&CellKey::new(1, 1)));
        assert_eq!(st.cells.len(), 1);
    }

    #[test]
    fn test_whole_canvas_transforms() {
        let mut st = state(GridType::Square, 10.0);
        run(
            &mut st,
            json!([
                {"type": "place", "cells": [{"row": 0, "col": 0, "color": "#ff0000"}, {"row": 0, "col": 1, "color": "#0000ff"}]},
                {"type": "flipH"},
                {"type": "recolor", "from": "#FF0000", "to": "#00ff00"}
            ]),
        );
        assert_eq!(st.cells[&CellKey::new(0, 0)].color.to_hex(), "#0000ff");
        assert_eq!(st.cells[&CellKey::new(0, 1)].color.to_hex(), "#00ff00");
    }

    #[test]
    fn test_ring_and_delete() {
        let mut st = state(GridType::Square, 10.0);
        run(
            &mut st,
            json!([
                {"type": "ring", "row": 0, "col": 0, "outerRadius": 3, "innerRadius": 2},
                {"type": "delete", "cells": [{"row": 0, "col": 3}]}
            ]),
        );
        assert!(!st.cells.is_empty());
        assert!(!st.cells.contains_key(&CellKey::new(0, 0)));
        assert!(!st.cells.contains_key(&CellKey::new(0, 3)));
        assert!(st.cells.contains_key(&CellKey::new(3, 0)));
    }

    #[test]
    fn test_empty_batch_changes_nothing() {
        let mut st = state(GridType::Triangle, 50.0);
        let before = st.clone();
        let report = run(&mut st, json!([]));
        assert!(!report.changed());
        assert_eq!(st, before);
    }
}
