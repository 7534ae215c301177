//! Tool system for the mosaic canvas.

use crate::grid::{CellKey, GridType};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Line sampling step as a fraction of the cell size.
const LINE_STEP: f64 = 0.3;
/// Most samples a single line may take.
pub const MAX_LINE_SAMPLES: usize = 10_000;

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    /// Paint empty cells, or erase painted ones, depending on where the drag starts.
    #[default]
    Paint,
    Erase,
    Select,
    #[serde(rename = "pick")]
    ColorPick,
    #[serde(rename = "fill")]
    RegionFill,
    Line,
}

impl ToolKind {
    /// All tools, in toolbar order.
    pub const ALL: [ToolKind; 6] = [
        ToolKind::Paint,
        ToolKind::Erase,
        ToolKind::Select,
        ToolKind::ColorPick,
        ToolKind::RegionFill,
        ToolKind::Line,
    ];

    /// Wire name.
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Paint => "paint",
            ToolKind::Erase => "erase",
            ToolKind::Select => "select",
            ToolKind::ColorPick => "pick",
            ToolKind::RegionFill => "fill",
            ToolKind::Line => "line",
        }
    }

    /// Keyboard shortcut shown in the toolbar.
    pub fn shortcut(self) -> char {
        match self {
            ToolKind::Paint => 'P',
            ToolKind::Erase => 'E',
            ToolKind::Select => 'S',
            ToolKind::ColorPick => 'I',
            ToolKind::RegionFill => 'G',
            ToolKind::Line => 'L',
        }
    }

    /// Look up a tool by its shortcut key (case-insensitive).
    pub fn from_shortcut(key: char) -> Option<Self> {
        let key = key.to_ascii_uppercase();
        Self::ALL.into_iter().find(|t| t.shortcut() == key)
    }
}

/// Whether a paint drag adds or removes cells.
///
/// Decided once from the cell under the pointer when the drag starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintMode {
    Paint,
    Erase,
}

/// State of a tool interaction.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ToolState {
    /// Tool is idle, waiting for interaction.
    #[default]
    Idle,
    /// Dragging the view with a secondary button. Holds the last screen position.
    Panning { last: Point },
    /// Paint drag; `last` is the most recently visited cell.
    Painting { mode: PaintMode, last: Option<CellKey> },
    /// Moving the selection; `anchor` is the cell the pointer last re-keyed from.
    MovingSelection { anchor: CellKey },
    /// Rubber-band selection in world coordinates.
    BoxSelecting { start: Point, current: Point },
}

/// Manages the current tool and its state.
#[derive(Debug, Clone, Default)]
pub struct ToolManager {
    /// Currently selected tool.
    pub current_tool: ToolKind,
    /// Current state of the tool.
    pub state: ToolState,
    /// First endpoint of a pending line, in world coordinates.
    line_anchor: Option<Point>,
}

impl ToolManager {
    /// Create a new tool manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the current tool, abandoning any gesture or pending line.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.current_tool = tool;
        self.state = ToolState::Idle;
        self.line_anchor = None;
    }

    /// Whether a gesture is in progress.
    pub fn is_active(&self) -> bool {
        !matches!(self.state, ToolState::Idle)
    }

    /// End the current gesture.
    pub fn reset(&mut self) {
        self.state = ToolState::Idle;
    }

    /// Pending line start, if the first click has been made.
    pub fn line_anchor(&self) -> Option<Point> {
        self.line_anchor
    }

    /// Record the first endpoint of a line.
    pub fn set_line_anchor(&mut self, point: Point) {
        self.line_anchor = Some(point);
    }

    /// Consume the pending line start.
    pub fn take_line_anchor(&mut self) -> Option<Point> {
        self.line_anchor.take()
    }

    /// Current rubber-band rectangle in world coordinates, for preview.
    pub fn selection_box(&self) -> Option<Rect> {
        match self.state {
            ToolState::BoxSelecting { start, current } => Some(Rect::from_points(start, current)),
            _ => None,
        }
    }
}

/// Cells crossed by the segment `a`-`b`, in order from `a`, without repeats.
///
/// The segment is sampled every 0.3 cells and each sample is hit-tested.
/// Very long segments are sampled at most `MAX_LINE_SAMPLES` times.
pub fn line_cells(grid: GridType, size: f64, a: Point, b: Point) -> Vec<CellKey> {
    let length = (b.x - a.x).abs().max((b.y - a.y).abs());
    let steps = (length / (size * LINE_STEP)).ceil();
    let n = if steps.is_finite() && steps >= 1.0 {
        (steps as usize).min(MAX_LINE_SAMPLES)
    } else {
        1
    };

    let mut seen = BTreeSet::new();
    let mut keys = Vec::new();
    for i in 0..=n {
        let t = i as f64 / n as f64;
        if let Some(key) = grid.cell_at(a.lerp(b, t), size) {
            if seen.insert(key) {
                keys.push(key);
            }
        }
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_manager_default() {
        let tm = ToolManager::new();
        assert_eq!(tm.current_tool, ToolKind::Paint);
        assert!(!tm.is_active());
        assert!(tm.line_anchor().is_none());
    }

    #[test]
    fn test_set_tool_resets_gesture() {
        let mut tm = ToolManager::new();
        tm.state = ToolState::Painting {
            mode: PaintMode::Erase,
            last: None,
        };
        tm.set_line_anchor(Point::new(1.0, 2.0));
        tm.set_tool(ToolKind::Line);
        assert!(!tm.is_active());
        assert!(tm.line_anchor().is_none());
    }

    #[test]
    fn test_tool_names_and_shortcuts() {
        for tool in ToolKind::ALL {
            assert_eq!(ToolKind::from_shortcut(tool.shortcut()), Some(tool));
            let json = serde_json::to_string(&tool).unwrap();
            assert_eq!(json, format!("\"{}\"", tool.name()));
        }
        assert_eq!(ToolKind::from_shortcut('g'), Some(ToolKind::RegionFill));
        assert_eq!(ToolKind::from_shortcut('z'), None);
    }

    #[test]
    fn test_selection_box_normalized() {
        let mut tm = ToolManager::new();
        tm.state = ToolState::BoxSelecting {
            start: Point::new(10.0, 10.0),
            current: Point::new(-5.0, 2.0),
        };
        assert_eq!(tm.selection_box(), Some(Rect::new(-5.0, 2.0, 10.0, 10.0)));
    }

    #[test]
    fn test_line_cells_square_row() {
        let keys = line_cells(
            GridType::Square,
            10.0,
            Point::new(5.0, 5.0),
            Point::new(45.0, 5.0),
        );
        let expected: Vec<_> = (0..5).map(|c| CellKey::new(0, c)).collect();
        assert_eq!(keys, expected);
    }

    #[test]
    fn test_line_cells_single_point() {
        let p = Point::new(3.0, 3.0);
        assert_eq!(line_cells(GridType::Square, 10.0, p, p), vec![CellKey::new(0, 0)]);
    }

    #[test]
    fn test_line_cells_far_endpoints_are_bounded() {
        let a = Point::new(5.0, 5.0);
        let b = Point::new(1.0e9, 5.0);
        let keys = line_cells(GridType::Square, 10.0, a, b);
        assert!(keys.len() <= MAX_LINE_SAMPLES + 1);
        assert_eq!(keys.first(), Some(&CellKey::new(0, 0)));
        let unique: BTreeSet<_> = keys.iter().copied().collect();
        assert_eq!(unique.len(), keys.len());
    }

    #[test]
    fn test_line_cells_endpoints_on_every_grid() {
        for grid in GridType::ALL {
            let a = Point::new(-70.0, 20.0);
            let b = Point::new(130.0, -60.0);
            let keys = line_cells(grid, 25.0, a, b);
            assert_eq!(keys.first(), grid.cell_at(a, 25.0).as_ref());
            assert_eq!(keys.last(), grid.cell_at(b, 25.0).as_ref());
        }
    }
}
