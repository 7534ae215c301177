//! Canvas engine: cells, selection, groups and history.
//!
//! Every mutation goes through a method on [`Canvas`] that records exactly
//! one history snapshot before changing anything. Pointer gestures live in
//! the `pointer` submodule.

mod pointer;

use crate::agent::{self, AgentError, AgentReply, BatchReport, BatchState};
use crate::camera::Camera;
use crate::cell::{self, CellMap, CellValue};
use crate::color::CellColor;
use crate::document::{Document, DocumentError};
use crate::fill::{FillError, MAX_FILL_CELLS, fill_region};
use crate::grid::{self, CellKey, GridType};
use crate::history::History;
use crate::selection::{Group, GroupId};
use crate::settings::{Background, DrawStyle, Settings};
use crate::symmetry::{SymmetryMode, orbit};
use crate::templates::Template;
use crate::tools::{ToolKind, ToolManager, line_cells};
use crate::transform::{self, GradientDirection, Transform};
use crate::view::{self, RenderCell, VisibleRange};
use kurbo::{Point, Rect, Size};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::Value;
use std::collections::BTreeSet;
use uuid::Uuid;

/// Screen padding kept around the content by `fit_to_content`.
const FIT_PADDING: f64 = 50.0;

/// The mosaic canvas and everything needed to edit it.
#[derive(Debug, Clone)]
pub struct Canvas {
    /// Session identifier.
    pub id: Uuid,
    cells: CellMap,
    selection: BTreeSet<CellKey>,
    groups: Vec<Group>,
    history: History<CellMap>,
    settings: Settings,
    /// Style applied to newly painted cells.
    pub style: DrawStyle,
    pub camera: Camera,
    pub tools: ToolManager,
    rng: StdRng,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    /// Create an empty canvas with default settings.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Create an empty canvas whose randomized operations are reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            id: Uuid::new_v4(),
            cells: CellMap::new(),
            selection: BTreeSet::new(),
            groups: Vec::new(),
            history: History::new(),
            settings: Settings::new(),
            style: DrawStyle::new(),
            camera: Camera::new(),
            tools: ToolManager::new(),
            rng,
        }
    }

    // --- State access ---

    /// Painted cells.
    pub fn cells(&self) -> &CellMap {
        &self.cells
    }

    /// Selected keys. May include unpainted keys.
    pub fn selection(&self) -> &BTreeSet<CellKey> {
        &self.selection
    }

    /// Saved groups, oldest first.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Engine-wide settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Whether nothing is painted.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of painted cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    fn grid(&self) -> GridType {
        self.settings.grid
    }

    fn cell_size(&self) -> f64 {
        self.settings.cell_size
    }

    fn has_painted_selection(&self) -> bool {
        self.selection.iter().any(|k| self.cells.contains_key(k))
    }

    // --- Settings ---

    /// Switch tessellation. Painted keys are kept as they are; corner masks
    /// that no longer match the vertex count are reset.
    pub fn set_grid(&mut self, grid: GridType) {
        self.settings.grid = grid;
        self.style.fit_mask_to(grid);
        cell::fit_masks(&mut self.cells, grid.corner_count());
    }

    pub fn set_cell_size(&mut self, size: f64) {
        self.settings.set_cell_size(size);
    }

    pub fn set_background(&mut self, background: Background) {
        self.settings.background = background;
    }

    /// Change the symmetry used by future painting. Existing cells are untouched.
    pub fn set_symmetry(&mut self, symmetry: SymmetryMode) {
        self.settings.symmetry = symmetry;
    }

    pub fn set_stroke(&mut self, width: f64, color: CellColor) {
        self.settings.set_stroke_width(width);
        self.settings.stroke_color = color;
    }

    /// Set the viewport size in screen pixels.
    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        self.camera.viewport = Size::new(width, height);
    }

    /// Set the current tool.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.tools.set_tool(tool);
    }

    // --- History ---

    fn push_undo(&mut self) {
        self.history.snapshot(&self.cells);
    }

    /// Undo the last change. The selection is cleared.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self) -> bool {
        let done = self.history.undo(&mut self.cells);
        if done {
            self.after_history_step();
        }
        done
    }

    /// Redo the last undone change. The selection is cleared.
    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo(&mut self) -> bool {
        let done = self.history.redo(&mut self.cells);
        if done {
            self.after_history_step();
        }
        done
    }

    /// Snapshots may predate a grid change or a selection move.
    fn after_history_step(&mut self) {
        let corner_count = self.grid().corner_count();
        cell::fit_masks(&mut self.cells, corner_count);
        self.selection.clear();
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // --- Painting ---

    /// Value newly painted cells receive: style color with opacity, radius and mask.
    pub fn paint_value(&self) -> CellValue {
        CellValue::new(
            self.style.paint_color(),
            self.style.corner_radius,
            Some(self.style.corner_mask.clone()),
        )
    }

    /// Paint (`Some`) or erase (`None`) a cell and its symmetry orbit.
    /// Does not record history.
    fn apply_orbit(&mut self, key: CellKey, value: Option<&CellValue>) {
        for k in orbit(self.grid(), key, self.settings.symmetry) {
            match value {
                Some(v) => {
                    self.cells.insert(k, v.clone());
                }
                None => {
                    self.cells.remove(&k);
                }
            }
        }
    }

    /// Flood fill the empty region containing `key` with the paint value.
    ///
    /// Returns the number of cells painted. Nothing is recorded when the
    /// start cell is painted or the region is not enclosed.
    pub fn fill_at(&mut self, key: CellKey) -> Result<usize, FillError> {
        let region = fill_region(
            &self.cells,
            self.grid(),
            key,
            self.settings.symmetry,
            MAX_FILL_CELLS,
        )?;
        self.push_undo();
        let value = self.paint_value();
        for k in &region {
            self.cells.insert(*k, value.clone());
        }
        Ok(region.len())
    }

    /// Paint the cells crossed by the world-space segment `a`-`b`, with orbits.
    pub fn draw_line(&mut self, a: Point, b: Point) -> usize {
        let keys = line_cells(self.grid(), self.cell_size(), a, b);
        if keys.is_empty() {
            return 0;
        }
        self.push_undo();
        let value = self.paint_value();
        for key in &keys {
            self.apply_orbit(*key, Some(&value));
        }
        keys.len()
    }

    /// Copy a painted cell's color, radius and mask into the style.
    pub fn pick(&mut self, key: CellKey) -> bool {
        let Some(value) = self.cells.get(&key) else {
            return false;
        };
        self.style.color = value.color.with_alpha(255);
        self.style.set_corner_radius(value.corner_radius);
        if value.corner_mask.is_some() {
            self.style.corner_mask = value.mask_for(self.grid().corner_count());
        }
        log::debug!("picked {} from {key}", self.style.color);
        true
    }

    /// Remove every cell and the selection.
    pub fn clear_all(&mut self) {
        self.push_undo();
        self.cells.clear();
        self.selection.clear();
    }

    /// Replace the canvas with a built-in design.
    pub fn load_template(&mut self, template: Template) {
        self.push_undo();
        self.cells = template.cells();
        self.selection.clear();
        log::info!("loaded template {}", template.name());
    }

    // --- Selection ---

    /// Replace the selection.
    pub fn select_keys(&mut self, keys: impl IntoIterator<Item = CellKey>) {
        self.selection = keys.into_iter().collect();
        self.sync_style_to_selection();
    }

    /// Add one key to the selection.
    pub fn extend_selection(&mut self, key: CellKey) {
        self.selection.insert(key);
        self.sync_style_to_selection();
    }

    /// Select every painted cell.
    pub fn select_all(&mut self) {
        let keys: Vec<_> = self.cells.keys().copied().collect();
        self.select_keys(keys);
    }

    pub fn deselect(&mut self) {
        self.selection.clear();
    }

    pub fn is_selected(&self, key: CellKey) -> bool {
        self.selection.contains(&key)
    }

    /// Reflect the first selected cell's rounding into the style, so the
    /// radius and corner controls show what is selected.
    fn sync_style_to_selection(&mut self) {
        let corners = self.grid().corner_count();
        let Some(value) = self.selection.iter().find_map(|k| self.cells.get(k)) else {
            return;
        };
        let (radius, mask) = (value.corner_radius, value.corner_mask.clone());
        self.style.set_corner_radius(radius);
        if let Some(mask) = mask.filter(|m| m.len() == corners) {
            self.style.corner_mask = mask;
        }
    }

    /// Delete the selected cells. Returns how many were painted.
    pub fn delete_selected(&mut self) -> usize {
        if self.selection.is_empty() {
            return 0;
        }
        self.push_undo();
        let mut removed = 0;
        for key in std::mem::take(&mut self.selection) {
            if self.cells.remove(&key).is_some() {
                removed += 1;
            }
        }
        removed
    }

    fn transform_selection(&mut self, t: Transform) -> bool {
        if !self.has_painted_selection() {
            return false;
        }
        self.push_undo();
        let keys = std::mem::take(&mut self.selection);
        self.selection =
            transform::transform_cells(&mut self.cells, keys, self.settings.grid, self.settings.cell_size, t);
        true
    }

    /// Mirror the selection left to right about its own center.
    pub fn flip_selection_horizontal(&mut self) -> bool {
        self.transform_selection(Transform::FlipHorizontal)
    }

    /// Mirror the selection top to bottom about its own center.
    pub fn flip_selection_vertical(&mut self) -> bool {
        self.transform_selection(Transform::FlipVertical)
    }

    /// Turn the selection a quarter clockwise about its own center.
    pub fn rotate_selection(&mut self) -> bool {
        self.transform_selection(Transform::Rotate90)
    }

    /// Shift the selection in index space.
    pub fn move_selection(&mut self, d_row: i32, d_col: i32) -> bool {
        if !self.has_painted_selection() {
            return false;
        }
        self.push_undo();
        let keys = std::mem::take(&mut self.selection);
        self.selection = transform::shift_cells(&mut self.cells, keys, d_row, d_col);
        true
    }

    /// Left-to-right gradient from the style color to the gradient color.
    pub fn gradient_selection(&mut self) -> usize {
        if !self.has_painted_selection() {
            return 0;
        }
        self.push_undo();
        transform::apply_gradient(
            &mut self.cells,
            self.selection.iter().copied(),
            self.settings.grid,
            self.settings.cell_size,
            self.style.color,
            self.style.gradient_color,
            GradientDirection::Horizontal,
        )
    }

    /// Jitter the colors of the selected cells.
    pub fn randomize_selection(&mut self) -> usize {
        if !self.has_painted_selection() {
            return 0;
        }
        self.push_undo();
        transform::randomize_colors(&mut self.cells, self.selection.iter().copied(), &mut self.rng)
    }

    /// Set the style radius and apply it to the selected cells.
    pub fn set_selection_radius(&mut self, radius: f64) -> usize {
        self.style.set_corner_radius(radius);
        let radius = self.style.corner_radius;
        self.restyle_selection(|v| CellValue::new(v.color, radius, v.corner_mask.clone()))
    }

    /// Set the style corner mask and apply it to the selected cells.
    ///
    /// Masks of the wrong length for the active grid are rejected.
    pub fn set_selection_mask(&mut self, mask: Vec<bool>) -> usize {
        if mask.len() != self.grid().corner_count() {
            log::warn!("ignoring corner mask of length {} for {}", mask.len(), self.grid());
            return 0;
        }
        self.style.corner_mask = mask.clone();
        self.restyle_selection(|v| CellValue::new(v.color, v.corner_radius, Some(mask.clone())))
    }

    fn restyle_selection(&mut self, restyle: impl Fn(&CellValue) -> CellValue) -> usize {
        if !self.has_painted_selection() {
            return 0;
        }
        self.push_undo();
        let mut count = 0;
        for key in &self.selection {
            if let Some(value) = self.cells.get_mut(key) {
                *value = restyle(value);
                count += 1;
            }
        }
        count
    }

    // --- Groups ---

    /// Save the current selection as a group tagged with the style color.
    pub fn group_selection(&mut self) -> Option<GroupId> {
        if self.selection.is_empty() {
            return None;
        }
        let group = Group::new(self.selection.clone(), self.style.color);
        let id = group.id;
        self.groups.push(group);
        Some(id)
    }

    /// Replace a group's keys with the current selection.
    pub fn regroup(&mut self, id: GroupId) -> bool {
        let selection = self.selection.clone();
        match self.groups.iter_mut().find(|g| g.id == id) {
            Some(group) => {
                group.keys = selection;
                true
            }
            None => false,
        }
    }

    /// Make a group's keys the selection.
    pub fn select_group(&mut self, id: GroupId) -> bool {
        let Some(keys) = self.groups.iter().find(|g| g.id == id).map(|g| g.keys.clone()) else {
            return false;
        };
        self.select_keys(keys);
        true
    }

    // --- Agent ---

    /// Apply a batch of raw agent commands as one history entry.
    ///
    /// Commands run in order against a working copy that replaces the live
    /// state only when the batch is done. The selection is cleared.
    pub fn apply_agent_batch(&mut self, actions: &[Value]) -> BatchReport {
        let mut state = BatchState {
            cells: self.cells.clone(),
            settings: self.settings.clone(),
            style: self.style.clone(),
        };
        let report = agent::apply_batch(&mut state, actions, &mut self.rng);
        if !report.changed() {
            log::info!("agent batch had no applicable commands");
            return report;
        }

        self.push_undo();
        self.cells = state.cells;
        self.settings = state.settings;
        self.style = state.style;
        self.selection.clear();
        log::info!(
            "agent batch: {} applied, {} skipped, {} ignored",
            report.applied,
            report.skipped,
            report.ignored
        );
        report
    }

    /// Apply the outcome of an agent request.
    ///
    /// On success returns the message to show. On failure the canvas is left
    /// untouched and the error is handed back for display.
    pub fn apply_agent_reply(&mut self, reply: Result<String, AgentError>) -> Result<String, AgentError> {
        let text = reply.inspect_err(|err| log::warn!("agent request failed: {err}"))?;
        let parsed = AgentReply::parse(&text)?;
        self.apply_agent_batch(&parsed.actions);
        Ok(parsed.message_or_default().to_string())
    }

    /// Row-by-row description handed to the agent with each request.
    pub fn describe(&self) -> String {
        agent::describe_canvas(&self.cells, self.grid())
    }

    // --- Persistence ---

    /// Snapshot the cells and geometry for saving.
    pub fn to_document(&self) -> Document {
        Document::from_cells(&self.cells, self.grid(), self.cell_size())
    }

    /// Replace the canvas with a saved document. History, selection and
    /// groups start over. On error nothing changes.
    pub fn load_document(&mut self, document: &Document) -> Result<(), DocumentError> {
        let cells = document.cell_map()?;
        if let Some(grid) = document.grid {
            self.set_grid(grid);
        }
        if let Some(size) = document.cell_size() {
            self.settings.cell_size = size;
        }
        self.cells = cells;
        let corner_count = self.grid().corner_count();
        cell::fit_masks(&mut self.cells, corner_count);
        self.selection.clear();
        self.groups.clear();
        self.history.clear();
        self.tools.reset();
        log::info!("loaded document: {} cells on {}", self.cells.len(), self.grid());
        Ok(())
    }

    // --- Views ---

    /// Index range visible through the camera.
    pub fn visible_range(&self) -> VisibleRange {
        VisibleRange::for_camera(&self.camera, self.grid(), self.cell_size())
    }

    /// Painted cells in view, ready to draw.
    pub fn visible_cells(&self) -> impl Iterator<Item = RenderCell<'_>> {
        view::visible_cells(&self.cells, self.grid(), self.cell_size(), self.visible_range())
    }

    /// Every painted cell, for export.
    pub fn render_cells(&self) -> impl Iterator<Item = RenderCell<'_>> {
        view::render_cells(&self.cells, self.grid(), self.cell_size())
    }

    /// Bounding box of the painted cells, padded by half a cell.
    pub fn content_bounds(&self) -> Option<Rect> {
        grid::content_bounds(self.cells.keys().copied(), self.grid(), self.cell_size())
    }

    /// Point the camera at the painted cells.
    pub fn fit_to_content(&mut self) {
        if let Some(bounds) = self.content_bounds() {
            self.camera.fit_to_bounds(bounds, FIT_PADDING);
        }
    }
}
