//! Painted cell values and the cell map.

use crate::color::CellColor;
use crate::grid::CellKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Painted cells keyed by position. Absence means background.
pub type CellMap = BTreeMap<CellKey, CellValue>;

/// Appearance of one painted cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellValue {
    pub color: CellColor,
    /// Corner rounding radius in world units.
    #[serde(default)]
    pub corner_radius: f64,
    /// Which corners are rounded, one entry per vertex. `None` rounds all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner_mask: Option<Vec<bool>>,
}

impl CellValue {
    /// A flat cell with sharp corners.
    pub fn solid(color: CellColor) -> Self {
        Self {
            color,
            corner_radius: 0.0,
            corner_mask: None,
        }
    }

    /// Build a cell value in canonical form.
    ///
    /// The radius is clamped to be non-negative. The mask is dropped when it
    /// has no effect: no rounding, or every corner rounded.
    pub fn new(color: CellColor, corner_radius: f64, corner_mask: Option<Vec<bool>>) -> Self {
        let corner_radius = if corner_radius.is_finite() {
            corner_radius.max(0.0)
        } else {
            0.0
        };
        let corner_mask = corner_mask
            .filter(|mask| corner_radius > 0.0 && !mask.iter().all(|&b| b));
        Self {
            color,
            corner_radius,
            corner_mask,
        }
    }

    /// Same shape, different color.
    pub fn recolored(&self, color: CellColor) -> Self {
        Self {
            color,
            ..self.clone()
        }
    }

    /// Corner mask resized for a grid with `corners` vertices.
    ///
    /// A mask recorded under a different grid type no longer lines up with
    /// the polygon and reads as all corners rounded.
    pub fn mask_for(&self, corners: usize) -> Vec<bool> {
        match &self.corner_mask {
            Some(mask) if mask.len() == corners => mask.clone(),
            _ => vec![true; corners],
        }
    }
}

/// Drop corner masks that do not match a grid with `corners` vertices.
///
/// Returns how many cells were reset to all corners rounded.
pub fn fit_masks(cells: &mut CellMap, corners: usize) -> usize {
    let mut reset = 0;
    for value in cells.values_mut() {
        if value.corner_mask.as_ref().is_some_and(|m| m.len() != corners) {
            value.corner_mask = None;
            reset += 1;
        }
    }
    if reset > 0 {
        log::debug!("reset {reset} corner masks for {corners}-corner cells");
    }
    reset
}
