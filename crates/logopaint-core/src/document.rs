//! Persisted document format.
//!
//! On disk a document is `{"cells": [["row,col", "packed"], ...], "grid": "tri", "size": 50}`.
//! A packed value is `color`, `color|radius` or `color|radius|mask`, where the
//! mask is one comma-separated `1`/`0` per corner. Packing happens only here.

use crate::cell::{CellMap, CellValue};
use crate::color::{CellColor, ColorError};
use crate::grid::{CellKey, GridType, KeyError};
use crate::settings::CELL_SIZE_RANGE;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while reading a document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Key(#[from] KeyError),
    #[error(transparent)]
    Color(#[from] ColorError),
    #[error("invalid corner radius in {0:?}")]
    Radius(String),
}

/// Serialized canvas.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    /// `(key, packed value)` pairs in row-major order.
    pub cells: Vec<(String, String)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid: Option<GridType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
}

impl Document {
    /// Capture a cell map with its geometry.
    pub fn from_cells(cells: &CellMap, grid: GridType, size: f64) -> Self {
        Self {
            cells: cells
                .iter()
                .map(|(key, value)| (key.to_string(), pack(value)))
                .collect(),
            grid: Some(grid),
            size: Some(size),
        }
    }

    /// Decode the cells. Any bad entry fails the whole document.
    pub fn cell_map(&self) -> Result<CellMap, DocumentError> {
        self.cells
            .iter()
            .map(|(key, packed)| -> Result<_, DocumentError> {
                Ok((key.parse::<CellKey>()?, unpack(packed)?))
            })
            .collect()
    }

    /// Stored cell size, if present and usable.
    pub fn cell_size(&self) -> Option<f64> {
        self.size
            .filter(|s| s.is_finite())
            .map(|s| s.clamp(*CELL_SIZE_RANGE.start(), *CELL_SIZE_RANGE.end()))
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Encode a cell value in the compact string form.
pub fn pack(value: &CellValue) -> String {
    if value.corner_radius <= 0.0 {
        return value.color.to_hex();
    }
    let mut out = format!("{}|{}", value.color.to_hex(), value.corner_radius);
    if let Some(mask) = value.corner_mask.as_ref().filter(|m| !m.iter().all(|&b| b)) {
        let bits: Vec<&str> = mask.iter().map(|&b| if b { "1" } else { "0" }).collect();
        out.push('|');
        out.push_str(&bits.join(","));
    }
    out
}

/// Decode the compact string form. A legacy `@shape` suffix is ignored.
pub fn unpack(packed: &str) -> Result<CellValue, DocumentError> {
    let main = packed.split_once('@').map_or(packed, |(main, _)| main);
    let mut parts = main.splitn(3, '|');
    let color = CellColor::parse(parts.next().unwrap_or_default())?;

    let radius = match parts.next() {
        Some(raw) => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|r| r.is_finite())
            .ok_or_else(|| DocumentError::Radius(packed.to_string()))?,
        None => 0.0,
    };
    let mask = parts
        .next()
        .map(|raw| raw.split(',').map(|bit| bit.trim() == "1").collect());

    Ok(CellValue::new(color, radius, mask))
}
