//! Engine-wide configuration and the active drawing style.

use crate::color::CellColor;
use crate::grid::GridType;
use crate::symmetry::SymmetryMode;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Default cell size in world units.
pub const DEFAULT_CELL_SIZE: f64 = 50.0;
/// Allowed cell size range.
pub const CELL_SIZE_RANGE: RangeInclusive<f64> = 10.0..=80.0;
/// Allowed stroke width range.
pub const STROKE_WIDTH_RANGE: RangeInclusive<f64> = 0.0..=10.0;
/// Allowed corner radius range.
pub const CORNER_RADIUS_RANGE: RangeInclusive<f64> = 0.0..=20.0;

/// Built-in swatches, in toolbar order.
pub const PALETTE: [CellColor; 12] = [
    CellColor::rgb(0xff, 0x4d, 0x6a),
    CellColor::rgb(0xff, 0x8c, 0x42),
    CellColor::rgb(0xff, 0xd1, 0x66),
    CellColor::rgb(0x06, 0xd6, 0xa0),
    CellColor::rgb(0x1b, 0x9a, 0xaa),
    CellColor::rgb(0x43, 0x61, 0xee),
    CellColor::rgb(0x7c, 0x5c, 0xfc),
    CellColor::rgb(0xc7, 0x7d, 0xff),
    CellColor::rgb(0xf4, 0x72, 0xb6),
    CellColor::rgb(0xff, 0xff, 0xff),
    CellColor::rgb(0x88, 0x88, 0x88),
    CellColor::rgb(0x22, 0x22, 0x22),
];

fn clamp_to(value: f64, range: &RangeInclusive<f64>, fallback: f64) -> f64 {
    if value.is_finite() {
        value.clamp(*range.start(), *range.end())
    } else {
        fallback
    }
}

/// Canvas background mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Background {
    Dark,
    #[default]
    Light,
    /// Transparency checkerboard.
    Checker,
}

impl Background {
    /// Wire name (`dark`, `light`, `checker`).
    pub fn name(self) -> &'static str {
        match self {
            Background::Dark => "dark",
            Background::Light => "light",
            Background::Checker => "checker",
        }
    }

    /// Parse a wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "dark" => Some(Background::Dark),
            "light" => Some(Background::Light),
            "checker" => Some(Background::Checker),
            _ => None,
        }
    }
}

/// Engine-wide settings that shape geometry and presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub grid: GridType,
    pub cell_size: f64,
    pub background: Background,
    pub symmetry: SymmetryMode,
    pub stroke_width: f64,
    pub stroke_color: CellColor,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grid: GridType::default(),
            cell_size: DEFAULT_CELL_SIZE,
            background: Background::default(),
            symmetry: SymmetryMode::default(),
            stroke_width: 0.0,
            stroke_color: CellColor::BLACK,
        }
    }
}

impl Settings {
    /// Create settings with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cell size, clamped to `CELL_SIZE_RANGE`.
    pub fn set_cell_size(&mut self, size: f64) {
        self.cell_size = clamp_to(size, &CELL_SIZE_RANGE, self.cell_size);
    }

    /// Set the stroke width, clamped to `STROKE_WIDTH_RANGE`.
    pub fn set_stroke_width(&mut self, width: f64) {
        self.stroke_width = clamp_to(width, &STROKE_WIDTH_RANGE, self.stroke_width);
    }
}

/// The style new cells are painted with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawStyle {
    pub color: CellColor,
    /// Second color for gradient fills.
    pub gradient_color: CellColor,
    /// Opacity percentage, `0..=100`.
    pub opacity: u8,
    pub corner_radius: f64,
    /// One entry per vertex of the active grid type.
    pub corner_mask: Vec<bool>,
}

impl Default for DrawStyle {
    fn default() -> Self {
        Self {
            color: PALETTE[6],
            gradient_color: PALETTE[0],
            opacity: 100,
            corner_radius: 0.0,
            corner_mask: vec![true; GridType::default().corner_count()],
        }
    }
}

impl DrawStyle {
    /// Create a style with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the opacity percentage, clamped to 100.
    pub fn set_opacity(&mut self, opacity: u8) {
        self.opacity = opacity.min(100);
    }

    /// Set the default corner radius, clamped to `CORNER_RADIUS_RANGE`.
    pub fn set_corner_radius(&mut self, radius: f64) {
        self.corner_radius = clamp_to(radius, &CORNER_RADIUS_RANGE, self.corner_radius);
    }

    /// Color new cells are painted with, opacity applied.
    pub fn paint_color(&self) -> CellColor {
        self.color.with_opacity(self.opacity)
    }

    /// Reset the corner mask to all-rounded for a grid type.
    pub fn fit_mask_to(&mut self, grid: GridType) {
        if self.corner_mask.len() != grid.corner_count() {
            self.corner_mask = vec![true; grid.corner_count()];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::new();
        assert_eq!(settings.grid, GridType::Triangle);
        assert_eq!(settings.cell_size, 50.0);
        assert_eq!(settings.background, Background::Light);
        assert_eq!(settings.symmetry, SymmetryMode::None);
        assert_eq!(settings.stroke_width, 0.0);

        let style = DrawStyle::new();
        assert_eq!(style.color.to_hex(), "#7c5cfc");
        assert_eq!(style.gradient_color.to_hex(), "#ff4d6a");
        assert_eq!(style.corner_mask.len(), 3);
    }

    #[test]
    fn test_clamped_setters() {
        let mut settings = Settings::new();
        settings.set_cell_size(500.0);
        assert_eq!(settings.cell_size, 80.0);
        settings.set_cell_size(1.0);
        assert_eq!(settings.cell_size, 10.0);
        settings.set_cell_size(f64::NAN);
        assert_eq!(settings.cell_size, 10.0);
        settings.set_stroke_width(-4.0);
        assert_eq!(settings.stroke_width, 0.0);

        let mut style = DrawStyle::new();
        style.set_corner_radius(99.0);
        assert_eq!(style.corner_radius, 20.0);
        style.set_opacity(250);
        assert_eq!(style.opacity, 100);
    }

    #[test]
    fn test_paint_color_applies_opacity() {
        let mut style = DrawStyle::new();
        assert_eq!(style.paint_color().to_hex(), "#7c5cfc");
        style.set_opacity(50);
        assert_eq!(style.paint_color().to_hex(), "#7c5cfc7f");
    }

    #[test]
    fn test_mask_follows_grid() {
        let mut style = DrawStyle::new();
        style.corner_mask = vec![false, true, true];
        style.fit_mask_to(GridType::Triangle);
        assert_eq!(style.corner_mask, vec![false, true, true]);
        style.fit_mask_to(GridType::Hexagon);
        assert_eq!(style.corner_mask, vec![true; 6]);
    }

    #[test]
    fn test_settings_serde() {
        let json = r#"{"grid":"hex","cell_size":30,"background":"checker","symmetry":"r6"}"#;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.grid, GridType::Hexagon);
        assert_eq!(settings.cell_size, 30.0);
        assert_eq!(settings.background, Background::Checker);
        assert_eq!(settings.symmetry, SymmetryMode::R6);
        assert_eq!(settings.stroke_color, CellColor::BLACK);
        assert_eq!(Background::from_name("dark").and_then(Background::fill).map(|c| c.to_hex()).as_deref(), Some("#0e0e12"));
    }
}
