//! Built-in starter designs.

use crate::cell::{CellMap, CellValue};
use crate::color::CellColor;
use crate::grid::CellKey;
use serde::{Deserialize, Serialize};

const PURPLE: CellColor = CellColor::rgb(0x7c, 0x5c, 0xfc);
const BLUE: CellColor = CellColor::rgb(0x43, 0x61, 0xee);
const ROSE: CellColor = CellColor::rgb(0xff, 0x4d, 0x6a);
const PINK: CellColor = CellColor::rgb(0xf4, 0x72, 0xb6);
const LILAC: CellColor = CellColor::rgb(0xc7, 0x7d, 0xff);
const MINT: CellColor = CellColor::rgb(0x06, 0xd6, 0xa0);
const TEAL: CellColor = CellColor::rgb(0x1b, 0x9a, 0xaa);

/// A named starter design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Template {
    Diamond,
    Flower,
    Arrow,
}

impl Template {
    /// All templates, in menu order.
    pub const ALL: [Template; 3] = [Template::Diamond, Template::Flower, Template::Arrow];

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Template::Diamond => "Diamond",
            Template::Flower => "Flower",
            Template::Arrow => "Arrow",
        }
    }

    /// Case-insensitive lookup by name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(name.trim()))
    }

    fn entries(self) -> &'static [(i32, i32, CellColor)] {
        match self {
            Template::Diamond => &[
                (0, 0, PURPLE),
                (0, 1, BLUE),
                (-1, 0, PURPLE),
                (-1, 1, BLUE),
                (1, 0, BLUE),
                (1, 1, PURPLE),
                (0, -1, BLUE),
                (0, 2, PURPLE),
            ],
            Template::Flower => &[
                (0, 0, ROSE),
                (0, 1, PINK),
                (0, -1, PINK),
                (1, 0, PINK),
                (-1, 0, PINK),
                (1, 1, LILAC),
                (-1, -1, LILAC),
            ],
            Template::Arrow => &[
                (0, 0, MINT),
                (0, 1, MINT),
                (0, 2, MINT),
                (-1, 1, TEAL),
                (1, 1, TEAL),
                (-2, 2, TEAL),
                (2, 2, TEAL),
            ],
        }
    }

    /// The template's cells, flat with sharp corners.
    pub fn cells(self) -> CellMap {
        self.entries()
            .iter()
            .map(|&(row, col, color)| (CellKey::new(row, col), CellValue::solid(color)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_sizes() {
        assert_eq!(Template::Diamond.cells().len(), 8);
        assert_eq!(Template::Flower.cells().len(), 7);
        assert_eq!(Template::Arrow.cells().len(), 7);
    }

    #[test]
    fn test_template_lookup() {
        for t in Template::ALL {
            assert_eq!(Template::from_name(t.name()), Some(t));
        }
        assert_eq!(Template::from_name(" flower "), Some(Template::Flower));
        assert_eq!(Template::from_name("star"), None);
    }

    #[test]
    fn test_flower_center() {
        let cells = Template::Flower.cells();
        assert_eq!(cells[&CellKey::new(0, 0)].color.to_hex(), "#ff4d6a");
    }
}
