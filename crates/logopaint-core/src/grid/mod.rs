//! Grid tessellations: cell keys, grid types and per-type geometry.

mod adjacency;
mod geometry;
mod hit;

pub use geometry::{cell_path, content_bounds};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// `sqrt(3)`, used by the hexagon tessellation.
pub(crate) const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// Error returned when a cell key string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid cell key {0:?}, expected \"row,col\"")]
pub struct KeyError(pub String);

/// Identifies one tile in a conceptually infinite grid.
///
/// Keys are grid-relative: the same key names the same topological cell
/// regardless of cell size, pan, zoom or rotation. Ordering is row-major,
/// which keeps traversals of a `BTreeMap<CellKey, _>` stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct CellKey {
    pub row: i32,
    pub col: i32,
}

impl CellKey {
    /// Create a new cell key.
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Shift the key by a row/column delta in index space.
    pub fn offset(self, d_row: i32, d_col: i32) -> Self {
        Self::new(self.row.wrapping_add(d_row), self.col.wrapping_add(d_col))
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row, self.col)
    }
}

impl FromStr for CellKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (row, col) = s.split_once(',').ok_or_else(|| KeyError(s.to_string()))?;
        let row = row.trim().parse().map_err(|_| KeyError(s.to_string()))?;
        let col = col.trim().parse().map_err(|_| KeyError(s.to_string()))?;
        Ok(Self::new(row, col))
    }
}

impl Serialize for CellKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CellKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl From<(i32, i32)> for CellKey {
    fn from((row, col): (i32, i32)) -> Self {
        Self::new(row, col)
    }
}

/// The five supported tessellations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GridType {
    #[serde(rename = "sq", alias = "square")]
    Square,
    /// Half-width columns; `(row + col)` even points up, odd points down.
    #[default]
    #[serde(rename = "tri", alias = "triangle")]
    Triangle,
    /// Squares split along the anti-diagonal; even columns take the
    /// upper-left half, odd columns the lower-right half.
    #[serde(rename = "rtri", alias = "right-triangle")]
    RightTriangle,
    /// Rhombi rotated 45 degrees, rows at half height, odd rows offset.
    #[serde(rename = "dia", alias = "diamond")]
    Diamond,
    /// Pointy-top hexagons, odd rows offset by half a hexagon width.
    #[serde(rename = "hex", alias = "hexagon")]
    Hexagon,
}

impl GridType {
    /// All grid types, in toolbar order.
    pub const ALL: [GridType; 5] = [
        GridType::Triangle,
        GridType::RightTriangle,
        GridType::Square,
        GridType::Diamond,
        GridType::Hexagon,
    ];

    /// Number of polygon vertices (and corner-mask entries) per cell.
    pub fn corner_count(self) -> usize {
        match self {
            GridType::Triangle | GridType::RightTriangle => 3,
            GridType::Square | GridType::Diamond => 4,
            GridType::Hexagon => 6,
        }
    }

    /// Short wire name (`sq`, `tri`, `rtri`, `dia`, `hex`).
    pub fn name(self) -> &'static str {
        match self {
            GridType::Square => "sq",
            GridType::Triangle => "tri",
            GridType::RightTriangle => "rtri",
            GridType::Diamond => "dia",
            GridType::Hexagon => "hex",
        }
    }

    /// Parse a wire name or long name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sq" | "square" => Some(GridType::Square),
            "tri" | "triangle" => Some(GridType::Triangle),
            "rtri" | "right-triangle" => Some(GridType::RightTriangle),
            "dia" | "diamond" => Some(GridType::Diamond),
            "hex" | "hexagon" => Some(GridType::Hexagon),
            _ => None,
        }
    }
}

impl fmt::Display for GridType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether an index is odd, for negative indices too.
pub(crate) fn is_odd(v: i32) -> bool {
    v.rem_euclid(2) == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_display_and_parse() {
        let key = CellKey::new(-3, 12);
        assert_eq!(key.to_string(), "-3,12");
        assert_eq!("-3,12".parse::<CellKey>().unwrap(), key);
        assert_eq!(" 4 , -1 ".parse::<CellKey>().unwrap(), CellKey::new(4, -1));
    }

    #[test]
    fn test_key_parse_rejects_garbage() {
        assert!("4".parse::<CellKey>().is_err());
        assert!("a,b".parse::<CellKey>().is_err());
        assert!("1.5,2".parse::<CellKey>().is_err());
    }

    #[test]
    fn test_key_ordering_is_row_major() {
        let mut keys = vec![
            CellKey::new(1, 0),
            CellKey::new(0, 5),
            CellKey::new(0, -2),
            CellKey::new(-1, 9),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                CellKey::new(-1, 9),
                CellKey::new(0, -2),
                CellKey::new(0, 5),
                CellKey::new(1, 0),
            ]
        );
    }

    #[test]
    fn test_key_serde_as_string() {
        let json = serde_json::to_string(&CellKey::new(2, -7)).unwrap();
        assert_eq!(json, "\"2,-7\"");
        let back: CellKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, CellKey::new(2, -7));
    }

    #[test]
    fn test_grid_type_names() {
        for grid in GridType::ALL {
            assert_eq!(GridType::from_name(grid.name()), Some(grid));
            let json = serde_json::to_string(&grid).unwrap();
            assert_eq!(json, format!("\"{}\"", grid.name()));
        }
        let long: GridType = serde_json::from_str("\"hexagon\"").unwrap();
        assert_eq!(long, GridType::Hexagon);
        assert_eq!(GridType::from_name("octagon"), None);
    }

    #[test]
    fn test_corner_counts() {
        assert_eq!(GridType::Triangle.corner_count(), 3);
        assert_eq!(GridType::RightTriangle.corner_count(), 3);
        assert_eq!(GridType::Square.corner_count(), 4);
        assert_eq!(GridType::Diamond.corner_count(), 4);
        assert_eq!(GridType::Hexagon.corner_count(), 6);
    }

    #[test]
    fn test_is_odd_negative() {
        assert!(is_odd(-1));
        assert!(!is_odd(-2));
        assert!(is_odd(3));
    }
}
