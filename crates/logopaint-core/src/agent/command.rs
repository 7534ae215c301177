//! Typed agent commands, parsed best-effort from loosely structured JSON.

use crate::color::CellColor;
use crate::grid::{CellKey, GridType};
use crate::settings::Background;
use crate::symmetry::SymmetryMode;
use crate::transform::GradientDirection;
use serde_json::{Map, Value};
use thiserror::Error;

/// Fallback gradient start color.
const GRADIENT_FROM: CellColor = CellColor::rgb(0xff, 0x00, 0x00);
/// Fallback gradient end color.
const GRADIENT_TO: CellColor = CellColor::rgb(0x00, 0x00, 0xff);
/// Fallback color for `circle` and `ring`.
const SHAPE_COLOR: CellColor = CellColor::WHITE;

/// A single command that could not be applied.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error("command is not a JSON object")]
    NotAnObject,
    #[error("command has no \"type\"")]
    MissingType,
    #[error("unknown command type {0:?}")]
    UnknownType(String),
    #[error("{command}: missing or invalid field \"{field}\"")]
    InvalidField {
        command: &'static str,
        field: &'static str,
    },
}

/// Engine-wide settings changed by a `set` command. `None` leaves a value alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsChange {
    pub grid: Option<GridType>,
    pub cell_size: Option<f64>,
    pub background: Option<Background>,
    pub symmetry: Option<SymmetryMode>,
    pub stroke_width: Option<f64>,
    pub stroke_color: Option<CellColor>,
    pub corner_radius: Option<f64>,
}

/// One cell of a `place` command.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub key: CellKey,
    /// Defaults to the active style color.
    pub color: Option<CellColor>,
    /// Defaults to the active style radius.
    pub radius: Option<f64>,
}

/// A structured edit issued by the external agent.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentCommand {
    Set(SettingsChange),
    Clear,
    Place(Vec<Placement>),
    Delete(Vec<CellKey>),
    Rotate,
    FlipHorizontal,
    FlipVertical,
    Move {
        d_row: i32,
        d_col: i32,
    },
    Gradient {
        from: CellColor,
        to: CellColor,
        direction: GradientDirection,
    },
    Recolor {
        from: CellColor,
        to: CellColor,
    },
    Randomize,
    Circle {
        center: CellKey,
        radius: f64,
        color: CellColor,
    },
    Ring {
        center: CellKey,
        inner: f64,
        outer: f64,
        color: CellColor,
    },
}

impl AgentCommand {
    /// Wire name of the command type.
    pub fn name(&self) -> &'static str {
        match self {
            AgentCommand::Set(_) => "set",
            AgentCommand::Clear => "clear",
            AgentCommand::Place(_) => "place",
            AgentCommand::Delete(_) => "delete",
            AgentCommand::Rotate => "rotate",
            AgentCommand::FlipHorizontal => "flipH",
            AgentCommand::FlipVertical => "flipV",
            AgentCommand::Move { .. } => "move",
            AgentCommand::Gradient { .. } => "gradient",
            AgentCommand::Recolor { .. } => "recolor",
            AgentCommand::Randomize => "randomize",
            AgentCommand::Circle { .. } => "circle",
            AgentCommand::Ring { .. } => "ring",
        }
    }

    /// Parse one command object.
    ///
    /// Optional fields that are missing or of the wrong type fall back to
    /// their defaults. Required fields that are unusable reject the command.
    /// Entries of a `place` or `delete` list without integral `row`/`col`
    /// are dropped one by one.
    pub fn from_value(value: &Value) -> Result<Self, CommandError> {
        let obj = value.as_object().ok_or(CommandError::NotAnObject)?;
        let kind = obj
            .get("type")
            .and_then(Value::as_str)
            .ok_or(CommandError::MissingType)?;

        let command = match kind {
            "set" => AgentCommand::Set(SettingsChange {
                grid: str_field(obj, "grid").and_then(GridType::from_name),
                cell_size: num_field(obj, "cellSize"),
                background: str_field(obj, "bg").and_then(Background::from_name),
                symmetry: str_field(obj, "sym").and_then(SymmetryMode::from_name),
                stroke_width: num_field(obj, "strokeW"),
                stroke_color: color_field(obj, "strokeColor"),
                corner_radius: num_field(obj, "cornerRadius"),
            }),
            "clear" => AgentCommand::Clear,
            "place" => AgentCommand::Place(
                cell_list(obj, "place")?
                    .iter()
                    .filter_map(|cell| {
                        let cell = cell.as_object()?;
                        Some(Placement {
                            key: key_fields(cell)?,
                            color: color_field(cell, "color"),
                            radius: num_field(cell, "radius"),
                        })
                    })
                    .collect(),
            ),
            "delete" => AgentCommand::Delete(
                cell_list(obj, "delete")?
                    .iter()
                    .filter_map(|cell| key_fields(cell.as_object()?))
                    .collect(),
            ),
            "rotate" => AgentCommand::Rotate,
            "flipH" => AgentCommand::FlipHorizontal,
            "flipV" => AgentCommand::FlipVertical,
            "move" => AgentCommand::Move {
                d_row: required(int_field(obj, "dr"), "move", "dr")?,
                d_col: required(int_field(obj, "dc"), "move", "dc")?,
            },
            "gradient" => AgentCommand::Gradient {
                from: color_field(obj, "color1").unwrap_or(GRADIENT_FROM),
                to: color_field(obj, "color2").unwrap_or(GRADIENT_TO),
                direction: str_field(obj, "direction")
                    .and_then(GradientDirection::from_name)
                    .unwrap_or_default(),
            },
            "recolor" => AgentCommand::Recolor {
                from: required(color_field(obj, "from"), "recolor", "from")?,
                to: required(color_field(obj, "to"), "recolor", "to")?,
            },
            "randomize" => AgentCommand::Randomize,
            "circle" => AgentCommand::Circle {
                center: required(key_fields(obj), "circle", "row/col")?,
                radius: required(num_field(obj, "radius"), "circle", "radius")?,
                color: color_field(obj, "color").unwrap_or(SHAPE_COLOR),
            },
            "ring" => {
                let outer = required(num_field(obj, "outerRadius"), "ring", "outerRadius")?;
                AgentCommand::Ring {
                    center: required(key_fields(obj), "ring", "row/col")?,
                    inner: num_field(obj, "innerRadius").unwrap_or(outer * 0.5),
                    outer,
                    color: color_field(obj, "color").unwrap_or(SHAPE_COLOR),
                }
            }
            other => return Err(CommandError::UnknownType(other.to_string())),
        };
        Ok(command)
    }
}

fn required<T>(value: Option<T>, command: &'static str, field: &'static str) -> Result<T, CommandError> {
    value.ok_or(CommandError::InvalidField { command, field })
}

fn str_field<'a>(obj: &'a Map<String, Value>, field: &str) -> Option<&'a str> {
    obj.get(field).and_then(Value::as_str)
}

fn num_field(obj: &Map<String, Value>, field: &str) -> Option<f64> {
    obj.get(field).and_then(Value::as_f64).filter(|v| v.is_finite())
}

/// A number with no fractional part that fits in `i32`.
fn int_field(obj: &Map<String, Value>, field: &str) -> Option<i32> {
    let v = num_field(obj, field)?;
    let in_range = v.fract() == 0.0 && v >= f64::from(i32::MIN) && v <= f64::from(i32::MAX);
    in_range.then_some(v as i32)
}

fn color_field(obj: &Map<String, Value>, field: &str) -> Option<CellColor> {
    let raw = str_field(obj, field)?;
    match CellColor::parse(raw) {
        Ok(color) => Some(color),
        Err(err) => {
            log::debug!("ignoring field {field:?}: {err}");
            None
        }
    }
}

fn key_fields(obj: &Map<String, Value>) -> Option<CellKey> {
    Some(CellKey::new(int_field(obj, "row")?, int_field(obj, "col")?))
}

fn cell_list<'a>(obj: &'a Map<String, Value>, command: &'static str) -> Result<&'a Vec<Value>, CommandError> {
    required(obj.get("cells").and_then(Value::as_array), command, "cells")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> Result<AgentCommand, CommandError> {
        AgentCommand::from_value(&value)
    }

    #[test]
    fn test_parse_set() {
        let cmd = parse(json!({
            "type": "set", "grid": "hex", "cellSize": 25, "bg": "dark",
            "sym": "bogus", "strokeW": 1, "strokeColor": "#111", "cornerRadius": "3"
        }))
        .unwrap();
        let AgentCommand::Set(change) = cmd else {
            panic!("expected set");
        };
        assert_eq!(change.grid, Some(GridType::Hexagon));
        assert_eq!(change.cell_size, Some(25.0));
        assert_eq!(change.background, Some(Background::Dark));
        assert_eq!(change.symmetry, None);
        assert_eq!(change.stroke_color, Some(CellColor::rgb(0x11, 0x11, 0x11)));
        // Wrong type is ignored, not coerced.
        assert_eq!(change.corner_radius, None);
    }

    #[test]
    fn test_parse_place_skips_bad_cells() {
        let cmd = parse(json!({
            "type": "place",
            "cells": [
                {"row": 1, "col": 2, "color": "#ff0000", "radius": 3},
                {"row": "x", "col": 2},
                {"row": 1.5, "col": 0},
                {"row": -4, "col": 0, "color": "nope"},
                7
            ]
        }))
        .unwrap();
        let AgentCommand::Place(cells) = cmd else {
            panic!("expected place");
        };
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0].key, CellKey::new(1, 2));
        assert_eq!(cells[0].radius, Some(3.0));
        assert_eq!(cells[1].key, CellKey::new(-4, 0));
        assert_eq!(cells[1].color, None);
    }

    #[test]
    fn test_parse_required_fields() {
        assert_eq!(
            parse(json!({"type": "move", "dr": 1})),
            Err(CommandError::InvalidField { command: "move", field: "dc" })
        );
        assert!(parse(json!({"type": "recolor", "from": "#fff"})).is_err());
        assert!(parse(json!({"type": "circle", "row": 0, "col": 0})).is_err());
        assert!(parse(json!({"type": "place"})).is_err());
        assert_eq!(
            parse(json!({"type": "move", "dr": -2, "dc": 3})),
            Ok(AgentCommand::Move { d_row: -2, d_col: 3 })
        );
    }

    #[test]
    fn test_parse_defaults() {
        assert_eq!(
            parse(json!({"type": "gradient"})),
            Ok(AgentCommand::Gradient {
                from: GRADIENT_FROM,
                to: GRADIENT_TO,
                direction: GradientDirection::Horizontal,
            })
        );
        assert_eq!(
            parse(json!({"type": "ring", "row": 0, "col": 1, "outerRadius": 4})),
            Ok(AgentCommand::Ring {
                center: CellKey::new(0, 1),
                inner: 2.0,
                outer: 4.0,
                color: CellColor::WHITE,
            })
        );
    }

    #[test]
    fn test_parse_rejects_unknown_and_malformed() {
        assert_eq!(parse(json!([1, 2])), Err(CommandError::NotAnObject));
        assert_eq!(parse(json!({"row": 1})), Err(CommandError::MissingType));
        assert_eq!(
            parse(json!({"type": "explode"})),
            Err(CommandError::UnknownType("explode".into()))
        );
    }

    #[test]
    fn test_command_names() {
        for name in ["clear", "rotate", "flipH", "flipV", "randomize"] {
            assert_eq!(parse(json!({ "type": name })).unwrap().name(), name);
        }
    }
}
