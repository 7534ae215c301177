//! LogoPaint Core Library
//!
//! Platform-agnostic mosaic canvas engine: cells on square, triangle,
//! right-triangle, diamond and hexagon tilings, painted through a camera with
//! symmetry, history, selection transforms and a JSON command interpreter.

pub mod agent;
pub mod camera;
pub mod canvas;
pub mod cell;
pub mod color;
pub mod document;
pub mod fill;
pub mod grid;
pub mod history;
pub mod input;
pub mod selection;
pub mod settings;
pub mod symmetry;
pub mod templates;
pub mod tools;
pub mod transform;
pub mod view;

pub use agent::{AgentCommand, AgentError, AgentReply, BatchReport, CommandError};
pub use camera::Camera;
pub use canvas::Canvas;
pub use cell::{CellMap, CellValue};
pub use color::{CellColor, ColorError};
pub use document::{Document, DocumentError};
pub use fill::FillError;
pub use grid::{CellKey, GridType, KeyError};
pub use history::History;
pub use input::{Modifiers, MouseButton, PointerEvent};
pub use selection::{Group, GroupId};
pub use settings::{Background, DrawStyle, Settings};
pub use symmetry::SymmetryMode;
pub use templates::Template;
pub use tools::{PaintMode, ToolKind, ToolManager, ToolState};
pub use transform::{GradientDirection, Transform};
pub use view::{RenderCell, VisibleRange};
