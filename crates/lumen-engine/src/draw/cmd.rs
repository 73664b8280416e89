use super::shapes::path::PathCmd;
use super::shapes::rect::RectCmd;
use super::shapes::text::TextCmd;

/// Renderer-agnostic draw command.
///
/// Each variant has a push helper under `draw::shapes::*` and a matching
/// renderer under `render::shapes::*`.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Rect(RectCmd),
    Path(PathCmd),
    Text(TextCmd),
}
