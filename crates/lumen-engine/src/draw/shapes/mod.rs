pub(crate) mod path;
pub(crate) mod rect;
pub(crate) mod text;

pub use path::{PathCmd, PathStyle};
pub use rect::RectCmd;
pub use text::TextCmd;

use crate::paint::Color;

/// Outline drawn centered on a path.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Stroke {
    pub width: f32,
    pub color: Color,
}

impl Stroke {
    #[inline]
    pub fn new(width: f32, color: Color) -> Self {
        Self { width, color }
    }
}
