use crate::coords::Rect;
use crate::draw::{DrawCmd, DrawList, ZIndex};
use crate::paint::{Color, Paint};

/// Rectangle draw payload.
#[derive(Debug, Clone, PartialEq)]
pub struct RectCmd {
    pub rect: Rect,
    pub paint: Paint,
}

impl DrawList {
    /// Records a rectangle filled with `paint`.
    #[inline]
    pub fn push_rect(&mut self, z: ZIndex, rect: Rect, paint: Paint) {
        self.push(z, DrawCmd::Rect(RectCmd { rect, paint }));
    }

    #[inline]
    pub fn push_solid_rect(&mut self, z: ZIndex, rect: Rect, color: Color) {
        self.push_rect(z, rect, Paint::Solid(color));
    }
}
