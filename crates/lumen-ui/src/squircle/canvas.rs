use lumen_engine::coords::Vec2;

use super::{clamp_exponent, SquirclePath};

/// Paint-pass geometry: the path is rebuilt only when the size or exponent
/// differ from the last build, or after [`invalidate`](Self::invalidate).
#[derive(Debug, Default)]
pub struct CanvasSquircle {
    key: Option<(f32, f32, f32)>,
    path: SquirclePath,
    rebuilds: u32,
}

impl CanvasSquircle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Geometry for a `size` box, rebuilt if stale.
    pub fn path(&mut self, size: Vec2, n: f32, border_width: f32) -> &SquirclePath {
        let key = (size.x, size.y, clamp_exponent(n));
        if self.key != Some(key) {
            self.path = SquirclePath::build(Vec2::zero(), size, size, n, border_width);
            self.key = Some(key);
            self.rebuilds += 1;
        }
        &self.path
    }

    /// Forces the next [`path`](Self::path) call to rebuild.
    pub fn invalidate(&mut self) {
        self.key = None;
    }

    pub fn rebuilds(&self) -> u32 {
        self.rebuilds
    }
}
