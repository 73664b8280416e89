use lumen_engine::coords::{Rect, Vec2};

use super::SquirclePath;

/// How far the mask extends past the view on each axis.
pub const MASK_OUTSET: f32 = 3.0;

/// Layout-pass geometry: a mask slightly larger than the view (half the
/// outset on every side) so the curve's edge pixels are not cut by the view
/// bounds. Re-applied on every layout.
#[derive(Debug, Default)]
pub struct LayerMask {
    size: Option<Vec2>,
    frame: Rect,
    path: SquirclePath,
    applications: u32,
}

impl LayerMask {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the mask for a view of `size`.
    pub fn apply(&mut self, size: Vec2, n: f32, border_width: f32) {
        let half = MASK_OUTSET * 0.5;
        let origin = Vec2::new(-half, -half);
        let outset = Vec2::new(size.x + MASK_OUTSET, size.y + MASK_OUTSET);
        self.frame = Rect::from_origin_size(origin, outset);
        self.path = if size.x > 0.0 && size.y > 0.0 {
            SquirclePath::build(origin, outset, size, n, border_width)
        } else {
            SquirclePath::default()
        };
        self.size = Some(size);
        self.applications += 1;
    }

    /// Mask frame relative to the view origin.
    pub fn frame(&self) -> Rect {
        self.frame
    }

    /// The mask last applied, if it was applied for `size`.
    pub fn for_size(&self, size: Vec2) -> Option<&SquirclePath> {
        (self.size == Some(size)).then_some(&self.path)
    }

    /// Size of the view the mask was last applied for.
    pub fn applied_size(&self) -> Option<Vec2> {
        self.size
    }

    pub fn applications(&self) -> u32 {
        self.applications
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_is_outset_around_the_view() {
        let mut m = LayerMask::new();
        m.apply(Vec2::new(100.0, 50.0), 8.0, 0.0);
        assert_eq!(m.frame(), Rect::new(-1.5, -1.5, 103.0, 53.0));

        let path = m.for_size(Vec2::new(100.0, 50.0)).unwrap();
        // θ = 0 sits on the right edge of the outset frame.
        assert!((path.outline[0].x - 101.5).abs() < 1e-4);
        assert!((path.outline[0].y - 25.0).abs() < 1e-4);
    }

    #[test]
    fn border_follows_the_view_not_the_mask() {
        let mut m = LayerMask::new();
        m.apply(Vec2::new(100.0, 50.0), 8.0, 2.0);
        let path = m.for_size(Vec2::new(100.0, 50.0)).unwrap();
        assert!((path.border[0].x - 99.0).abs() < 1e-4);
    }

    #[test]
    fn stale_mask_is_not_handed_out() {
        let mut m = LayerMask::new();
        assert!(m.for_size(Vec2::new(1.0, 1.0)).is_none());
        m.apply(Vec2::new(10.0, 10.0), 4.0, 0.0);
        assert!(m.for_size(Vec2::new(10.0, 11.0)).is_none());
    }

    #[test]
    fn every_apply_rebuilds() {
        let mut m = LayerMask::new();
        m.apply(Vec2::new(10.0, 10.0), 4.0, 0.0);
        m.apply(Vec2::new(10.0, 10.0), 4.0, 0.0);
        assert_eq!(m.applications(), 2);
    }

    #[test]
    fn empty_view_has_empty_mask() {
        let mut m = LayerMask::new();
        m.apply(Vec2::zero(), 4.0, 1.0);
        let path = m.for_size(Vec2::zero()).unwrap();
        assert!(path.outline.is_empty() && path.border.is_empty());
    }
}
