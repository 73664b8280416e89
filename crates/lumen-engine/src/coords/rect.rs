use super::Vec2;

/// Axis-aligned rectangle in logical pixels (top-left origin).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub const fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    #[inline]
    pub fn max(self) -> Vec2 {
        self.origin + self.size
    }

    #[inline]
    pub fn center(self) -> Vec2 {
        self.origin + self.size * 0.5
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.origin.is_finite() && self.size.is_finite()
    }

    /// Returns the rectangle with non-negative width and height.
    #[inline]
    pub fn normalized(self) -> Self {
        let (x, w) = if self.size.x < 0.0 {
            (self.origin.x + self.size.x, -self.size.x)
        } else {
            (self.origin.x, self.size.x)
        };
        let (y, h) = if self.size.y < 0.0 {
            (self.origin.y + self.size.y, -self.size.y)
        } else {
            (self.origin.y, self.size.y)
        };
        Rect::new(x, y, w, h)
    }

    /// Moves the rectangle by `delta`.
    #[inline]
    pub fn translate(self, delta: Vec2) -> Self {
        Rect::from_origin_size(self.origin + delta, self.size)
    }

    /// Grows the rectangle by `dx`/`dy` on each side (negative values shrink it).
    ///
    /// Sizes never go below zero.
    #[inline]
    pub fn inflate(self, dx: f32, dy: f32) -> Self {
        Rect::new(
            self.origin.x - dx,
            self.origin.y - dy,
            (self.size.x + 2.0 * dx).max(0.0),
            (self.size.y + 2.0 * dy).max(0.0),
        )
    }

    /// Half-open containment: `[min, max)`.
    #[inline]
    pub fn contains(self, p: Vec2) -> bool {
        let r = self.normalized();
        let max = r.max();
        p.x >= r.origin.x && p.y >= r.origin.y && p.x < max.x && p.y < max.y
    }

    /// Overlap of two rectangles, `None` when they only touch or are disjoint.
    #[inline]
    pub fn intersect(self, other: Rect) -> Option<Rect> {
        let a = self.normalized();
        let b = other.normalized();

        let x0 = a.origin.x.max(b.origin.x);
        let y0 = a.origin.y.max(b.origin.y);
        let x1 = a.max().x.min(b.max().x);
        let y1 = a.max().y.min(b.max().y);

        (x1 > x0 && y1 > y0).then(|| Rect::new(x0, y0, x1 - x0, y1 - y0))
    }
}
