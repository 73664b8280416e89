/// Viewport size in logical pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }
}

/// Extra logical pixels added below the client area when sizing the 3D canvas.
///
/// The animated background is drawn taller than the visible client area so it
/// still covers the region under a translucent bottom bar.
pub const CANVAS_BLEED: f32 = 60.0;

/// Client-area measurements used to size a drawing surface.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CanvasMetrics {
    /// Client width in logical pixels.
    pub client_width: f32,
    /// Client height in logical pixels.
    pub client_height: f32,
    /// Physical pixels per logical pixel.
    pub pixel_ratio: f32,
    /// Logical pixels appended to the height (see [`CANVAS_BLEED`]).
    pub bleed: f32,
}

impl CanvasMetrics {
    pub fn new(client_width: f32, client_height: f32, pixel_ratio: f32) -> Self {
        Self { client_width, client_height, pixel_ratio, bleed: CANVAS_BLEED }
    }

    /// Drawable size in physical pixels: `w × ratio`, `(h + bleed) × ratio`.
    pub fn drawable_size(&self) -> (u32, u32) {
        let ratio = if self.pixel_ratio.is_finite() && self.pixel_ratio > 0.0 {
            self.pixel_ratio
        } else {
            1.0
        };
        let w = (self.client_width.max(0.0) * ratio).round() as u32;
        let h = ((self.client_height.max(0.0) + self.bleed) * ratio).round() as u32;
        (w, h)
    }
}
