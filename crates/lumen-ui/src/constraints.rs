use lumen_engine::coords::{Rect, Vec2};
use lumen_engine::text::{FontId, FontSystem};

// ── Edges ─────────────────────────────────────────────────────────────────

/// Per-side insets, used for padding and margins.
#[derive(Debug, Clone, Copy, Default)]
pub struct Edges {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Edges {
    #[inline]
    pub fn all(v: f32) -> Self {
        Self { top: v, right: v, bottom: v, left: v }
    }

    #[inline]
    pub fn symmetric(vertical: f32, horizontal: f32) -> Self {
        Self { top: vertical, bottom: vertical, left: horizontal, right: horizontal }
    }

    /// `left + right`.
    #[inline]
    pub fn h(self) -> f32 {
        self.left + self.right
    }

    /// `top + bottom`.
    #[inline]
    pub fn v(self) -> f32 {
        self.top + self.bottom
    }
}

// ── Constraints ───────────────────────────────────────────────────────────

/// Size range a parent offers a child during measure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constraints {
    pub min: Vec2,
    pub max: Vec2,
}

impl Constraints {
    /// Anything from zero to `max`.
    #[inline]
    pub fn loose(max: Vec2) -> Self {
        Self { min: Vec2::zero(), max }
    }

    /// No upper bound on either axis.
    #[inline]
    pub fn unbounded() -> Self {
        Self::loose(Vec2::new(f32::INFINITY, f32::INFINITY))
    }

    /// `size` raised to `min`, then capped at `max`, per axis.
    #[inline]
    #[must_use]
    pub fn constrain(self, size: Vec2) -> Vec2 {
        Vec2::new(size.x.max(self.min.x).min(self.max.x), size.y.max(self.min.y).min(self.max.y))
    }

    /// What is left for content inside `edges`: a loose range whose max is
    /// reduced by the insets, never below zero.
    #[inline]
    #[must_use]
    pub fn shrink(self, edges: Edges) -> Self {
        Self::loose(Vec2::new((self.max.x - edges.h()).max(0.0), (self.max.y - edges.v()).max(0.0)))
    }
}

// ── LayoutCtx ────────────────────────────────────────────────────────────

/// Resources available to [`Widget::measure`](crate::widget::Widget::measure)
/// and [`Widget::layout`](crate::widget::Widget::layout).
#[derive(Copy, Clone)]
pub struct LayoutCtx<'a> {
    pub fonts: &'a FontSystem,
    /// Physical pixels per logical pixel. Text is measured at this scale so
    /// widths match what the text renderer draws.
    pub scale: f32,
}

impl LayoutCtx<'_> {
    #[inline]
    pub fn measure_text(&self, text: &str, font: FontId, size: f32, max_width: Option<f32>) -> Vec2 {
        self.fonts.measure_text_scaled(text, font, size, max_width, self.scale)
    }
}

/// `rect` with `edges` taken off each side; size never goes negative.
#[inline]
pub fn inset_rect(rect: Rect, edges: Edges) -> Rect {
    Rect::new(
        rect.origin.x + edges.left,
        rect.origin.y + edges.top,
        (rect.size.x - edges.h()).max(0.0),
        (rect.size.y - edges.v()).max(0.0),
    )
}
