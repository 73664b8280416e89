use lumen_engine::coords::{Rect, Vec2};
use lumen_engine::draw::{DrawList, Stroke, ZIndex};
use lumen_engine::paint::{Color, Paint};
use lumen_engine::text::{FontId, FontSystem};

use crate::constraints::LayoutCtx;
use crate::diagnostics::{DiagnosticsSink, PaintOutcome};

/// Drawing surface passed to [`Widget::paint`](crate::widget::Widget::paint).
///
/// Wraps the engine's `DrawList`; every call draws above the previous one.
pub struct Painter<'a> {
    pub(crate) draw_list: &'a mut DrawList,
    pub(crate) font_system: &'a FontSystem,
    diagnostics: &'a dyn DiagnosticsSink,
    /// Physical pixels per logical pixel for this frame.
    pub scale: f32,
    z: i32,
    /// Cursor position in logical pixels.
    pub mouse_pos: Vec2,
}

impl<'a> Painter<'a> {
    pub(crate) fn new(
        draw_list: &'a mut DrawList,
        font_system: &'a FontSystem,
        diagnostics: &'a dyn DiagnosticsSink,
        mouse_pos: Vec2,
        scale: f32,
    ) -> Self {
        Self { draw_list, font_system, diagnostics, scale, z: 0, mouse_pos }
    }

    #[inline]
    pub fn is_hovered(&self, rect: Rect) -> bool {
        rect.contains(self.mouse_pos)
    }

    // ── text measurement ──────────────────────────────────────────────────

    /// Measures `text` at the renderer's physical scale.
    pub fn measure_text(&self, text: &str, font: FontId, size: f32, max_width: Option<f32>) -> Vec2 {
        self.font_system.measure_text_scaled(text, font, size, max_width, self.scale)
    }

    #[inline]
    pub fn layout_ctx(&self) -> LayoutCtx<'a> {
        LayoutCtx { fonts: self.font_system, scale: self.scale }
    }

    // ── drawing ───────────────────────────────────────────────────────────

    pub fn fill_rect(&mut self, rect: Rect, paint: impl Into<Paint>) {
        let z = self.next_z();
        self.draw_list.push_rect(z, rect, paint.into());
    }

    /// Closed path filled with `paint`.
    pub fn fill_path(&mut self, points: Vec<Vec2>, paint: impl Into<Paint>) {
        let z = self.next_z();
        self.draw_list.push_fill_path(z, points, paint.into());
    }

    /// Closed path outlined with a stroke centered on it.
    pub fn stroke_path(&mut self, points: Vec<Vec2>, width: f32, color: Color) {
        let z = self.next_z();
        self.draw_list.push_stroke_path(z, points, Stroke::new(width, color));
    }

    /// Text at `origin` (top-left of the first line), wrapped at `max_width`.
    pub fn text(
        &mut self,
        text: impl Into<String>,
        font: FontId,
        size: f32,
        paint: impl Into<Paint>,
        origin: Vec2,
        max_width: Option<f32>,
    ) {
        let z = self.next_z();
        self.draw_list.push_text(z, text, font, size, paint.into(), origin, max_width);
    }

    // ── clipping ──────────────────────────────────────────────────────────

    /// Begin a scissor region. Must be paired with [`pop_clip`](Self::pop_clip).
    pub fn push_clip(&mut self, rect: Rect) {
        self.draw_list.push_clip(rect);
    }

    /// Begin a clip to the superellipse of exponent `n` inscribed in `rect`.
    pub fn push_clip_superellipse(&mut self, rect: Rect, n: f32) {
        self.draw_list.push_clip_superellipse(rect, n);
    }

    pub fn pop_clip(&mut self) {
        self.draw_list.pop_clip();
    }

    // ── diagnostics ───────────────────────────────────────────────────────

    /// Hands a paint outcome to the scene's diagnostics sink.
    pub fn report(&self, view: &str, outcome: &PaintOutcome) {
        self.diagnostics.report(view, outcome);
    }

    #[inline]
    fn next_z(&mut self) -> ZIndex {
        let z = ZIndex::new(self.z);
        self.z += 1;
        z
    }
}
