use lumen_engine::coords::{Rect, Vec2};
use lumen_engine::paint::{Color, LinearGradient, Paint};
use lumen_engine::text::FontId;

use crate::constraints::{Constraints, LayoutCtx};
use crate::diagnostics::PaintOutcome;
use crate::painter::Painter;
use crate::platform::Variant;
use crate::widget::Widget;

/// Text filled with a horizontal two-stop gradient spanning its measured
/// width. The gradient (not the layout box) is widened by
/// [`Variant::gradient_padding`].
///
/// Only the first two colors are used. With fewer than two, or when the
/// text has no measurable width, it is drawn in a flat color and the pass
/// reports degraded.
pub struct GradientText {
    text: String,
    font: FontId,
    size: f32,
    colors: Vec<Color>,
    variant: Variant,
}

impl GradientText {
    pub fn new(text: impl Into<String>, font: FontId, size: f32, colors: impl IntoIterator<Item = Color>) -> Self {
        Self { text: text.into(), font, size, colors: colors.into_iter().collect(), variant: Variant::default() }
    }

    /// Colors given as hex strings; unparsable entries are black.
    pub fn from_hex(text: impl Into<String>, font: FontId, size: f32, colors: &[&str]) -> Self {
        Self::new(text, font, size, colors.iter().map(|c| Color::from_hex_or_black(c)))
    }

    pub fn variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    /// Gradient span for text that measured `measured` wide.
    fn gradient_width(&self, measured: f32) -> f32 {
        if measured > 0.0 { measured + self.variant.gradient_padding() } else { 0.0 }
    }

    /// Fill for a run of `width` logical pixels starting at `x`.
    fn fill(&self, x: f32, width: f32) -> (Paint, PaintOutcome) {
        let flat = self.colors.first().copied().unwrap_or_else(Color::white);
        if self.colors.len() < 2 {
            let reason = format!("gradient needs two colors, got {}", self.colors.len());
            return (Paint::Solid(flat), PaintOutcome::Degraded(reason));
        }
        if !(width > 0.0) {
            return (Paint::Solid(flat), PaintOutcome::degraded(format!("'{}' measured no width", self.text)));
        }
        (LinearGradient::horizontal(x, width, &self.colors[..2]).into(), PaintOutcome::Ok)
    }
}

impl Widget for GradientText {
    fn measure(&self, constraints: Constraints, ctx: &LayoutCtx) -> Vec2 {
        let m = ctx.measure_text(&self.text, self.font, self.size, None);
        constraints.constrain(m)
    }

    fn paint(&self, painter: &mut Painter, rect: Rect) {
        let measured = painter.measure_text(&self.text, self.font, self.size, None).x;
        let (paint, outcome) = self.fill(rect.origin.x, self.gradient_width(measured));
        painter.text(&self.text, self.font, self.size, paint, rect.origin, None);
        painter.report(&format!("gradient-text/{}", self.variant), &outcome);
    }
}
