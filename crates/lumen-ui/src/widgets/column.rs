use lumen_engine::coords::{Rect, Vec2};

use crate::constraints::{inset_rect, Constraints, Edges, LayoutCtx};
use crate::event::{EventResult, UiEvent};
use crate::painter::Painter;
use crate::widget::{Element, Widget};

use super::align::Alignment;

/// Vertical stack. Children are placed top to bottom at natural size.
///
/// # Example
/// ```rust,ignore
/// Column::new()
///     .spacing(8.0)
///     .cross_align(Alignment::Center)
///     .child(GradientText::from_hex("Lumen", font, 40.0, &["#41d1ff", "#bd34fe"]))
///     .child(Text::new("scroll to animate", font, 14.0, grey))
/// ```
pub struct Column {
    children: Vec<Element>,
    spacing: f32,
    padding: Edges,
    cross_align: Alignment,
}

impl Column {
    pub fn new() -> Self {
        Self { children: Vec::new(), spacing: 0.0, padding: Edges::default(), cross_align: Alignment::Start }
    }

    pub fn spacing(mut self, v: f32) -> Self {
        self.spacing = v;
        self
    }

    pub fn padding(mut self, edges: Edges) -> Self {
        self.padding = edges;
        self
    }

    pub fn cross_align(mut self, align: Alignment) -> Self {
        self.cross_align = align;
        self
    }

    pub fn child(mut self, child: impl Into<Element>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Rect of every child inside `rect`, in order.
    fn child_rects(&self, rect: Rect, ctx: &LayoutCtx) -> Vec<Rect> {
        let inner = inset_rect(rect, self.padding);
        let c = Constraints::loose(Vec2::new(inner.size.x, f32::INFINITY));
        let mut y = inner.origin.y;
        self.children
            .iter()
            .map(|child| {
                let s = child.measure(c, ctx);
                let r = Rect::new(inner.origin.x + self.cross_align.offset(inner.size.x, s.x), y, s.x, s.y);
                y += s.y + self.spacing;
                r
            })
            .collect()
    }
}

impl Default for Column {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for Column {
    fn measure(&self, constraints: Constraints, ctx: &LayoutCtx) -> Vec2 {
        let inner_w = (constraints.max.x - self.padding.h()).max(0.0);
        let c = Constraints::loose(Vec2::new(inner_w, f32::INFINITY));

        let mut total_h = self.padding.v();
        let mut max_w: f32 = 0.0;
        for (i, child) in self.children.iter().enumerate() {
            let s = child.measure(c, ctx);
            total_h += s.y;
            if i + 1 < self.children.len() {
                total_h += self.spacing;
            }
            max_w = max_w.max(s.x);
        }
        constraints.constrain(Vec2::new(max_w + self.padding.h(), total_h))
    }

    fn layout(&mut self, rect: Rect, ctx: &LayoutCtx) {
        let rects = self.child_rects(rect, ctx);
        for (child, r) in self.children.iter_mut().zip(rects) {
            child.layout(r, ctx);
        }
    }

    fn paint(&self, painter: &mut Painter, rect: Rect) {
        let ctx = painter.layout_ctx();
        for (child, r) in self.children.iter().zip(self.child_rects(rect, &ctx)) {
            child.paint(painter, r);
        }
    }

    fn on_event(&mut self, event: &UiEvent, rect: Rect, ctx: &LayoutCtx) -> EventResult {
        let rects = self.child_rects(rect, ctx);
        for (child, r) in self.children.iter_mut().zip(rects) {
            if child.on_event(event, r, ctx).is_consumed() {
                return EventResult::Consumed;
            }
        }
        EventResult::Ignored
    }
}

#[cfg(test)]
mod tests {
    use lumen_engine::text::FontSystem;

    use super::*;

    struct Fixed(Vec2);

    impl Widget for Fixed {
        fn measure(&self, c: Constraints, _ctx: &LayoutCtx) -> Vec2 {
            c.constrain(self.0)
        }

        fn paint(&self, _painter: &mut Painter, _rect: Rect) {}
    }

    fn column() -> Column {
        Column::new()
            .spacing(4.0)
            .padding(Edges::all(2.0))
            .child(Fixed(Vec2::new(30.0, 10.0)))
            .child(Fixed(Vec2::new(50.0, 20.0)))
    }

    #[test]
    fn measure_sums_heights_and_spacing() {
        let fonts = FontSystem::new();
        let ctx = LayoutCtx { fonts: &fonts, scale: 1.0 };
        let size = column().measure(Constraints::loose(Vec2::new(500.0, 500.0)), &ctx);
        assert_eq!(size, Vec2::new(54.0, 38.0));
    }

    #[test]
    fn children_stack_with_cross_alignment() {
        let fonts = FontSystem::new();
        let ctx = LayoutCtx { fonts: &fonts, scale: 1.0 };
        let rects = column().cross_align(Alignment::Center).child_rects(Rect::new(0.0, 0.0, 54.0, 38.0), &ctx);
        assert_eq!(rects, [Rect::new(12.0, 2.0, 30.0, 10.0), Rect::new(2.0, 16.0, 50.0, 20.0)]);
    }
}
