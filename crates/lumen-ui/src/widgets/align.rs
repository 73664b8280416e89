use lumen_engine::coords::{Rect, Vec2};

use crate::constraints::{inset_rect, Constraints, Edges, LayoutCtx};
use crate::event::{EventResult, UiEvent};
use crate::painter::Painter;
use crate::widget::{Element, Widget};

/// Position along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    Start,
    #[default]
    Center,
    End,
}

impl Alignment {
    /// Offset of a `child` extent inside `available`.
    #[inline]
    pub fn offset(self, available: f32, child: f32) -> f32 {
        let free = (available - child).max(0.0);
        match self {
            Alignment::Start => 0.0,
            Alignment::Center => free * 0.5,
            Alignment::End => free,
        }
    }
}

/// Fills the space it is given and places its child, at natural size, at
/// the chosen alignment inside the margin.
pub struct Align {
    child: Element,
    horizontal: Alignment,
    vertical: Alignment,
    margin: Edges,
}

impl Align {
    pub fn new(child: impl Into<Element>, horizontal: Alignment, vertical: Alignment) -> Self {
        Self { child: child.into(), horizontal, vertical, margin: Edges::default() }
    }

    pub fn center(child: impl Into<Element>) -> Self {
        Self::new(child, Alignment::Center, Alignment::Center)
    }

    pub fn margin(mut self, edges: Edges) -> Self {
        self.margin = edges;
        self
    }

    fn child_rect(&self, rect: Rect, ctx: &LayoutCtx) -> Rect {
        let inner = inset_rect(rect, self.margin);
        let size = self.child.measure(Constraints::loose(inner.size), ctx);
        Rect::new(
            inner.origin.x + self.horizontal.offset(inner.size.x, size.x),
            inner.origin.y + self.vertical.offset(inner.size.y, size.y),
            size.x,
            size.y,
        )
    }
}

impl Widget for Align {
    fn measure(&self, constraints: Constraints, ctx: &LayoutCtx) -> Vec2 {
        let child = self.child.measure(constraints.shrink(self.margin), ctx);
        let w = if constraints.max.x.is_finite() { constraints.max.x } else { child.x + self.margin.h() };
        let h = if constraints.max.y.is_finite() { constraints.max.y } else { child.y + self.margin.v() };
        constraints.constrain(Vec2::new(w, h))
    }

    fn layout(&mut self, rect: Rect, ctx: &LayoutCtx) {
        let child_rect = self.child_rect(rect, ctx);
        self.child.layout(child_rect, ctx);
    }

    fn paint(&self, painter: &mut Painter, rect: Rect) {
        let ctx = painter.layout_ctx();
        let child_rect = self.child_rect(rect, &ctx);
        self.child.paint(painter, child_rect);
    }

    fn on_event(&mut self, event: &UiEvent, rect: Rect, ctx: &LayoutCtx) -> EventResult {
        let child_rect = self.child_rect(rect, ctx);
        self.child.on_event(event, child_rect, ctx)
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

    #[test]
    fn offsets() {
        assert_eq!(Alignment::Start.offset(100.0, 40.0), 0.0);
        assert_eq!(Alignment::Center.offset(100.0, 40.0), 30.0);
        assert_eq!(Alignment::End.offset(100.0, 40.0), 60.0);
        // Oversized children start at the origin.
        assert_eq!(Alignment::End.offset(10.0, 40.0), 0.0);
    }

    #[test]
    fn centers_child_inside_margin() {
        let fonts = FontSystem::new();
        let ctx = LayoutCtx { fonts: &fonts, scale: 1.0 };
        let a = Align::new(Fixed(Vec2::new(40.0, 20.0)), Alignment::Center, Alignment::End)
            .margin(Edges::all(10.0));
        let r = a.child_rect(Rect::new(0.0, 0.0, 200.0, 100.0), &ctx);
        assert_eq!(r, Rect::new(80.0, 70.0, 40.0, 20.0));
    }

    #[test]
    fn fills_bounded_space_and_wraps_unbounded() {
        let fonts = FontSystem::new();
        let ctx = LayoutCtx { fonts: &fonts, scale: 1.0 };
        let a = Align::center(Fixed(Vec2::new(40.0, 20.0))).margin(Edges::all(5.0));
        assert_eq!(a.measure(Constraints::loose(Vec2::new(300.0, 200.0)), &ctx), Vec2::new(300.0, 200.0));
        assert_eq!(a.measure(Constraints::unbounded(), &ctx), Vec2::new(50.0, 30.0));
    }
}
