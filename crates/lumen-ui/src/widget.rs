use lumen_engine::coords::{Rect, Vec2};

use crate::constraints::{Constraints, LayoutCtx};
use crate::event::{EventResult, UiEvent};
use crate::painter::Painter;

// ── Widget trait ──────────────────────────────────────────────────────────

/// The trait every UI component implements.
///
/// A frame runs `measure`, then `layout`, then `paint`, then `on_event`, each
/// top-down from the root.
pub trait Widget: 'static {
    /// Size this widget wants within `constraints`.
    ///
    /// Must be deterministic: parents may call it more than once per frame.
    fn measure(&self, constraints: Constraints, ctx: &LayoutCtx) -> Vec2;

    /// Called with the rect the parent assigned before painting. Widgets that
    /// derive geometry from their size rebuild it here.
    fn layout(&mut self, _rect: Rect, _ctx: &LayoutCtx) {}

    /// Draws inside `rect`. Children are painted by calling their own `paint`.
    fn paint(&self, painter: &mut Painter, rect: Rect);

    /// Routes an input event. Return [`EventResult::Consumed`] to stop.
    fn on_event(&mut self, _event: &UiEvent, _rect: Rect, _ctx: &LayoutCtx) -> EventResult {
        EventResult::Ignored
    }
}

// ── Element ───────────────────────────────────────────────────────────────

/// A type-erased widget, the child type of every container.
pub struct Element(Box<dyn Widget>);

impl Element {
    pub fn new<W: Widget>(w: W) -> Self {
        Self(Box::new(w))
    }

    #[inline]
    pub fn measure(&self, constraints: Constraints, ctx: &LayoutCtx) -> Vec2 {
        self.0.measure(constraints, ctx)
    }

    #[inline]
    pub fn layout(&mut self, rect: Rect, ctx: &LayoutCtx) {
        self.0.layout(rect, ctx)
    }

    #[inline]
    pub fn paint(&self, painter: &mut Painter, rect: Rect) {
        self.0.paint(painter, rect)
    }

    #[inline]
    pub fn on_event(&mut self, event: &UiEvent, rect: Rect, ctx: &LayoutCtx) -> EventResult {
        self.0.on_event(event, rect, ctx)
    }
}

impl<W: Widget> From<W> for Element {
    fn from(w: W) -> Self {
        Self::new(w)
    }
}
