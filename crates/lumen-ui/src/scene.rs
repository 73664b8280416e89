use std::path::Path;

use lumen_engine::coords::{Rect, Vec2};
use lumen_engine::draw::DrawList;
use lumen_engine::text::{FontId, FontLoadError, FontSystem};

use crate::constraints::{Constraints, LayoutCtx};
use crate::diagnostics::{DiagnosticsSink, LogSink};
use crate::event::UiEvent;
use crate::painter::Painter;
use crate::widget::Element;

// ── UiInput ───────────────────────────────────────────────────────────────

/// Input snapshot for one UI frame.
#[derive(Debug, Clone, Default)]
pub struct UiInput {
    /// Cursor position in logical pixels.
    pub mouse_pos: Vec2,
    /// `true` for exactly one frame when the primary button is released.
    pub mouse_clicked: bool,
    /// Wheel delta in lines accumulated this frame.
    pub scroll_delta: f32,
}

// ── UiScene ───────────────────────────────────────────────────────────────

/// Fonts, the per-frame draw list and the diagnostics sink shared by every
/// widget tree painted through it.
///
/// Fields are public so callers can split-borrow `draw_list` and
/// `font_system` when handing both to the engine's text renderer.
pub struct UiScene {
    pub font_system: FontSystem,
    /// Populated by the most recent [`frame`](Self::frame).
    pub draw_list: DrawList,
    diagnostics: Box<dyn DiagnosticsSink>,
}

impl UiScene {
    pub fn new() -> Self {
        Self::with_diagnostics(Box::new(LogSink::default()))
    }

    pub fn with_diagnostics(diagnostics: Box<dyn DiagnosticsSink>) -> Self {
        Self { font_system: FontSystem::new(), draw_list: DrawList::new(), diagnostics }
    }

    pub fn set_diagnostics(&mut self, diagnostics: Box<dyn DiagnosticsSink>) {
        self.diagnostics = diagnostics;
    }

    pub fn load_font(&mut self, data: &[u8]) -> Result<FontId, FontLoadError> {
        self.font_system.load_font(data)
    }

    pub fn load_font_file(&mut self, path: &Path) -> Result<FontId, FontLoadError> {
        self.font_system.load_font_file(path)
    }

    /// Measures, lays out, paints and routes input through `root` for one
    /// frame. The root always occupies the whole viewport.
    ///
    /// The returned list is valid until the next call.
    pub fn frame(&mut self, root: &mut Element, viewport: Vec2, scale: f32, input: &UiInput) -> &mut DrawList {
        self.draw_list.clear();
        let rect = Rect::new(0.0, 0.0, viewport.x, viewport.y);
        let ctx = LayoutCtx { fonts: &self.font_system, scale };

        // ── measure + layout ──────────────────────────────────────────────
        let _ = root.measure(Constraints::loose(viewport), &ctx);
        root.layout(rect, &ctx);

        // ── paint ─────────────────────────────────────────────────────────
        {
            let mut painter =
                Painter::new(&mut self.draw_list, &self.font_system, self.diagnostics.as_ref(), input.mouse_pos, scale);
            root.paint(&mut painter, rect);
        }
        debug_assert_eq!(self.draw_list.clip_depth(), 0, "unbalanced clip in widget paint");

        // ── events ────────────────────────────────────────────────────────
        root.on_event(&UiEvent::Hover { pos: input.mouse_pos }, rect, &ctx);
        if input.mouse_clicked {
            root.on_event(&UiEvent::Click { pos: input.mouse_pos }, rect, &ctx);
        }
        if input.scroll_delta != 0.0 {
            root.on_event(&UiEvent::ScrollWheel { delta: input.scroll_delta }, rect, &ctx);
        }

        &mut self.draw_list
    }
}

impl Default for UiScene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use lumen_engine::paint::Color;

    use super::*;
    use crate::diagnostics::{PaintOutcome, RecordingSink};
    use crate::event::EventResult;
    use crate::widget::Widget;

    #[derive(Default)]
    struct Trace {
        calls: Vec<&'static str>,
        layout_rect: Option<Rect>,
        events: Vec<UiEvent>,
    }

    struct Probe(Rc<RefCell<Trace>>);

    impl Widget for Probe {
        fn measure(&self, c: Constraints, _ctx: &LayoutCtx) -> Vec2 {
            self.0.borrow_mut().calls.push("measure");
            c.max
        }

        fn layout(&mut self, rect: Rect, _ctx: &LayoutCtx) {
            let mut t = self.0.borrow_mut();
            t.calls.push("layout");
            t.layout_rect = Some(rect);
        }

        fn paint(&self, painter: &mut Painter, rect: Rect) {
            self.0.borrow_mut().calls.push("paint");
            painter.fill_rect(rect, Color::white());
            painter.report("probe", &PaintOutcome::Ok);
        }

        fn on_event(&mut self, event: &UiEvent, _rect: Rect, _ctx: &LayoutCtx) -> EventResult {
            self.0.borrow_mut().events.push(event.clone());
            EventResult::Ignored
        }
    }

    #[test]
    fn frame_runs_passes_in_order() {
        let trace = Rc::new(RefCell::new(Trace::default()));
        let mut root = Element::new(Probe(Rc::clone(&trace)));
        let mut ui = UiScene::new();
        let list = ui.frame(&mut root, Vec2::new(320.0, 200.0), 2.0, &UiInput::default());
        assert_eq!(list.items().len(), 1);

        let t = trace.borrow();
        assert_eq!(t.calls, ["measure", "layout", "paint"]);
        assert_eq!(t.layout_rect, Some(Rect::new(0.0, 0.0, 320.0, 200.0)));
        assert_eq!(t.events, [UiEvent::Hover { pos: Vec2::zero() }]);
    }

    #[test]
    fn click_and_scroll_are_routed() {
        let trace = Rc::new(RefCell::new(Trace::default()));
        let mut root = Element::new(Probe(Rc::clone(&trace)));
        let mut ui = UiScene::new();
        let input = UiInput { mouse_pos: Vec2::new(5.0, 6.0), mouse_clicked: true, scroll_delta: -1.0 };
        let _ = ui.frame(&mut root, Vec2::new(10.0, 10.0), 1.0, &input);
        assert_eq!(
            trace.borrow().events,
            [
                UiEvent::Hover { pos: Vec2::new(5.0, 6.0) },
                UiEvent::Click { pos: Vec2::new(5.0, 6.0) },
                UiEvent::ScrollWheel { delta: -1.0 },
            ]
        );
    }

    #[test]
    fn list_is_rebuilt_each_frame() {
        let trace = Rc::new(RefCell::new(Trace::default()));
        let mut root = Element::new(Probe(trace));
        let mut ui = UiScene::new();
        let _ = ui.frame(&mut root, Vec2::new(10.0, 10.0), 1.0, &UiInput::default());
        let list = ui.frame(&mut root, Vec2::new(10.0, 10.0), 1.0, &UiInput::default());
        assert_eq!(list.items().len(), 1);
    }

    #[test]
    fn reports_reach_the_installed_sink() {
        let sink = Rc::new(RecordingSink::new());
        let mut ui = UiScene::with_diagnostics(Box::new(Rc::clone(&sink)));
        let mut root = Element::new(Probe(Rc::default()));
        let _ = ui.frame(&mut root, Vec2::new(10.0, 10.0), 1.0, &UiInput::default());
        assert_eq!(sink.reports(), [("probe".to_string(), PaintOutcome::Ok)]);
    }
}
