use std::cell::RefCell;

use lumen_engine::coords::{Rect, Vec2};
use lumen_engine::paint::{Color, Paint};

use crate::constraints::{inset_rect, Constraints, Edges, LayoutCtx};
use crate::diagnostics::PaintOutcome;
use crate::event::{EventResult, UiEvent};
use crate::painter::Painter;
use crate::platform::Variant;
use crate::widget::{Element, Widget};

use super::{clamp_exponent, offset, CanvasSquircle, LayerMask, SquirclePath};

/// Exponent of a bare [`SquircleProps`].
pub const BASE_CORNER_SMOOTHING: f32 = 4.0;
/// Exponent a [`SquircleView`] starts with on either variant.
pub const VARIANT_CORNER_SMOOTHING: f32 = 8.0;
pub const DEFAULT_BORDER_COLOR: &str = "#000000";

/// Declarative properties of a squircle.
#[derive(Debug, Clone, PartialEq)]
pub struct SquircleProps {
    /// Superellipse exponent.
    pub corner_smoothing: f32,
    pub border_width: f32,
    /// Hex color; anything unparsable draws black.
    pub border_color: String,
}

impl Default for SquircleProps {
    fn default() -> Self {
        Self {
            corner_smoothing: BASE_CORNER_SMOOTHING,
            border_width: 0.0,
            border_color: DEFAULT_BORDER_COLOR.to_string(),
        }
    }
}

impl SquircleProps {
    pub fn border_rgba(&self) -> Color {
        Color::from_hex_or_black(&self.border_color)
    }
}

enum Backing {
    /// Built lazily while painting, which only has `&self`.
    Canvas(RefCell<CanvasSquircle>),
    Layer(LayerMask),
}

/// Single-child container clipped to a superellipse, with an optional
/// border stroked on top of the child.
///
/// # Example
/// ```rust,ignore
/// SquircleView::new(Variant::Layer)
///     .corner_smoothing(6.0)
///     .border(2.0, "#41d1ff")
///     .background(Color::from_hex_or_black("#1a1a2e"))
///     .padding_all(24.0)
///     .child(Text::new("hi", font, 16.0, white))
/// ```
pub struct SquircleView {
    variant: Variant,
    props: SquircleProps,
    backing: Backing,
    background: Option<Paint>,
    padding: Edges,
    child: Option<Element>,
}

impl SquircleView {
    pub fn new(variant: Variant) -> Self {
        let backing = match variant {
            Variant::Canvas => Backing::Canvas(RefCell::new(CanvasSquircle::new())),
            Variant::Layer => Backing::Layer(LayerMask::new()),
        };
        Self {
            variant,
            props: SquircleProps { corner_smoothing: VARIANT_CORNER_SMOOTHING, ..SquircleProps::default() },
            backing,
            background: None,
            padding: Edges::default(),
            child: None,
        }
    }

    pub fn canvas() -> Self {
        Self::new(Variant::Canvas)
    }

    pub fn layer() -> Self {
        Self::new(Variant::Layer)
    }

    // ── builders ──────────────────────────────────────────────────────────

    pub fn corner_smoothing(mut self, n: f32) -> Self {
        self.set_corner_smoothing(n);
        self
    }

    pub fn border(mut self, width: f32, color: &str) -> Self {
        self.set_border_width(width);
        self.set_border_color(color);
        self
    }

    pub fn background(mut self, paint: impl Into<Paint>) -> Self {
        self.background = Some(paint.into());
        self
    }

    pub fn padding(mut self, edges: Edges) -> Self {
        self.padding = edges;
        self
    }

    pub fn padding_all(mut self, v: f32) -> Self {
        self.padding = Edges::all(v);
        self
    }

    pub fn child(mut self, child: impl Into<Element>) -> Self {
        self.child = Some(child.into());
        self
    }

    // ── properties ────────────────────────────────────────────────────────
    //
    // Setters return whether the value changed; unchanged values rebuild
    // nothing.

    pub fn set_corner_smoothing(&mut self, n: f32) -> bool {
        if self.props.corner_smoothing == n {
            return false;
        }
        self.props.corner_smoothing = n;
        self.geometry_changed();
        true
    }

    pub fn set_border_width(&mut self, width: f32) -> bool {
        if self.props.border_width == width {
            return false;
        }
        self.props.border_width = width;
        self.geometry_changed();
        true
    }

    pub fn set_border_color(&mut self, color: &str) -> bool {
        if self.props.border_color == color {
            return false;
        }
        self.props.border_color = color.to_string();
        self.geometry_changed();
        true
    }

    pub fn props(&self) -> &SquircleProps {
        &self.props
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Path builds so far: paint-pass rebuilds on the canvas variant, mask
    /// applications on the layer variant.
    pub fn geometry_builds(&self) -> u32 {
        match &self.backing {
            Backing::Canvas(c) => c.borrow().rebuilds(),
            Backing::Layer(m) => m.applications(),
        }
    }

    fn geometry_changed(&mut self) {
        let n = self.props.corner_smoothing;
        let border = self.props.border_width;
        match &mut self.backing {
            Backing::Canvas(c) => c.get_mut().invalidate(),
            Backing::Layer(m) => {
                if let Some(size) = m.applied_size() {
                    m.apply(size, n, border);
                }
            }
        }
    }

    fn view_name(&self) -> String {
        format!("squircle/{}", self.variant)
    }

    /// Clip frame and geometry in absolute coordinates for `rect`, or why
    /// there is none.
    fn resolve(&self, rect: Rect) -> Result<(Rect, SquirclePath), String> {
        let n = self.props.corner_smoothing;
        let bw = self.props.border_width;
        let (frame, path) = match &self.backing {
            Backing::Canvas(c) => (Rect::from_origin_size(Vec2::zero(), rect.size), c.borrow_mut().path(rect.size, n, bw).clone()),
            Backing::Layer(m) => {
                let path = m
                    .for_size(rect.size)
                    .ok_or_else(|| format!("mask not laid out for {}x{}", rect.size.x, rect.size.y))?;
                (m.frame(), path.clone())
            }
        };
        if path.outline.is_empty() {
            return Err(format!("empty bounds {}x{}", rect.size.x, rect.size.y));
        }
        Ok((
            frame.translate(rect.origin),
            SquirclePath { outline: offset(path.outline, rect.origin), border: offset(path.border, rect.origin) },
        ))
    }
}

impl Widget for SquircleView {
    fn measure(&self, constraints: Constraints, ctx: &LayoutCtx) -> Vec2 {
        let inner = constraints.shrink(self.padding);
        let child = self.child.as_ref().map_or(Vec2::zero(), |c| c.measure(inner, ctx));
        constraints.constrain(Vec2::new(child.x + self.padding.h(), child.y + self.padding.v()))
    }

    fn layout(&mut self, rect: Rect, ctx: &LayoutCtx) {
        if let Backing::Layer(mask) = &mut self.backing {
            mask.apply(rect.size, self.props.corner_smoothing, self.props.border_width);
        }
        if let Some(child) = &mut self.child {
            child.layout(inset_rect(rect, self.padding), ctx);
        }
    }

    fn paint(&self, painter: &mut Painter, rect: Rect) {
        let mut outcome = PaintOutcome::Ok;
        if !self.props.corner_smoothing.is_finite() {
            outcome = PaintOutcome::degraded(format!("corner smoothing {} is not finite", self.props.corner_smoothing));
        }

        let geometry = match self.resolve(rect) {
            Ok(g) => Some(g),
            Err(reason) => {
                outcome = outcome.and(PaintOutcome::Degraded(reason));
                None
            }
        };

        let n = clamp_exponent(self.props.corner_smoothing);
        match geometry {
            Some((frame, path)) => {
                if let Some(bg) = &self.background {
                    painter.fill_path(path.outline, bg.clone());
                }
                painter.push_clip_superellipse(frame, n);
                if let Some(child) = &self.child {
                    child.paint(painter, inset_rect(rect, self.padding));
                }
                painter.pop_clip();

                let bw = self.props.border_width;
                if bw > 0.0 {
                    if path.border.is_empty() {
                        outcome = outcome.and(PaintOutcome::degraded(format!("border {bw} wider than the view")));
                    } else {
                        painter.stroke_path(path.border, bw, self.props.border_rgba());
                    }
                }
            }
            // Unclipped rather than invisible.
            None => {
                if let Some(child) = &self.child {
                    child.paint(painter, inset_rect(rect, self.padding));
                }
            }
        }

        painter.report(&self.view_name(), &outcome);
    }

    fn on_event(&mut self, event: &UiEvent, rect: Rect, ctx: &LayoutCtx) -> EventResult {
        match &mut self.child {
            Some(child) => child.on_event(event, inset_rect(rect, self.padding), ctx),
            None => EventResult::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use lumen_engine::draw::shapes::PathStyle;
    use lumen_engine::draw::{DrawCmd, DrawItem, DrawList};

    use super::*;
    use crate::diagnostics::RecordingSink;
    use crate::scene::{UiInput, UiScene};

    struct Fill;

    impl Widget for Fill {
        fn measure(&self, c: Constraints, _ctx: &LayoutCtx) -> Vec2 {
            c.constrain(Vec2::new(50.0, 20.0))
        }

        fn paint(&self, painter: &mut Painter, rect: Rect) {
            painter.fill_rect(rect, Color::white());
        }
    }

    fn frame(ui: &mut UiScene, root: &mut Element, size: Vec2) -> Vec<DrawItem> {
        let list = ui.frame(root, size, 1.0, &UiInput::default());
        list.iter_in_paint_order().cloned().collect()
    }

    fn recording() -> (Rc<RecordingSink>, UiScene) {
        let sink = Rc::new(RecordingSink::new());
        let ui = UiScene::with_diagnostics(Box::new(Rc::clone(&sink)));
        (sink, ui)
    }

    // ── properties ────────────────────────────────────────────────────────

    #[test]
    fn defaults() {
        assert_eq!(SquircleProps::default().corner_smoothing, 4.0);
        for variant in [Variant::Canvas, Variant::Layer] {
            let v = SquircleView::new(variant);
            assert_eq!(v.props().corner_smoothing, 8.0);
            assert_eq!(v.props().border_width, 0.0);
            assert_eq!(v.props().border_color, "#000000");
        }
    }

    #[test]
    fn unparsable_border_color_is_black() {
        let v = SquircleView::canvas().border(2.0, "not-a-color");
        assert_eq!(v.props().border_rgba(), Color::black());
        let v = SquircleView::canvas().border(2.0, "#ffffff");
        assert_eq!(v.props().border_rgba(), Color::white());
    }

    #[test]
    fn setters_report_change() {
        let mut v = SquircleView::canvas();
        assert!(!v.set_corner_smoothing(8.0));
        assert!(v.set_corner_smoothing(5.0));
        assert!(!v.set_border_width(0.0));
        assert!(v.set_border_width(1.0));
        assert!(!v.set_border_color("#000000"));
        assert!(v.set_border_color("#ff0000"));
    }

    // ── paint ─────────────────────────────────────────────────────────────

    #[test]
    fn child_is_clipped_and_border_drawn_on_top() {
        for variant in [Variant::Canvas, Variant::Layer] {
            let (sink, mut ui) = recording();
            let mut root = Element::new(
                SquircleView::new(variant).border(2.0, "#ff0000").background(Color::black()).child(Fill),
            );
            let ordered = frame(&mut ui, &mut root, Vec2::new(200.0, 100.0));
            assert_eq!(ordered.len(), 3, "{variant}");

            assert!(matches!(&ordered[0].cmd, DrawCmd::Path(p) if matches!(p.style, PathStyle::Fill(_))));
            assert!(ordered[0].clip.is_none());

            assert!(matches!(ordered[1].cmd, DrawCmd::Rect(_)));
            let curve = ordered[1].clip.and_then(|c| c.curve).expect("child clipped to the curve");
            assert_eq!(curve.exponent, 8.0);

            match &ordered[2].cmd {
                DrawCmd::Path(p) => match &p.style {
                    PathStyle::Stroke(s) => {
                        assert_eq!(s.width, 2.0);
                        assert_eq!(s.color, Color::from_hex_or_black("#ff0000"));
                    }
                    other => panic!("expected stroke, got {other:?}"),
                },
                other => panic!("expected border path, got {other:?}"),
            }
            assert!(ordered[2].clip.is_none());
            assert!(sink.degraded().is_empty(), "{variant}: {:?}", sink.degraded());
        }
    }

    #[test]
    fn layer_clip_covers_the_outset_mask() {
        let (_, mut ui) = recording();
        let mut root = Element::new(SquircleView::layer().child(Fill));
        let list = frame(&mut ui, &mut root, Vec2::new(100.0, 40.0));
        let curve = list[0].clip.and_then(|c| c.curve).unwrap();
        assert_eq!(curve.bounds, Rect::new(-1.5, -1.5, 103.0, 43.0));
    }

    #[test]
    fn canvas_clip_matches_the_view() {
        let (_, mut ui) = recording();
        let mut root = Element::new(SquircleView::canvas().child(Fill));
        let list = frame(&mut ui, &mut root, Vec2::new(100.0, 40.0));
        let curve = list[0].clip.and_then(|c| c.curve).unwrap();
        assert_eq!(curve.bounds, Rect::new(0.0, 0.0, 100.0, 40.0));
    }

    #[test]
    fn no_border_without_width() {
        let (_, mut ui) = recording();
        let mut root = Element::new(SquircleView::canvas().child(Fill));
        let list = frame(&mut ui, &mut root, Vec2::new(100.0, 40.0));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn empty_bounds_degrade_without_panicking() {
        let (sink, mut ui) = recording();
        let mut root = Element::new(SquircleView::canvas().child(Fill));
        let list = frame(&mut ui, &mut root, Vec2::new(0.0, 40.0));
        assert!(list.iter().all(|i| i.clip.is_none()));
        let reasons = sink.degraded();
        assert_eq!(reasons.len(), 1);
        assert!(reasons[0].contains("empty bounds"), "{reasons:?}");
    }

    #[test]
    fn oversized_border_degrades() {
        let (sink, mut ui) = recording();
        let mut root = Element::new(SquircleView::canvas().border(50.0, "#fff"));
        let _ = frame(&mut ui, &mut root, Vec2::new(40.0, 40.0));
        assert!(sink.degraded()[0].contains("wider"));
    }

    #[test]
    fn layer_paint_without_layout_degrades() {
        let sink = RecordingSink::new();
        let view = SquircleView::layer().child(Fill);
        let fonts = lumen_engine::text::FontSystem::new();
        let mut list = DrawList::new();
        let mut painter = Painter::new(&mut list, &fonts, &sink, Vec2::zero(), 1.0);
        view.paint(&mut painter, Rect::new(0.0, 0.0, 10.0, 10.0));
        assert!(sink.degraded()[0].contains("mask not laid out"));
        assert_eq!(list.clip_depth(), 0);
    }

    // ── memoization ───────────────────────────────────────────────────────

    #[test]
    fn canvas_rebuilds_only_on_change() {
        let mut v = SquircleView::canvas();
        let fonts = lumen_engine::text::FontSystem::new();
        let sink = RecordingSink::new();
        let mut list = DrawList::new();
        let rect = Rect::new(0.0, 0.0, 80.0, 80.0);
        let mut paint = |v: &SquircleView| {
            let mut painter = Painter::new(&mut list, &fonts, &sink, Vec2::zero(), 1.0);
            v.paint(&mut painter, rect);
        };
        paint(&v);
        paint(&v);
        assert_eq!(v.geometry_builds(), 1);
        assert!(!v.set_corner_smoothing(8.0));
        paint(&v);
        assert_eq!(v.geometry_builds(), 1);
        assert!(v.set_border_width(3.0));
        paint(&v);
        assert_eq!(v.geometry_builds(), 2);
    }

    #[test]
    fn layer_reapplies_on_every_layout_and_on_change() {
        let fonts = lumen_engine::text::FontSystem::new();
        let ctx = LayoutCtx { fonts: &fonts, scale: 1.0 };
        let rect = Rect::new(0.0, 0.0, 50.0, 50.0);
        let mut v = SquircleView::layer();
        assert!(v.set_corner_smoothing(6.0));
        assert_eq!(v.geometry_builds(), 0);

        v.layout(rect, &ctx);
        v.layout(rect, &ctx);
        assert_eq!(v.geometry_builds(), 2);

        assert!(v.set_border_color("#00ff00"));
        assert_eq!(v.geometry_builds(), 3);
        assert!(!v.set_border_color("#00ff00"));
        assert_eq!(v.geometry_builds(), 3);
    }
}
