use lumen_engine::coords::Vec2;
use lumen_engine::graphics::renderers::Overlay;
use lumen_engine::render::shapes::{PathRenderer, RectRenderer, TextRenderer};
use lumen_engine::render::{RenderCtx, RenderTarget};

use crate::scene::{UiInput, UiScene};
use crate::widget::Element;

/// A widget tree drawn over the 3D scene.
///
/// Each frame the tree is laid out at the logical viewport, painted into the
/// scene's draw list, and the list is rendered rects first, then paths, then
/// text.
pub struct UiOverlay {
    pub ui: UiScene,
    root: Element,
    input: UiInput,
    rects: RectRenderer,
    paths: PathRenderer,
    text: TextRenderer,
}

impl UiOverlay {
    pub fn new(ui: UiScene, root: impl Into<Element>) -> Self {
        Self {
            ui,
            root: root.into(),
            input: UiInput::default(),
            rects: RectRenderer::new(),
            paths: PathRenderer::new(),
            text: TextRenderer::new(),
        }
    }

    pub fn set_root(&mut self, root: impl Into<Element>) {
        self.root = root.into();
    }

    /// Input for the next frame. Cleared once the frame is drawn.
    pub fn set_input(&mut self, input: UiInput) {
        self.input = input;
    }
}

impl Overlay for UiOverlay {
    fn draw(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>) {
        if !ctx.viewport.is_valid() {
            return;
        }
        let viewport = Vec2::new(ctx.viewport.width, ctx.viewport.height);
        let _ = self.ui.frame(&mut self.root, viewport, ctx.scale_factor, &self.input);
        self.input = UiInput { mouse_pos: self.input.mouse_pos, ..UiInput::default() };

        let UiScene { draw_list, font_system, .. } = &mut self.ui;
        self.rects.render(ctx, target, draw_list);
        self.paths.render(ctx, target, draw_list);
        self.text.render(ctx, target, draw_list, font_system);
    }
}
