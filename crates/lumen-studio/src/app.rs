use lumen_engine::core::{App, AppControl, FrameCtx, WindowCtx};
use lumen_engine::coords::Vec2;
use lumen_engine::graphics::animation::KEYFRAMES;
use lumen_engine::graphics::renderers::{Overlay, RenderOutcome, SurfaceTarget};
use lumen_engine::graphics::GraphicsController;
use lumen_engine::input::{InputFrame, Key};
use lumen_ui::overlay::UiOverlay;
use lumen_ui::scene::UiInput;

/// Progress per logical pixel of wheel travel: ten notches per keyframe.
const PROGRESS_PER_PIXEL: f32 = 1.0 / 400.0;
/// Progress per arrow key press.
const KEY_STEP: f32 = 0.1;

/// Progress that shows the first keyframe.
pub const MIN_PROGRESS: f32 = -1.0;

/// Progress that shows the last keyframe.
pub fn max_progress() -> f32 {
    KEYFRAMES.len() as f32 - 2.0
}

/// Progress after one frame of input, clamped to the keyframe range.
///
/// Scrolling down (content moving up) advances the animation.
pub fn next_progress(progress: f32, input: &InputFrame) -> f32 {
    let mut p = progress - input.wheel_y * PROGRESS_PER_PIXEL;
    for key in &input.keys_pressed {
        match key {
            Key::ArrowDown | Key::ArrowRight => p += KEY_STEP,
            Key::ArrowUp | Key::ArrowLeft => p -= KEY_STEP,
            Key::PageDown | Key::Space => p += 1.0,
            Key::PageUp => p -= 1.0,
            Key::Home => p = MIN_PROGRESS,
            Key::End => p = max_progress(),
            _ => {}
        }
    }
    p.clamp(MIN_PROGRESS, max_progress())
}

/// Drives the logo scene in one window with the UI card drawn on top.
pub struct StudioApp {
    graphics: GraphicsController,
    overlay: UiOverlay,
    progress: f32,
    failed_frames: u64,
}

impl StudioApp {
    pub fn new(graphics: GraphicsController, overlay: UiOverlay, progress: f32) -> Self {
        Self { graphics, overlay, progress: progress.clamp(MIN_PROGRESS, max_progress()), failed_frames: 0 }
    }
}

impl App for StudioApp {
    fn on_window_created(&mut self, window: &WindowCtx<'_>) -> AppControl {
        let target = SurfaceTarget::new(window.handle(), window.canvas_metrics());
        match self.graphics.initialize(target) {
            Ok(size) => {
                log::info!("canvas {}x{}", size.width, size.height);
                self.graphics.start_animation(self.progress);
                AppControl::Continue
            }
            // Already logged by the controller.
            Err(_) => AppControl::Exit,
        }
    }

    fn on_resized(&mut self, window: &WindowCtx<'_>) {
        self.graphics.set_size(window.canvas_metrics());
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl {
        if ctx.input_frame.keys_pressed.contains(&Key::Escape) {
            return AppControl::Exit;
        }

        let progress = next_progress(self.progress, ctx.input_frame);
        if progress != self.progress {
            self.progress = progress;
            self.graphics.update_progress(progress);
        }

        let mouse_pos = ctx.input.pointer_pos.map_or(Vec2::zero(), |(x, y)| Vec2::new(x, y));
        self.overlay.set_input(UiInput { mouse_pos, ..UiInput::default() });

        let overlay: &mut dyn Overlay = &mut self.overlay;
        match self.graphics.frame(ctx.time.elapsed_ms, Some(overlay)) {
            Some(RenderOutcome::Failed) => {
                self.failed_frames += 1;
                if self.failed_frames == 1 {
                    log::error!("frame failed; further failures are counted silently");
                }
            }
            Some(_) | None => {}
        }
        AppControl::Continue
    }

    fn on_exit(&mut self) {
        if self.failed_frames > 0 {
            log::warn!("{} frames failed", self.failed_frames);
        }
        log::info!("{} frames dropped before the renderer was ready", self.graphics.dropped_frames());
        self.graphics.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(wheel_y: f32, keys: &[Key]) -> InputFrame {
        let mut f = InputFrame::default();
        f.wheel_y = wheel_y;
        f.keys_pressed.extend(keys.iter().copied());
        f
    }

    #[test]
    fn range_covers_the_keyframe_table() {
        assert_eq!(max_progress(), 5.0);
    }

    #[test]
    fn wheel_down_advances() {
        let p = next_progress(0.0, &frame(-400.0, &[]));
        assert!((p - 1.0).abs() < 1e-6);
        let p = next_progress(0.0, &frame(200.0, &[]));
        assert!((p + 0.5).abs() < 1e-6);
    }

    #[test]
    fn keys_step_and_jump() {
        assert!((next_progress(0.0, &frame(0.0, &[Key::ArrowDown])) - 0.1).abs() < 1e-6);
        assert!((next_progress(0.0, &frame(0.0, &[Key::ArrowUp])) + 0.1).abs() < 1e-6);
        assert_eq!(next_progress(2.0, &frame(0.0, &[Key::Home])), MIN_PROGRESS);
        assert_eq!(next_progress(2.0, &frame(0.0, &[Key::End])), max_progress());
    }

    #[test]
    fn clamps_to_range() {
        assert_eq!(next_progress(4.9, &frame(-10_000.0, &[])), max_progress());
        assert_eq!(next_progress(-0.9, &frame(10_000.0, &[])), MIN_PROGRESS);
    }

    #[test]
    fn idle_frame_keeps_progress() {
        assert_eq!(next_progress(1.25, &frame(0.0, &[])), 1.25);
    }
}
