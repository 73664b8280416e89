use winit::event::WindowEvent;
use winit::window::WindowId;

use super::ctx::{FrameCtx, WindowCtx};

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract driven by [`crate::window::Runtime`].
///
/// The runtime owns windows and input; the app owns everything it draws,
/// including GPU renderers bound to a window handle.
pub trait App {
    /// Called once after a window is created, before its first frame.
    fn on_window_created(&mut self, window: &WindowCtx<'_>) -> AppControl {
        let _ = window;
        AppControl::Continue
    }

    /// Called for every raw window event, after input translation.
    fn on_window_event(&mut self, window_id: WindowId, event: &WindowEvent) -> AppControl {
        let _ = (window_id, event);
        AppControl::Continue
    }

    /// Called when the window's drawable size or scale factor changes.
    fn on_resized(&mut self, window: &WindowCtx<'_>) {
        let _ = window;
    }

    /// Called once per redraw per window.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl;

    /// Called once when the event loop is shutting down.
    fn on_exit(&mut self) {}
}
