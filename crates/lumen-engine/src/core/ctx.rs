use std::sync::Arc;

use winit::window::{Window, WindowId};

use crate::coords::{CanvasMetrics, Viewport};
use crate::input::{InputFrame, InputState};
use crate::time::FrameTime;
use crate::window::RuntimeCtx;

/// Window handle and metadata for one callback.
pub struct WindowCtx<'a> {
    pub id: WindowId,
    pub window: &'a Arc<Window>,
}

impl<'a> WindowCtx<'a> {
    /// Logical client size `(width, height)`.
    pub fn logical_size(&self) -> (f32, f32) {
        let logical: winit::dpi::LogicalSize<f64> =
            self.window.inner_size().to_logical(self.window.scale_factor());
        (logical.width as f32, logical.height as f32)
    }

    pub fn viewport(&self) -> Viewport {
        let (w, h) = self.logical_size();
        Viewport::new(w, h)
    }

    pub fn scale_factor(&self) -> f32 {
        self.window.scale_factor() as f32
    }

    /// Client metrics used to size a 3D canvas for this window.
    pub fn canvas_metrics(&self) -> CanvasMetrics {
        let (w, h) = self.logical_size();
        CanvasMetrics::new(w, h, self.scale_factor())
    }

    /// Shared handle, for surfaces that must outlive the callback.
    pub fn handle(&self) -> Arc<Window> {
        Arc::clone(self.window)
    }
}

/// Per-frame context passed to [`App::on_frame`](super::App::on_frame).
pub struct FrameCtx<'a> {
    pub window: WindowCtx<'a>,
    pub input: &'a InputState,
    pub input_frame: &'a InputFrame,
    pub time: FrameTime,
    pub runtime: &'a mut RuntimeCtx,
}
