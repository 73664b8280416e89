use crate::coords::CanvasMetrics;
use crate::device::GpuInit;

use super::readiness::{Readiness, ReadinessCell};
use super::{
    Canvas, GpuBackend, Overlay, RenderError, RenderFrame, RenderOutcome, Renderer, SurfaceSize, SurfaceTarget, bind_target,
    draw_ready,
};

/// Brings the device up inside `initialize` and renders every call.
pub struct ImmediateRenderer {
    init: GpuInit,
    canvas: Option<Canvas>,
    backend: ReadinessCell<GpuBackend>,
}

impl ImmediateRenderer {
    pub fn new(init: GpuInit) -> Self {
        Self { init, canvas: None, backend: ReadinessCell::new() }
    }
}

impl Renderer for ImmediateRenderer {
    fn name(&self) -> &'static str {
        "immediate"
    }

    fn initialize(&mut self, target: SurfaceTarget) -> Result<SurfaceSize, RenderError> {
        let size = SurfaceSize::from(target.metrics);
        let (canvas, pending) = bind_target(self.backend.state(), target, &self.init).inspect_err(|e| {
            if !matches!(e, RenderError::Disposed | RenderError::AlreadyInitialized) {
                self.backend.resolve(Err(e.to_string()));
            }
        })?;

        let backend = pollster::block_on(GpuBackend::connect(pending));
        let ready = backend.is_ok();
        self.backend.resolve(backend);
        if !ready {
            let reason = self.backend.error().unwrap_or("unknown").to_string();
            return Err(RenderError::Gpu(reason));
        }

        log::info!("immediate renderer ready at {}x{}", size.width, size.height);
        self.canvas = Some(canvas);
        Ok(size)
    }

    fn render(&mut self, frame: RenderFrame<'_>, overlay: Option<&mut dyn Overlay>) -> RenderOutcome {
        let Some(backend) = self.backend.acquire() else {
            return RenderOutcome::Dropped;
        };
        match self.canvas.as_ref() {
            Some(canvas) => draw_ready(backend, canvas, frame, overlay),
            None => RenderOutcome::Dropped,
        }
    }

    fn set_size(&mut self, metrics: CanvasMetrics) -> SurfaceSize {
        if let Some(canvas) = self.canvas.as_mut() {
            canvas.metrics = metrics;
            if let Some(backend) = self.backend.get_mut() {
                backend.gpu.resize(canvas.window.inner_size());
            }
        }
        SurfaceSize::from(metrics)
    }

    fn dispose(&mut self) {
        if self.backend.dispose().is_some() {
            log::debug!("immediate renderer disposed");
        }
        self.canvas = None;
    }

    fn readiness(&self) -> Readiness {
        self.backend.state()
    }

    fn dropped_frames(&self) -> u64 {
        self.backend.dropped_frames()
    }
}
