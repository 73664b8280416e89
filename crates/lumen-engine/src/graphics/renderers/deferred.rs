use std::thread;

use crate::coords::CanvasMetrics;
use crate::device::GpuInit;

use super::readiness::{Readiness, ReadinessCell};
use super::{
    Canvas, GpuBackend, Overlay, RenderError, RenderFrame, RenderOutcome, Renderer, SurfaceSize, SurfaceTarget, bind_target,
    draw_ready,
};

/// Two-phase renderer: `initialize` creates the surface and returns the
/// provisional canvas size; adapter and device are requested on a worker.
///
/// `render` checks readiness without waiting. Until the worker reports back
/// every frame is dropped.
pub struct DeferredRenderer {
    init: GpuInit,
    canvas: Option<Canvas>,
    backend: ReadinessCell<GpuBackend>,
}

impl DeferredRenderer {
    pub fn new(init: GpuInit) -> Self {
        Self { init, canvas: None, backend: ReadinessCell::new() }
    }
}

impl Renderer for DeferredRenderer {
    fn name(&self) -> &'static str {
        "deferred"
    }

    fn initialize(&mut self, target: SurfaceTarget) -> Result<SurfaceSize, RenderError> {
        let size = SurfaceSize::from(target.metrics);
        let (canvas, pending) = bind_target(self.backend.state(), target, &self.init).inspect_err(|e| {
            if !matches!(e, RenderError::Disposed | RenderError::AlreadyInitialized) {
                self.backend.resolve(Err(e.to_string()));
            }
        })?;
        let Some(tx) = self.backend.begin() else {
            return Err(RenderError::AlreadyInitialized);
        };

        let spawned = thread::Builder::new().name("lumen-gpu-init".into()).spawn(move || {
            let result = pollster::block_on(GpuBackend::connect(pending));
            // The renderer may be gone already; nothing to report to then.
            let _ = tx.send(result);
        });
        if let Err(e) = spawned {
            let reason = format!("failed to spawn gpu init thread: {e}");
            self.backend.resolve(Err(reason.clone()));
            return Err(RenderError::Gpu(reason));
        }

        log::info!("deferred renderer initializing at {}x{}", size.width, size.height);
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

    /// Resizes now if the device is up; otherwise the first ready frame
    /// picks up the window size.
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
        if self.backend.state() == Readiness::Initializing {
            log::debug!("deferred renderer disposed while initializing");
        }
        self.backend.dispose();
        self.canvas = None;
    }

    fn readiness(&self) -> Readiness {
        self.backend.state()
    }

    fn dropped_frames(&self) -> u64 {
        self.backend.dropped_frames()
    }
}
