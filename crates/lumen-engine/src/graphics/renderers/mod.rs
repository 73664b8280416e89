//! Scene renderers behind one [`Renderer`] contract.
//!
//! Two implementations share the GPU painter and differ in how the device
//! arrives:
//! - [`ImmediateRenderer`] blocks in `initialize` and renders every call
//! - [`DeferredRenderer`] returns provisional dimensions at once and brings
//!   the device up on a worker thread; frames requested before it is ready
//!   are dropped (counted, never queued)
//!
//! After `dispose` every call is a no-op.

mod deferred;
mod immediate;
mod painter;
mod readiness;

pub use deferred::DeferredRenderer;
pub use immediate::ImmediateRenderer;
pub use painter::{SceneFrame, ScenePainter, bleed_crop};
pub use readiness::{InitResult, Readiness, ReadinessCell};

use std::sync::Arc;

use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::coords::CanvasMetrics;
use crate::device::{Gpu, GpuInit, PendingGpu};
use crate::graphics::materials::{Backend, MaterialManager};
use crate::graphics::scene::{PerspectiveCamera, Scene};
use crate::render::{RenderCtx, RenderTarget};

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("no window to draw into")]
    NoWindow,

    #[error("gpu setup failed: {0}")]
    Gpu(String),

    #[error("renderer already initialized")]
    AlreadyInitialized,

    #[error("renderer disposed")]
    Disposed,
}

/// Where a renderer draws: the window plus the client metrics that size the
/// canvas.
#[derive(Clone)]
pub struct SurfaceTarget {
    pub window: Option<Arc<Window>>,
    pub metrics: CanvasMetrics,
}

impl SurfaceTarget {
    pub fn new(window: Arc<Window>, metrics: CanvasMetrics) -> Self {
        Self { window: Some(window), metrics }
    }

    /// A target with no window. Initializing against it fails.
    pub fn headless(metrics: CanvasMetrics) -> Self {
        Self { window: None, metrics }
    }
}

/// Canvas size in physical pixels, bleed included.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl From<CanvasMetrics> for SurfaceSize {
    fn from(m: CanvasMetrics) -> Self {
        let (width, height) = m.drawable_size();
        Self { width, height }
    }
}

/// What happened to one `render` call.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RenderOutcome {
    Presented,
    /// Backend not ready (or disposed); nothing drawn, nothing queued.
    Dropped,
    /// Transient surface problem; the next frame may succeed.
    Skipped,
    Failed,
}

/// 2D content drawn over the scene in the same frame.
pub trait Overlay {
    fn draw(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>);
}

/// Scene, camera and materials for one frame.
#[derive(Copy, Clone)]
pub struct RenderFrame<'a> {
    pub scene: &'a Scene,
    pub camera: &'a PerspectiveCamera,
    pub materials: &'a dyn MaterialManager,
}

pub trait Renderer {
    fn name(&self) -> &'static str;

    /// Binds the surface and returns the canvas size in physical pixels.
    fn initialize(&mut self, target: SurfaceTarget) -> Result<SurfaceSize, RenderError>;

    /// Draws `frame`, then `overlay` on top.
    fn render(&mut self, frame: RenderFrame<'_>, overlay: Option<&mut dyn Overlay>) -> RenderOutcome;

    /// Follows new client metrics and returns the new canvas size.
    fn set_size(&mut self, metrics: CanvasMetrics) -> SurfaceSize;

    /// Releases the device and surface. Idempotent.
    fn dispose(&mut self);

    fn readiness(&self) -> Readiness;

    /// Frames dropped because the backend was not ready.
    fn dropped_frames(&self) -> u64;
}

/// Renderer for `backend`: immediate for shader-source materials, deferred
/// for the graph backend.
pub fn create_renderer(backend: Backend, init: GpuInit) -> Box<dyn Renderer> {
    match backend {
        Backend::ShaderSource => Box::new(ImmediateRenderer::new(init)),
        Backend::UniformGraph => Box::new(DeferredRenderer::new(init)),
    }
}

/// Device plus the painter built on it.
pub(crate) struct GpuBackend {
    gpu: Gpu,
    painter: ScenePainter,
}

impl GpuBackend {
    async fn connect(pending: PendingGpu) -> InitResult<Self> {
        let gpu = pending.connect().await.map_err(|e| format!("{e:#}"))?;
        let painter = ScenePainter::new(&gpu);
        Ok(Self { gpu, painter })
    }
}

/// Window and metrics a renderer is bound to.
pub(crate) struct Canvas {
    window: Arc<Window>,
    metrics: CanvasMetrics,
}

impl Canvas {
    fn visible_fraction(&self) -> f32 {
        let h = self.metrics.client_height.max(0.0);
        if h + self.metrics.bleed > 0.0 { h / (h + self.metrics.bleed) } else { 1.0 }
    }

    fn physical_size(&self) -> PhysicalSize<u32> {
        self.window.inner_size()
    }
}

/// Draws one frame on a ready backend, following window resizes first.
fn draw_ready(
    backend: &mut GpuBackend,
    canvas: &Canvas,
    frame: RenderFrame<'_>,
    overlay: Option<&mut dyn Overlay>,
) -> RenderOutcome {
    let size = canvas.physical_size();
    if backend.gpu.size() != size {
        backend.gpu.resize(size);
    }
    if size.width == 0 || size.height == 0 {
        return RenderOutcome::Skipped;
    }
    let scene = SceneFrame {
        scene: frame.scene,
        camera: frame.camera,
        materials: frame.materials,
        visible_fraction: canvas.visible_fraction(),
    };
    painter::present(
        &mut backend.gpu,
        &mut backend.painter,
        &scene,
        overlay,
        canvas.metrics.pixel_ratio,
    )
}

/// Checks the common preconditions of `initialize` and unpacks the target.
fn bind_target(
    state: Readiness,
    target: SurfaceTarget,
    init: &GpuInit,
) -> Result<(Canvas, PendingGpu), RenderError> {
    match state {
        Readiness::Uninitialized => {}
        Readiness::Disposed => return Err(RenderError::Disposed),
        _ => return Err(RenderError::AlreadyInitialized),
    }
    let window = target.window.ok_or(RenderError::NoWindow)?;
    let pending = Gpu::prepare(Arc::clone(&window), init.clone()).map_err(|e| RenderError::Gpu(format!("{e:#}")))?;
    Ok((Canvas { window, metrics: target.metrics }, pending))
}
