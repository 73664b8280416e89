use anyhow::{Context, Result};

use crate::coords::CanvasMetrics;
use crate::device::GpuInit;

use super::animation::{AnimationController, SceneObjects};
use super::materials::{Backend, MaterialManager, create_material_manager};
use super::renderers::{Overlay, Readiness, RenderFrame, RenderOutcome, Renderer, SurfaceSize, SurfaceTarget, create_renderer};
use super::scene::{BuiltinModelLoader, ModelLoader, SceneManager, SceneOptions};

/// Backend choice and scene settings for [`GraphicsController`].
#[derive(Debug, Clone, Default)]
pub struct GraphicsOptions {
    pub backend: Backend,
    pub scene: SceneOptions,
    pub gpu: GpuInit,
}

/// Wires renderer, materials, scene and animation together.
///
/// Until `initialize` succeeds every call is a guarded no-op; after
/// `dispose` the controller stays inert for good.
pub struct GraphicsController {
    options: GraphicsOptions,
    loader: Box<dyn ModelLoader>,
    renderer: Option<Box<dyn Renderer>>,
    materials: Option<Box<dyn MaterialManager>>,
    scene: SceneManager,
    animation: AnimationController,
    size: SurfaceSize,
    progress: f32,
    initialized: bool,
    disposed: bool,
}

impl GraphicsController {
    pub fn new(options: GraphicsOptions) -> Self {
        let scene = SceneManager::new(options.scene.clone());
        Self {
            options,
            loader: Box::new(BuiltinModelLoader),
            renderer: None,
            materials: None,
            scene,
            animation: AnimationController::new(),
            size: SurfaceSize::default(),
            progress: 0.0,
            initialized: false,
            disposed: false,
        }
    }

    pub fn with_loader(mut self, loader: impl ModelLoader + 'static) -> Self {
        self.loader = Box::new(loader);
        self
    }

    /// Builds renderer and materials for the configured backend, then the
    /// scene. Errors are logged and returned.
    pub fn initialize(&mut self, target: SurfaceTarget) -> Result<SurfaceSize> {
        let backend = self.options.backend;
        log::info!("initializing graphics with the {backend} backend");
        let renderer = create_renderer(backend, self.options.gpu.clone());
        let materials = create_material_manager(backend);
        self.initialize_with(target, renderer, materials)
    }

    /// [`initialize`](Self::initialize) with caller-supplied parts.
    pub fn initialize_with(
        &mut self,
        target: SurfaceTarget,
        renderer: Box<dyn Renderer>,
        materials: Box<dyn MaterialManager>,
    ) -> Result<SurfaceSize> {
        let result = self.try_initialize(target, renderer, materials);
        if let Err(e) = &result {
            log::error!("graphics initialization failed: {e:#}");
        }
        result
    }

    fn try_initialize(
        &mut self,
        target: SurfaceTarget,
        renderer: Box<dyn Renderer>,
        materials: Box<dyn MaterialManager>,
    ) -> Result<SurfaceSize> {
        anyhow::ensure!(!self.disposed, "graphics controller already disposed");
        anyhow::ensure!(!self.initialized, "graphics controller already initialized");

        let renderer = self.renderer.insert(renderer);
        let materials = self.materials.insert(materials);

        let size = renderer
            .initialize(target)
            .with_context(|| format!("{} renderer failed to initialize", renderer.name()))?;
        self.scene
            .initialize(size.width as f32, size.height as f32, materials.as_mut(), self.loader.as_ref())
            .context("scene setup failed")?;

        if let Some(logo) = self.scene.logo() {
            self.animation.set_scene_objects(SceneObjects { logo, glow: self.scene.glow() });
        }
        self.size = size;
        self.initialized = true;
        log::info!("graphics ready: {}x{} via {}", size.width, size.height, renderer.name());
        Ok(size)
    }

    /// Starts the frame loop at `progress`.
    pub fn start_animation(&mut self, progress: f32) {
        if !self.initialized {
            log::warn!("start_animation called before initialize");
            return;
        }
        self.animation.start();
        self.update_progress(progress);
    }

    pub fn stop_animation(&mut self) {
        self.animation.stop();
    }

    pub fn update_progress(&mut self, progress: f32) {
        if !self.initialized {
            return;
        }
        self.progress = progress;
        let (scene, camera) = self.scene.parts_mut();
        self.animation.interpolate_states(progress, scene, Some(camera));
    }

    /// One animation tick at `now_ms`: uniforms, bob, then a render.
    ///
    /// `None` when not initialized or the animation is stopped.
    pub fn frame(&mut self, now_ms: f64, overlay: Option<&mut dyn Overlay>) -> Option<RenderOutcome> {
        if !self.initialized {
            return None;
        }
        let (Some(renderer), Some(materials)) = (self.renderer.as_deref_mut(), self.materials.as_deref_mut()) else {
            return None;
        };
        let (scene, camera) = self.scene.parts_mut();
        self.animation.tick(now_ms, scene, materials, |scene, materials| {
            renderer.render(RenderFrame { scene, camera, materials }, overlay)
        })
    }

    /// Renders the current state once, without advancing time.
    pub fn render(&mut self, overlay: Option<&mut dyn Overlay>) -> RenderOutcome {
        if !self.initialized {
            return RenderOutcome::Dropped;
        }
        let (Some(renderer), Some(materials)) = (self.renderer.as_deref_mut(), self.materials.as_deref()) else {
            return RenderOutcome::Dropped;
        };
        let frame = RenderFrame { scene: self.scene.scene(), camera: self.scene.camera(), materials };
        renderer.render(frame, overlay)
    }

    pub fn set_size(&mut self, metrics: CanvasMetrics) {
        if !self.initialized {
            return;
        }
        let Some(renderer) = self.renderer.as_deref_mut() else {
            return;
        };
        let size = renderer.set_size(metrics);
        self.scene.update_camera_aspect(size.width as f32, size.height as f32);
        self.size = size;
    }

    /// Stops the loop and releases scene, materials and renderer, in that
    /// order. Idempotent; later calls are no-ops.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.animation.stop();
        self.scene.dispose();
        if let Some(materials) = self.materials.as_deref_mut() {
            materials.dispose();
        }
        if let Some(renderer) = self.renderer.as_deref_mut() {
            renderer.dispose();
        }
        self.initialized = false;
        self.disposed = true;
        log::info!("graphics disposed");
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn backend(&self) -> Backend {
        self.options.backend
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Canvas size reported by the renderer, bleed included.
    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    pub fn animation(&self) -> &AnimationController {
        &self.animation
    }

    pub fn scene(&self) -> &SceneManager {
        &self.scene
    }

    pub fn materials(&self) -> Option<&dyn MaterialManager> {
        self.materials.as_deref()
    }

    pub fn readiness(&self) -> Readiness {
        self.renderer.as_ref().map_or(Readiness::Uninitialized, |r| r.readiness())
    }

    pub fn dropped_frames(&self) -> u64 {
        self.renderer.as_ref().map_or(0, |r| r.dropped_frames())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::graphics::animation::KEYFRAMES;
    use crate::graphics::materials::{GRADIENT, UniformValue};
    use crate::graphics::renderers::RenderError;
    use crate::graphics::scene::{Model, SceneError};

    use super::*;

    #[derive(Default)]
    struct Calls {
        renders: usize,
        sizes: Vec<CanvasMetrics>,
        disposed: usize,
        last_gradient_time: Option<f32>,
    }

    struct FakeRenderer {
        calls: Rc<RefCell<Calls>>,
        fail: bool,
        state: Readiness,
    }

    impl Renderer for FakeRenderer {
        fn name(&self) -> &'static str {
            "fake"
        }

        fn initialize(&mut self, target: SurfaceTarget) -> Result<SurfaceSize, RenderError> {
            if self.fail {
                self.state = Readiness::Failed;
                return Err(RenderError::NoWindow);
            }
            self.state = Readiness::Ready;
            Ok(SurfaceSize::from(target.metrics))
        }

        fn render(&mut self, frame: RenderFrame<'_>, _overlay: Option<&mut dyn Overlay>) -> RenderOutcome {
            let mut calls = self.calls.borrow_mut();
            calls.renders += 1;
            calls.last_gradient_time =
                frame.materials.uniforms(GRADIENT).and_then(|u| u.get("time")).and_then(|v| v.as_float());
            RenderOutcome::Presented
        }

        fn set_size(&mut self, metrics: CanvasMetrics) -> SurfaceSize {
            self.calls.borrow_mut().sizes.push(metrics);
            SurfaceSize::from(metrics)
        }

        fn dispose(&mut self) {
            self.calls.borrow_mut().disposed += 1;
            self.state = Readiness::Disposed;
        }

        fn readiness(&self) -> Readiness {
            self.state
        }

        fn dropped_frames(&self) -> u64 {
            0
        }
    }

    struct NoModel;

    impl ModelLoader for NoModel {
        fn load(&self, name: &str) -> Result<Model, SceneError> {
            Err(SceneError::ModelNotFound(name.to_string()))
        }
    }

    fn metrics() -> CanvasMetrics {
        CanvasMetrics::new(400.0, 740.0, 1.0)
    }

    fn controller(fail: bool) -> (GraphicsController, Rc<RefCell<Calls>>, Result<SurfaceSize>) {
        let calls = Rc::new(RefCell::new(Calls::default()));
        let renderer = FakeRenderer { calls: Rc::clone(&calls), fail, state: Readiness::Uninitialized };
        let mut gc = GraphicsController::new(GraphicsOptions::default());
        let result = gc.initialize_with(
            SurfaceTarget::headless(metrics()),
            Box::new(renderer),
            create_material_manager(Backend::ShaderSource),
        );
        (gc, calls, result)
    }

    // ── initialize ────────────────────────────────────────────────────────

    #[test]
    fn initialize_builds_scene_and_binds_animation() {
        let (gc, _, result) = controller(false);
        let size = result.unwrap();
        assert_eq!(size, SurfaceSize { width: 400, height: 800 });
        assert!(gc.is_initialized());
        assert_eq!(gc.scene().camera().aspect, 0.5);
        let objects = gc.animation().scene_objects().unwrap();
        assert_eq!(Some(objects.logo), gc.scene().logo());
        assert_eq!(gc.readiness(), Readiness::Ready);
    }

    #[test]
    fn renderer_failure_is_returned_and_leaves_controller_inert() {
        let (mut gc, calls, result) = controller(true);
        let err = result.unwrap_err();
        assert!(format!("{err:#}").contains("no window"), "{err:#}");
        assert!(!gc.is_initialized());
        gc.start_animation(0.0);
        gc.update_progress(1.0);
        assert_eq!(gc.frame(16.0, None), None);
        assert_eq!(gc.render(None), RenderOutcome::Dropped);
        gc.set_size(metrics());
        assert_eq!(calls.borrow().renders, 0);
        assert!(calls.borrow().sizes.is_empty());
    }

    #[test]
    fn missing_model_fails_initialize() {
        let mut gc = GraphicsController::new(GraphicsOptions::default()).with_loader(NoModel);
        let calls = Rc::new(RefCell::new(Calls::default()));
        let renderer = FakeRenderer { calls, fail: false, state: Readiness::Uninitialized };
        let err = gc
            .initialize_with(
                SurfaceTarget::headless(metrics()),
                Box::new(renderer),
                create_material_manager(Backend::UniformGraph),
            )
            .unwrap_err();
        assert!(format!("{err:#}").contains("vite.glb"));
        assert!(!gc.is_initialized());
    }

    #[test]
    fn second_initialize_is_rejected() {
        let (mut gc, _, _) = controller(false);
        let again = gc.initialize(SurfaceTarget::headless(metrics()));
        assert!(again.is_err());
        assert!(gc.is_initialized());
    }

    // ── animation ─────────────────────────────────────────────────────────

    #[test]
    fn start_animation_before_initialize_is_ignored() {
        let mut gc = GraphicsController::new(GraphicsOptions::default());
        gc.start_animation(0.0);
        assert!(!gc.animation().is_running());
    }

    #[test]
    fn start_then_frames_render_with_fresh_uniforms() {
        let (mut gc, calls, _) = controller(false);
        gc.start_animation(-1.0);
        assert_eq!(gc.frame(500.0, None), Some(RenderOutcome::Presented));
        assert_eq!(gc.frame(516.0, None), Some(RenderOutcome::Presented));
        assert_eq!(calls.borrow().renders, 2);
        assert_eq!(calls.borrow().last_gradient_time, Some(516.0));
        assert_eq!(gc.animation().current_state().scale, KEYFRAMES[0].scale);
    }

    #[test]
    fn progress_moves_the_logo() {
        let (mut gc, _, _) = controller(false);
        gc.update_progress(3.0);
        let logo = gc.scene().logo().unwrap();
        let t = gc.scene().scene().get(logo).unwrap().transform;
        assert_eq!(t.scale.x, KEYFRAMES[4].scale);
        assert_eq!(gc.progress(), 3.0);
    }

    #[test]
    fn stopped_animation_skips_frames_but_render_still_draws() {
        let (mut gc, calls, _) = controller(false);
        gc.start_animation(0.0);
        gc.stop_animation();
        assert_eq!(gc.frame(10.0, None), None);
        assert_eq!(gc.render(None), RenderOutcome::Presented);
        assert_eq!(calls.borrow().renders, 1);
    }

    #[test]
    fn uniform_updates_reach_materials() {
        let (mut gc, _, _) = controller(false);
        gc.start_animation(1.0);
        gc.frame(42.0, None);
        let time = gc.materials().and_then(|m| m.uniforms(GRADIENT)).and_then(|u| u.get("time")).copied();
        assert_eq!(time, Some(UniformValue::Float(42.0)));
    }

    // ── size / dispose ────────────────────────────────────────────────────

    #[test]
    fn set_size_updates_camera_aspect() {
        let (mut gc, calls, _) = controller(false);
        gc.set_size(CanvasMetrics::new(1000.0, 440.0, 1.0));
        assert_eq!(calls.borrow().sizes.len(), 1);
        assert_eq!(gc.scene().camera().aspect, 2.0);
        assert_eq!(gc.size(), SurfaceSize { width: 1000, height: 500 });
    }

    #[test]
    fn dispose_releases_everything_once_and_later_calls_are_no_ops() {
        let (mut gc, calls, _) = controller(false);
        gc.start_animation(0.0);
        gc.dispose();
        gc.dispose();
        assert_eq!(calls.borrow().disposed, 1);
        assert!(gc.is_disposed() && !gc.is_initialized());
        assert!(gc.scene().scene().is_empty());
        assert!(gc.materials().is_some_and(|m| m.is_disposed()));
        assert!(!gc.animation().is_running());

        gc.update_progress(2.0);
        gc.set_size(metrics());
        assert_eq!(gc.frame(1.0, None), None);
        assert_eq!(gc.render(None), RenderOutcome::Dropped);
        assert!(gc.initialize(SurfaceTarget::headless(metrics())).is_err());
        assert_eq!(calls.borrow().renders, 0);
    }
}
