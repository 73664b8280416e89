use glam::Vec3;

use crate::graphics::materials::{GRADIENT, LOGO_GRADIENT_1, LOGO_GRADIENT_2, MaterialManager, UniformValue};
use crate::graphics::scene::{NodeId, PerspectiveCamera, Scene};

use super::keyframes::{AnimationState, KEYFRAMES};

/// Bracketing keyframes for a progress value.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct KeyframeSample {
    pub from: usize,
    pub to: usize,
    /// Interpolation factor in `[0, 1]`.
    pub t: f32,
}

/// Maps `progress` onto a table of `len` keyframes.
///
/// `progress + 1` is clamped to `[0, len - 1]`; `from` is its floor and `to`
/// the next index, capped at the last one. Non-finite progress clamps like a
/// huge value of the same sign; NaN reads as the first keyframe.
pub fn sample(progress: f32, len: usize) -> KeyframeSample {
    let last = len.saturating_sub(1);
    let adjusted = progress + 1.0;
    let clamped = if adjusted.is_nan() { 0.0 } else { adjusted.clamp(0.0, last as f32) };
    let from = (clamped.floor() as usize).min(last);
    let to = (from + 1).min(last);
    let t = (clamped - from as f32).clamp(0.0, 1.0);
    KeyframeSample { from, to, t }
}

/// Amplitude of the idle vertical bob, in scene units.
const BOB_AMPLITUDE: f32 = 0.1;

/// Scene objects the controller writes each frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SceneObjects {
    pub logo: NodeId,
    pub glow: Option<NodeId>,
}

/// Drives the logo transform and material uniforms from a progress signal.
///
/// The keyframe table is never mutated; the interpolated state lives here.
#[derive(Debug, Clone)]
pub struct AnimationController {
    table: &'static [AnimationState],
    current_time: f64,
    current: AnimationState,
    base_y: Option<f32>,
    objects: Option<SceneObjects>,
    running: bool,
}

impl Default for AnimationController {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationController {
    pub fn new() -> Self {
        Self::with_table(&KEYFRAMES)
    }

    /// Controller over a custom table. An empty table falls back to the
    /// built-in one.
    pub fn with_table(table: &'static [AnimationState]) -> Self {
        let table = if table.is_empty() { &KEYFRAMES[..] } else { table };
        Self {
            table,
            current_time: 0.0,
            current: table[0],
            base_y: None,
            objects: None,
            running: false,
        }
    }

    pub fn set_scene_objects(&mut self, objects: SceneObjects) {
        log::debug!("animation bound to logo {:?}, glow {:?}", objects.logo, objects.glow);
        self.objects = Some(objects);
    }

    pub fn scene_objects(&self) -> Option<SceneObjects> {
        self.objects
    }

    /// State at `progress` without touching the controller.
    pub fn state_at(&self, progress: f32) -> (KeyframeSample, AnimationState) {
        let s = sample(progress, self.table.len());
        let state = self.table[s.from].lerp(&self.table[s.to], s.t);
        (s, state)
    }

    /// Recomputes the current state and writes the logo and glow transforms.
    ///
    /// Glow follows the logo only when `camera` is given.
    pub fn interpolate_states(
        &mut self,
        progress: f32,
        scene: &mut Scene,
        camera: Option<&PerspectiveCamera>,
    ) -> KeyframeSample {
        let (s, state) = self.state_at(progress);
        self.current = state;

        let Some(objects) = self.objects else {
            return s;
        };
        let Some(logo) = scene.transform_mut(objects.logo) else {
            return s;
        };
        logo.rotation = state.rotation;
        logo.scale = Vec3::splat(state.scale);
        logo.position = state.position;
        self.base_y = Some(state.position.y);
        let (logo_position, logo_scale) = (logo.position, logo.scale.x);

        if let (Some(glow), Some(camera)) = (objects.glow, camera) {
            if let Some(glow) = scene.transform_mut(glow) {
                glow.position = logo_position - Vec3::new(0.0, 0.0, 0.2);
                let s = logo_scale * 0.95;
                glow.scale = Vec3::new(s, s, 1.0);
                glow.look_at(camera.position);
            }
        }
        s
    }

    /// Applies the idle bob and pushes the current state into the material
    /// uniforms. Materials that do not exist are skipped.
    pub fn update_material_uniforms(&mut self, scene: &mut Scene, materials: &mut dyn MaterialManager) {
        let time = self.current_time as f32;

        if let Some(logo) = self.objects.and_then(|o| scene.transform_mut(o.logo)) {
            let base_y = *self.base_y.get_or_insert(logo.position.y);
            logo.position.y = base_y + (self.current_time * 0.001).sin() as f32 * BOB_AMPLITUDE;
        }

        if materials.material(GRADIENT).is_some() {
            materials.update_material_uniforms(GRADIENT, &gradient_uniforms(&self.current, time));
        }
        for name in [LOGO_GRADIENT_1, LOGO_GRADIENT_2] {
            if materials.material(name).is_some() {
                materials.update_material_uniforms(name, &[("time", UniformValue::Float(time))]);
            }
        }
    }

    /// Starts ticking. Idempotent.
    pub fn start(&mut self) {
        if !self.running {
            log::debug!("animation started");
        }
        self.running = true;
    }

    /// Stops ticking. Idempotent.
    pub fn stop(&mut self) {
        if self.running {
            log::debug!("animation stopped at {:.0} ms", self.current_time);
        }
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// One frame: record `now_ms`, update uniforms, then call `render`.
    ///
    /// Returns `None` without doing anything while stopped.
    pub fn tick<R>(
        &mut self,
        now_ms: f64,
        scene: &mut Scene,
        materials: &mut dyn MaterialManager,
        render: impl FnOnce(&Scene, &dyn MaterialManager) -> R,
    ) -> Option<R> {
        if !self.running {
            return None;
        }
        self.current_time = now_ms;
        self.update_material_uniforms(scene, materials);
        Some(render(scene, materials))
    }

    /// Milliseconds recorded at the last tick.
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn current_state(&self) -> AnimationState {
        self.current
    }

    /// Logo Y before the bob, once interpolation has run with a bound logo.
    pub fn base_y(&self) -> Option<f32> {
        self.base_y
    }
}

/// Per-frame gradient uniforms for `state`. Accent alpha is not used.
pub fn gradient_uniforms(state: &AnimationState, time: f32) -> [(&'static str, UniformValue); 8] {
    [
        ("color1", state.base_color1.to_linear().into()),
        ("color2", state.base_color2.to_linear().into()),
        ("time", UniformValue::Float(time)),
        ("pulseIntensity", UniformValue::Float(state.pulse_intensity)),
        ("radialPos1", state.radial_pos1.into()),
        ("radialPos2", state.radial_pos2.into()),
        ("accentColor1", state.accent_color1.rgb().to_linear().into()),
        ("accentColor2", state.accent_color2.rgb().to_linear().into()),
    ]
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use crate::graphics::materials::{Backend, GLOW, create_material_manager};
    use crate::graphics::scene::{Node, NodeKind, Transform};

    use super::*;

    const N: usize = KEYFRAMES.len();

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    fn bound() -> (AnimationController, Scene, NodeId, NodeId) {
        let mut scene = Scene::new();
        let logo = scene.add(Node::new("logo", NodeKind::Group), None);
        let glow = scene.add(Node::new("glow", NodeKind::Group), None);
        let mut c = AnimationController::new();
        c.set_scene_objects(SceneObjects { logo, glow: Some(glow) });
        (c, scene, logo, glow)
    }

    // ── sample ────────────────────────────────────────────────────────────

    #[test]
    fn indices_stay_in_range_with_unit_factor() {
        let mut p = -3.0;
        while p < 9.0 {
            let s = sample(p, N);
            assert!(s.from <= s.to && s.to - s.from <= 1 && s.to < N, "{p}: {s:?}");
            assert!((0.0..=1.0).contains(&s.t), "{p}: {s:?}");
            p += 0.13;
        }
    }

    #[test]
    fn minus_one_is_first_keyframe() {
        assert_eq!(sample(-1.0, N), KeyframeSample { from: 0, to: 1, t: 0.0 });
    }

    #[test]
    fn last_in_range_progress_is_last_keyframe() {
        assert_eq!(sample(N as f32 - 2.0, N), KeyframeSample { from: N - 1, to: N - 1, t: 0.0 });
    }

    #[test]
    fn out_of_range_progress_clamps() {
        assert_eq!(sample(1000.0, N), sample(N as f32 - 2.0, N));
        assert_eq!(sample(-50.0, N), sample(-1.0, N));
        assert_eq!(sample(f32::INFINITY, N), sample(N as f32 - 2.0, N));
        assert_eq!(sample(f32::NAN, N), sample(-1.0, N));
    }

    #[test]
    fn fractional_progress_splits_into_index_and_factor() {
        let s = sample(1.25, N);
        assert_eq!((s.from, s.to), (2, 3));
        assert!(close(s.t, 0.25));
    }

    // ── interpolate_states ────────────────────────────────────────────────

    #[test]
    fn endpoints_reproduce_keyframes() {
        let c = AnimationController::new();
        let (_, first) = c.state_at(-1.0);
        let (_, last) = c.state_at(N as f32 - 2.0);
        assert_eq!(first.base_color1, KEYFRAMES[0].base_color1);
        assert!(close(first.scale, KEYFRAMES[0].scale));
        assert_eq!(last.accent_color2, KEYFRAMES[N - 1].accent_color2);
        assert!(close(last.pulse_intensity, KEYFRAMES[N - 1].pulse_intensity));
    }

    #[test]
    fn unbound_controller_only_updates_state() {
        let mut c = AnimationController::new();
        let mut scene = Scene::new();
        c.interpolate_states(0.5, &mut scene, None);
        let (_, expected) = c.state_at(0.5);
        assert_eq!(c.current_state(), expected);
        assert_eq!(c.base_y(), None);
    }

    #[test]
    fn writes_logo_transform_and_base_y() {
        let (mut c, mut scene, logo, _) = bound();
        c.interpolate_states(-1.0, &mut scene, None);
        let t = scene.get(logo).unwrap().transform;
        assert_eq!(t.scale, Vec3::splat(KEYFRAMES[0].scale));
        assert_eq!(t.position, KEYFRAMES[0].position);
        assert_eq!(c.base_y(), Some(KEYFRAMES[0].position.y));
    }

    #[test]
    fn glow_trails_logo_and_faces_camera() {
        let (mut c, mut scene, logo, glow) = bound();
        let camera = PerspectiveCamera::default();
        c.interpolate_states(2.0, &mut scene, Some(&camera));
        let lt = scene.get(logo).unwrap().transform;
        let gt = scene.get(glow).unwrap().transform;
        assert!((gt.position - (lt.position - Vec3::Z * 0.2)).length() < 1e-6);
        assert!(close(gt.scale.x, lt.scale.x * 0.95));
        assert_eq!(gt.scale.z, 1.0);
        let forward = gt.quat() * Vec3::Z;
        assert!((forward - (camera.position - gt.position).normalize()).length() < 1e-3);
    }

    #[test]
    fn glow_untouched_without_camera() {
        let (mut c, mut scene, _, glow) = bound();
        c.interpolate_states(2.0, &mut scene, None);
        assert_eq!(scene.get(glow).unwrap().transform, Transform::default());
    }

    #[test]
    fn stale_ids_after_scene_clear_are_ignored() {
        let (mut c, mut scene, _, _) = bound();
        scene.clear();
        c.interpolate_states(1.0, &mut scene, Some(&PerspectiveCamera::default()));
        c.update_material_uniforms(&mut scene, create_material_manager(Backend::ShaderSource).as_mut());
    }

    // ── per-frame update ──────────────────────────────────────────────────

    #[test]
    fn tick_is_skipped_until_started_and_after_stop() {
        let (mut c, mut scene, _, _) = bound();
        let mut materials = create_material_manager(Backend::ShaderSource);
        assert_eq!(c.tick(10.0, &mut scene, materials.as_mut(), |_, _| ()), None);
        c.start();
        c.start();
        assert_eq!(c.tick(20.0, &mut scene, materials.as_mut(), |_, _| 7), Some(7));
        assert_eq!(c.current_time(), 20.0);
        c.stop();
        c.stop();
        assert_eq!(c.tick(30.0, &mut scene, materials.as_mut(), |_, _| 7), None);
        assert_eq!(c.current_time(), 20.0);
    }

    #[test]
    fn bob_oscillates_around_base_y() {
        let (mut c, mut scene, logo, _) = bound();
        let mut materials = create_material_manager(Backend::ShaderSource);
        c.interpolate_states(0.0, &mut scene, None);
        let base = c.base_y().unwrap();
        c.start();
        let quarter = std::f64::consts::FRAC_PI_2 * 1000.0;
        c.tick(quarter, &mut scene, materials.as_mut(), |_, _| ());
        let y = scene.get(logo).unwrap().transform.position.y;
        assert!(close(y, base + BOB_AMPLITUDE), "{y} vs {base}");
        // Bob does not accumulate.
        c.tick(quarter, &mut scene, materials.as_mut(), |_, _| ());
        assert!(close(scene.get(logo).unwrap().transform.position.y, base + BOB_AMPLITUDE));
    }

    #[test]
    fn tick_pushes_state_into_gradient_and_logo_time() {
        let (mut c, mut scene, _, _) = bound();
        let mut materials = create_material_manager(Backend::UniformGraph);
        materials.create_gradient_material();
        let [(a1, b1), _] = crate::graphics::materials::LOGO_COLORS;
        materials.create_logo_gradient_material(a1, b1, LOGO_GRADIENT_1);
        materials.create_glow_material();
        let glow_before = materials.uniforms(GLOW).unwrap().clone();

        c.interpolate_states(3.5, &mut scene, None);
        c.start();
        c.tick(1234.0, &mut scene, materials.as_mut(), |_, _| ());

        let state = c.current_state();
        let g = materials.uniforms(GRADIENT).unwrap();
        assert_eq!(g.get("time"), Some(&UniformValue::Float(1234.0)));
        assert_eq!(g.get("radialPos1"), Some(&UniformValue::Vec2(state.radial_pos1)));
        assert_eq!(g.get("pulseIntensity"), Some(&UniformValue::Float(state.pulse_intensity)));
        assert_eq!(g.get("color1"), Some(&UniformValue::Vec3(state.base_color1.to_linear())));
        assert_eq!(materials.uniforms(LOGO_GRADIENT_1).unwrap().get("time"), Some(&UniformValue::Float(1234.0)));
        assert_eq!(materials.uniforms(GLOW), Some(&glow_before));
    }

    #[test]
    fn gradient_uniforms_drop_accent_alpha() {
        let state = KEYFRAMES[0];
        let u = gradient_uniforms(&state, 0.0);
        let accent = u.iter().find(|(k, _)| *k == "accentColor1").unwrap().1;
        assert_eq!(accent, UniformValue::Vec3(state.accent_color1.rgb().to_linear()));
        let pos = u.iter().find(|(k, _)| *k == "radialPos2").unwrap().1;
        assert_eq!(pos.as_vec2(), Some(state.radial_pos2));
        assert_ne!(state.radial_pos2, Vec2::ZERO);
    }
}
