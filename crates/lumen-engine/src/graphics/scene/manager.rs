use glam::Vec3;

use crate::graphics::animation::color::Rgb;
use crate::graphics::materials::{GLOW, GRADIENT, LOGO_COLORS, LOGO_GRADIENT_1, LOGO_GRADIENT_2, MaterialManager};

use super::SceneError;
use super::geometry::Geometry;
use super::graph::{Light, Mesh, Node, NodeId, NodeKind, PerspectiveCamera, Scene, Transform};
use super::model::{LOGO_MODEL, ModelLoader};

/// Camera and content settings for [`SceneManager`].
#[derive(Debug, Clone, PartialEq)]
pub struct SceneOptions {
    pub fov_deg: f32,
    pub near: f32,
    pub far: f32,
    pub camera_z: f32,
    /// Adds the additive halo plane behind the logo.
    pub glow: bool,
    pub model: String,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            fov_deg: 45.0,
            near: 0.1,
            far: 1000.0,
            camera_z: 5.0,
            glow: false,
            model: LOGO_MODEL.to_string(),
        }
    }
}

/// Owns the scene graph and camera for the logo screen.
#[derive(Debug)]
pub struct SceneManager {
    scene: Scene,
    camera: PerspectiveCamera,
    options: SceneOptions,
    background: Option<NodeId>,
    logo: Option<NodeId>,
    glow: Option<NodeId>,
    lights: Vec<NodeId>,
    disposed: bool,
}

impl SceneManager {
    pub fn new(options: SceneOptions) -> Self {
        let camera = PerspectiveCamera {
            fov_deg: options.fov_deg,
            near: options.near,
            far: options.far,
            position: Vec3::new(0.0, 0.0, options.camera_z),
            ..PerspectiveCamera::default()
        };
        Self {
            scene: Scene::new(),
            camera,
            options,
            background: None,
            logo: None,
            glow: None,
            lights: Vec::new(),
            disposed: false,
        }
    }

    /// Builds background, lights, optional glow and the logo.
    ///
    /// Materials are created through `materials`; meshes refer to them by
    /// name. A missing model fails the whole step.
    pub fn initialize(
        &mut self,
        width: f32,
        height: f32,
        materials: &mut dyn MaterialManager,
        loader: &dyn ModelLoader,
    ) -> Result<(), SceneError> {
        if self.disposed {
            return Err(SceneError::Disposed);
        }
        self.camera.set_aspect(width, height);

        self.setup_background(materials);
        self.setup_lighting();
        if self.options.glow {
            self.setup_glow(materials);
        }
        self.load_logo(materials, loader)?;

        log::info!(
            "scene ready: {} node(s), {} light(s), glow {}",
            self.scene.len(),
            self.lights.len(),
            if self.glow.is_some() { "on" } else { "off" }
        );
        Ok(())
    }

    fn add_mesh(&mut self, name: &str, geometry: Geometry, material: &str, transform: Transform, parent: Option<NodeId>) -> NodeId {
        let geometry = self.scene.add_geometry(geometry);
        let mesh = Mesh { geometry, material: material.to_string(), visible: true };
        self.scene.add(Node::new(name, NodeKind::Mesh(mesh)).with_transform(transform), parent)
    }

    fn setup_background(&mut self, materials: &mut dyn MaterialManager) {
        materials.create_gradient_material();
        let at = Transform::from_position(Vec3::new(0.0, 0.0, -10.0));
        self.background = Some(self.add_mesh("gradientPlane", Geometry::plane(20.0, 20.0), GRADIENT, at, None));
    }

    fn setup_lighting(&mut self) {
        let white = Rgb::from_hex(0xffffff);
        let dir = Node::new("dirLight", NodeKind::Light(Light::Directional { color: white, intensity: 0.8 }))
            .with_transform(Transform::from_position(Vec3::new(30.0, 60.0, 30.0)));
        let amb = Node::new("ambLight", NodeKind::Light(Light::Ambient { color: white, intensity: 0.4 }));
        self.lights.push(self.scene.add(dir, None));
        self.lights.push(self.scene.add(amb, None));
    }

    fn setup_glow(&mut self, materials: &mut dyn MaterialManager) {
        materials.create_glow_material();
        self.glow = Some(self.add_mesh("logoGlow", Geometry::plane(4.0, 4.0), GLOW, Transform::default(), None));
    }

    fn load_logo(&mut self, materials: &mut dyn MaterialManager, loader: &dyn ModelLoader) -> Result<(), SceneError> {
        let model = loader.load(&self.options.model).inspect_err(|e| {
            log::error!("failed to load model `{}`: {e}", self.options.model);
        })?;

        let [(a1, b1), (a2, b2)] = LOGO_COLORS;
        materials.create_logo_gradient_material(a1, b1, LOGO_GRADIENT_1);
        materials.create_logo_gradient_material(a2, b2, LOGO_GRADIENT_2);

        let root = self.scene.add(Node::new("logo", NodeKind::Group), None);
        for (i, part) in model.parts.into_iter().enumerate() {
            let material = if i % 2 == 0 { LOGO_GRADIENT_1 } else { LOGO_GRADIENT_2 };
            log::debug!("logo mesh {i} `{}` -> {material}", part.name);
            self.add_mesh(&part.name, part.geometry, material, part.transform, Some(root));
        }
        self.logo = Some(root);
        Ok(())
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    /// Scene and camera together, for the per-frame animation step.
    pub fn parts_mut(&mut self) -> (&mut Scene, &PerspectiveCamera) {
        (&mut self.scene, &self.camera)
    }

    pub fn logo(&self) -> Option<NodeId> {
        self.logo
    }

    pub fn glow(&self) -> Option<NodeId> {
        self.glow
    }

    pub fn background(&self) -> Option<NodeId> {
        self.background
    }

    pub fn lights(&self) -> &[NodeId] {
        &self.lights
    }

    pub fn update_camera_aspect(&mut self, width: f32, height: f32) {
        self.camera.set_aspect(width, height);
    }

    /// Releases every node and geometry. Idempotent.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.scene.clear();
        self.background = None;
        self.logo = None;
        self.glow = None;
        self.lights.clear();
        self.disposed = true;
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

#[cfg(test)]
mod tests {
    use crate::graphics::materials::{Backend, create_material_manager};
    use crate::graphics::scene::model::{BuiltinModelLoader, Model, ModelPart};

    use super::*;

    struct ThreeParts;

    impl ModelLoader for ThreeParts {
        fn load(&self, _name: &str) -> Result<Model, SceneError> {
            let part = |name: &str| ModelPart {
                name: name.into(),
                geometry: Geometry::plane(1.0, 1.0),
                transform: Transform::default(),
            };
            Ok(Model { parts: vec![part("a"), part("b"), part("c")] })
        }
    }

    fn ready(options: SceneOptions, loader: &dyn ModelLoader) -> (SceneManager, Box<dyn MaterialManager>) {
        let mut materials = create_material_manager(Backend::ShaderSource);
        let mut sm = SceneManager::new(options);
        sm.initialize(800.0, 400.0, materials.as_mut(), loader).unwrap();
        (sm, materials)
    }

    // ── initialize ────────────────────────────────────────────────────────

    #[test]
    fn builds_background_lights_and_logo() {
        let (sm, materials) = ready(SceneOptions::default(), &BuiltinModelLoader);
        let bg = sm.scene().get(sm.background().unwrap()).unwrap();
        assert_eq!(bg.transform.position.z, -10.0);
        assert_eq!(bg.mesh().unwrap().material, GRADIENT);
        assert_eq!(sm.lights().len(), 2);
        assert!(sm.logo().is_some());
        assert!(sm.glow().is_none());
        assert_eq!(sm.camera().aspect, 2.0);
        assert!(materials.material(GRADIENT).is_some());
        assert!(materials.material(LOGO_GRADIENT_2).is_some());
    }

    #[test]
    fn logo_meshes_alternate_materials() {
        let (sm, _) = ready(SceneOptions::default(), &ThreeParts);
        let logo = sm.logo().unwrap();
        let mats: Vec<String> = sm
            .scene()
            .descendants(logo)
            .into_iter()
            .filter_map(|id| sm.scene().get(id)?.mesh().map(|m| m.material.clone()))
            .collect();
        assert_eq!(mats, [LOGO_GRADIENT_1, LOGO_GRADIENT_2, LOGO_GRADIENT_1]);
    }

    #[test]
    fn glow_is_opt_in() {
        let (sm, materials) = ready(SceneOptions { glow: true, ..SceneOptions::default() }, &BuiltinModelLoader);
        let glow = sm.scene().get(sm.glow().unwrap()).unwrap();
        assert_eq!(glow.mesh().unwrap().material, GLOW);
        assert!(materials.material(GLOW).is_some());
    }

    #[test]
    fn missing_model_fails_initialize() {
        let mut materials = create_material_manager(Backend::ShaderSource);
        let mut sm = SceneManager::new(SceneOptions { model: "nope.glb".into(), ..SceneOptions::default() });
        let err = sm.initialize(1.0, 1.0, materials.as_mut(), &BuiltinModelLoader).unwrap_err();
        assert!(matches!(err, SceneError::ModelNotFound(_)));
        assert!(sm.logo().is_none());
    }

    // ── aspect / dispose ──────────────────────────────────────────────────

    #[test]
    fn aspect_follows_size() {
        let (mut sm, _) = ready(SceneOptions::default(), &BuiltinModelLoader);
        sm.update_camera_aspect(300.0, 600.0);
        assert_eq!(sm.camera().aspect, 0.5);
    }

    #[test]
    fn dispose_empties_scene_and_blocks_reinit() {
        let (mut sm, mut materials) = ready(SceneOptions::default(), &BuiltinModelLoader);
        sm.dispose();
        sm.dispose();
        assert!(sm.scene().is_empty());
        assert!(sm.logo().is_none());
        let err = sm.initialize(1.0, 1.0, materials.as_mut(), &BuiltinModelLoader).unwrap_err();
        assert!(matches!(err, SceneError::Disposed));
    }
}
