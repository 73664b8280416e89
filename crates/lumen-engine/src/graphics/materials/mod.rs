//! Scene materials and the two backends that build them.
//!
//! Both backends register the same material names with the same uniform
//! names, so callers never branch on the backend once it is chosen.

mod material;
mod uniforms;
mod wgsl;

pub mod graph;
pub mod shader;

pub use material::{BlendMode, Fallback, Material, MaterialRegistry};
pub use uniforms::{UniformField, UniformKind, UniformLayout, UniformSet, UniformValue};
pub use wgsl::{module_source, validate};

use std::fmt;
use std::str::FromStr;

use crate::graphics::animation::color::Rgb;

use graph::{GraphError, GraphMaterialManager};
use shader::ShaderMaterialManager;

pub const GRADIENT: &str = "gradient";
pub const GLOW: &str = "glow";
pub const LOGO_GRADIENT_1: &str = "logoGradient1";
pub const LOGO_GRADIENT_2: &str = "logoGradient2";
pub const GRADIENT_BACKGROUND: &str = "gradientBackground";

/// Logo gradient color pairs, in [`LOGO_GRADIENT_1`], [`LOGO_GRADIENT_2`] order.
pub const LOGO_COLORS: [(Rgb, Rgb); 2] = [
    (Rgb::from_hex(0xbd34fe), Rgb::from_hex(0x41d1ff)),
    (Rgb::from_hex(0xffdd35), Rgb::from_hex(0xffa800)),
];

#[derive(Debug, thiserror::Error)]
pub enum MaterialError {
    #[error("unknown uniform `{0}`")]
    UnknownUniform(String),

    #[error("uniform `{name}` is {expected:?}, got {found:?}")]
    UniformKind {
        name: String,
        expected: UniformKind,
        found: UniformKind,
    },

    #[error("shader source has no `struct Uniforms` block")]
    MissingUniformStruct,

    #[error("shader source has no `fn shade` entry")]
    MissingShadeFn,

    #[error("malformed uniform field `{0}`")]
    MalformedField(String),

    #[error("uniform field `{field}` has unsupported type `{ty}`")]
    UnsupportedType { field: String, ty: String },

    #[error("uniform `{0}` is not declared by the shader")]
    Undeclared(String),

    #[error("declared uniform `{0}` has no initial value")]
    Uninitialized(String),

    #[error("shader does not compile: {0}")]
    Wgsl(String),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// How materials are described to the GPU.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum Backend {
    /// Hand-written WGSL per material.
    #[default]
    ShaderSource,
    /// Expression graphs lowered to WGSL.
    UniformGraph,
}

impl Backend {
    /// `true` selects the graph backend.
    pub fn from_flag(use_graph: bool) -> Self {
        if use_graph { Backend::UniformGraph } else { Backend::ShaderSource }
    }

    pub fn name(self) -> &'static str {
        match self {
            Backend::ShaderSource => "shader",
            Backend::UniformGraph => "graph",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown backend `{0}` (expected `shader` or `graph`)")]
pub struct ParseBackendError(String);

impl FromStr for Backend {
    type Err = ParseBackendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shader" | "webgl" => Ok(Backend::ShaderSource),
            "graph" | "webgpu" => Ok(Backend::UniformGraph),
            other => Err(ParseBackendError(other.to_string())),
        }
    }
}

/// Builds and owns the named scene materials.
///
/// `create_*` never fail: a material that cannot be built is registered as a
/// flat fallback instead. After [`dispose`](Self::dispose) every method is a
/// no-op and the constructors return `None`.
pub trait MaterialManager {
    fn backend(&self) -> Backend;

    fn registry(&self) -> &MaterialRegistry;

    fn registry_mut(&mut self) -> &mut MaterialRegistry;

    /// Background gradient, registered as [`GRADIENT`].
    fn create_gradient_material(&mut self) -> Option<&Material>;

    /// Additive halo, registered as [`GLOW`].
    fn create_glow_material(&mut self) -> Option<&Material>;

    /// Two-color logo gradient registered under `name`.
    fn create_logo_gradient_material(&mut self, color1: Rgb, color2: Rgb, name: &str) -> Option<&Material>;

    /// Alternative background, registered as [`GRADIENT_BACKGROUND`].
    fn create_gradient_background_material(&mut self) -> Option<&Material>;

    fn material(&self, name: &str) -> Option<&Material> {
        self.registry().get(name)
    }

    fn uniforms(&self, name: &str) -> Option<&UniformSet> {
        self.material(name).map(Material::uniforms)
    }

    /// Writes every update whose key the material declares. Unknown materials,
    /// unknown keys and mismatched kinds are skipped.
    fn update_material_uniforms(&mut self, name: &str, updates: &[(&str, UniformValue)]) {
        let Some(material) = self.registry_mut().get_mut(name) else {
            log::trace!("uniform update for missing material `{name}` ignored");
            return;
        };
        for (key, value) in updates {
            if let Err(e) = material.uniforms_mut().update(key, *value) {
                log::trace!("material `{name}`: {e}");
            }
        }
    }

    fn dispose(&mut self) {
        self.registry_mut().dispose();
    }

    fn is_disposed(&self) -> bool {
        self.registry().is_disposed()
    }
}

/// Picks the manager for `backend`. Called once at startup.
pub fn create_material_manager(backend: Backend) -> Box<dyn MaterialManager> {
    match backend {
        Backend::ShaderSource => Box::new(ShaderMaterialManager::new()),
        Backend::UniformGraph => Box::new(GraphMaterialManager::new()),
    }
}

#[cfg(test)]
mod tests {
    use glam::{Vec2, Vec3};

    use super::*;

    fn managers() -> Vec<Box<dyn MaterialManager>> {
        vec![
            create_material_manager(Backend::ShaderSource),
            create_material_manager(Backend::UniformGraph),
        ]
    }

    fn populate(m: &mut dyn MaterialManager) {
        m.create_gradient_material();
        m.create_glow_material();
        let [(a1, b1), (a2, b2)] = LOGO_COLORS;
        m.create_logo_gradient_material(a1, b1, LOGO_GRADIENT_1);
        m.create_logo_gradient_material(a2, b2, LOGO_GRADIENT_2);
    }

    // ── backend selection ─────────────────────────────────────────────────

    #[test]
    fn flag_selects_backend() {
        assert_eq!(Backend::from_flag(false), Backend::ShaderSource);
        assert_eq!(Backend::from_flag(true), Backend::UniformGraph);
        assert_eq!(create_material_manager(Backend::UniformGraph).backend(), Backend::UniformGraph);
    }

    #[test]
    fn backend_parses_names() {
        assert_eq!("shader".parse::<Backend>(), Ok(Backend::ShaderSource));
        assert_eq!(" Graph ".parse::<Backend>(), Ok(Backend::UniformGraph));
        assert!("vulkan".parse::<Backend>().is_err());
    }

    // ── uniform contract ──────────────────────────────────────────────────

    #[test]
    fn both_backends_expose_the_same_uniform_names() {
        let mut all = managers();
        for m in &mut all {
            populate(m.as_mut());
        }
        for name in [GRADIENT, GLOW, LOGO_GRADIENT_1, LOGO_GRADIENT_2] {
            let a: Vec<&str> = all[0].uniforms(name).unwrap().names().collect();
            let mut b: Vec<&str> = all[1].uniforms(name).unwrap().names().collect();
            let mut a_sorted = a.clone();
            a_sorted.sort_unstable();
            b.sort_unstable();
            assert_eq!(a_sorted, b, "{name}");
        }
    }

    #[test]
    fn gradient_declares_every_pushed_uniform() {
        for mut m in managers() {
            m.create_gradient_material();
            let u = m.uniforms(GRADIENT).unwrap();
            for key in [
                "color1",
                "color2",
                "accentColor1",
                "accentColor2",
                "radialPos1",
                "radialPos2",
                "time",
                "pulseIntensity",
            ] {
                assert!(u.contains(key), "{} lacks {key}", m.backend());
            }
        }
    }

    #[test]
    fn materials_build_without_fallback() {
        for mut m in managers() {
            populate(m.as_mut());
            m.create_gradient_background_material();
            for name in [GRADIENT, GLOW, LOGO_GRADIENT_1, LOGO_GRADIENT_2, GRADIENT_BACKGROUND] {
                let mat = m.material(name).unwrap();
                assert!(!mat.is_degraded(), "{} {name}: {:?}", m.backend(), mat.degraded_reason());
            }
        }
    }

    #[test]
    fn glow_is_additive() {
        for mut m in managers() {
            let blend = m.create_glow_material().unwrap().blend();
            assert_eq!(blend, BlendMode::Additive);
        }
    }

    // ── update_material_uniforms ──────────────────────────────────────────

    #[test]
    fn update_writes_known_uniforms() {
        for mut m in managers() {
            m.create_gradient_material();
            m.update_material_uniforms(
                GRADIENT,
                &[("time", UniformValue::Float(250.0)), ("radialPos1", Vec2::new(0.9, 0.1).into())],
            );
            let u = m.uniforms(GRADIENT).unwrap();
            assert_eq!(u.get("time"), Some(&UniformValue::Float(250.0)));
            assert_eq!(u.get("radialPos1"), Some(&UniformValue::Vec2(Vec2::new(0.9, 0.1))));
        }
    }

    #[test]
    fn update_unknown_material_or_key_changes_nothing() {
        for mut m in managers() {
            m.create_glow_material();
            let before = m.uniforms(GLOW).unwrap().clone();
            m.update_material_uniforms("nope", &[("glowIntensity", UniformValue::Float(9.0))]);
            m.update_material_uniforms(GLOW, &[("missing", UniformValue::Float(9.0))]);
            m.update_material_uniforms(GLOW, &[("glowIntensity", Vec3::ONE.into())]);
            assert_eq!(m.uniforms(GLOW), Some(&before));
        }
    }

    // ── dispose ───────────────────────────────────────────────────────────

    #[test]
    fn calls_after_dispose_are_no_ops() {
        for mut m in managers() {
            populate(m.as_mut());
            m.dispose();
            assert!(m.is_disposed());
            assert!(m.material(GRADIENT).is_none());
            assert!(m.create_gradient_material().is_none());
            assert!(m.create_glow_material().is_none());
            m.update_material_uniforms(GRADIENT, &[("time", UniformValue::Float(1.0))]);
            assert!(m.registry().is_empty());
            m.dispose();
            assert!(m.is_disposed());
        }
    }
}
