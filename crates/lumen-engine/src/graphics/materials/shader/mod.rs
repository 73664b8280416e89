//! Materials from hand-written WGSL.

mod parse;

pub use parse::{check_uniforms, parse_uniform_struct};

use glam::Vec2;

use crate::graphics::animation::color::Rgb;

use super::{
    Backend, BlendMode, Fallback, GLOW, GRADIENT, GRADIENT_BACKGROUND, Material, MaterialError, MaterialManager,
    MaterialRegistry, UniformLayout, UniformSet, validate,
};

const GRADIENT_WGSL: &str = include_str!("shaders/gradient.wgsl");
const GLOW_WGSL: &str = include_str!("shaders/glow.wgsl");
const LOGO_GRADIENT_WGSL: &str = include_str!("shaders/logo_gradient.wgsl");

const BACKGROUND_FLAT: Rgb = Rgb::from_hex(0x1a1a2e);
const GLOW_COLOR: Rgb = Rgb::from_hex(0x4dd0e1);

/// Validates `source` against `initial` and returns its layout.
pub fn compile(source: &str, initial: &UniformSet) -> Result<UniformLayout, MaterialError> {
    let layout = parse_uniform_struct(source)?;
    check_uniforms(&layout, initial)?;
    validate(source)?;
    Ok(layout)
}

/// [`MaterialManager`] over WGSL source text.
#[derive(Debug, Default)]
pub struct ShaderMaterialManager {
    registry: MaterialRegistry,
}

impl ShaderMaterialManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds `name` from `source`, registering a flat material on failure.
    pub fn create_from_source(
        &mut self,
        name: &str,
        source: &str,
        initial: UniformSet,
        blend: BlendMode,
        fallback: Fallback,
    ) -> Option<&Material> {
        if self.registry.is_disposed() {
            return None;
        }
        let material = match compile(source, &initial) {
            Ok(layout) => Material::new(name, source.to_string(), layout, initial, blend),
            Err(e) => {
                log::warn!("material `{name}` failed to build ({e}); using flat fallback");
                fallback.flat(name, e.to_string())
            }
        };
        self.registry.insert(material)
    }

    fn gradient_uniforms(radial1: Vec2, radial2: Vec2, pulse: f32) -> UniformSet {
        UniformSet::new()
            .with("color1", Rgb::from_hex(0x1a1a2e).to_linear())
            .with("color2", Rgb::from_hex(0x16213e).to_linear())
            .with("accentColor1", Rgb::from_hex(0x41d1ff).to_linear())
            .with("accentColor2", Rgb::from_hex(0xbd34fe).to_linear())
            .with("radialPos1", radial1)
            .with("radialPos2", radial2)
            .with("time", 0.0_f32)
            .with("pulseIntensity", pulse)
    }
}

impl MaterialManager for ShaderMaterialManager {
    fn backend(&self) -> Backend {
        Backend::ShaderSource
    }

    fn registry(&self) -> &MaterialRegistry {
        &self.registry
    }

    fn registry_mut(&mut self) -> &mut MaterialRegistry {
        &mut self.registry
    }

    fn create_gradient_material(&mut self) -> Option<&Material> {
        let initial = Self::gradient_uniforms(Vec2::new(0.2, 0.5), Vec2::new(0.8, 0.5), 0.6);
        let fallback = Fallback { color: BACKGROUND_FLAT, opacity: 0.8, blend: BlendMode::Alpha };
        self.create_from_source(GRADIENT, GRADIENT_WGSL, initial, BlendMode::Opaque, fallback)
    }

    fn create_glow_material(&mut self) -> Option<&Material> {
        let initial = UniformSet::new()
            .with("glowColor", GLOW_COLOR.to_linear())
            .with("glowIntensity", 0.4_f32);
        let fallback = Fallback { color: GLOW_COLOR, opacity: 0.4, blend: BlendMode::Alpha };
        self.create_from_source(GLOW, GLOW_WGSL, initial, BlendMode::Additive, fallback)
    }

    fn create_logo_gradient_material(&mut self, color1: Rgb, color2: Rgb, name: &str) -> Option<&Material> {
        let initial = UniformSet::new()
            .with("color1", color1.to_linear())
            .with("color2", color2.to_linear())
            .with("time", 1.0_f32)
            .with("gradientDirection", 0.7_f32);
        let fallback = Fallback { color: color1, opacity: 1.0, blend: BlendMode::Opaque };
        self.create_from_source(name, LOGO_GRADIENT_WGSL, initial, BlendMode::Opaque, fallback)
    }

    /// Same shader as the gradient, with both focus points centred.
    fn create_gradient_background_material(&mut self) -> Option<&Material> {
        log::debug!("creating shader gradient background");
        let initial = Self::gradient_uniforms(Vec2::splat(0.5), Vec2::splat(0.5), 0.3);
        let fallback = Fallback { color: BACKGROUND_FLAT, opacity: 0.8, blend: BlendMode::Alpha };
        self.create_from_source(GRADIENT_BACKGROUND, GRADIENT_WGSL, initial, BlendMode::Opaque, fallback)
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::super::UniformValue;
    use super::*;

    const OPAQUE_BLACK: Fallback = Fallback { color: Rgb::BLACK, opacity: 1.0, blend: BlendMode::Opaque };

    // ── built-in materials ────────────────────────────────────────────────

    #[test]
    fn gradient_defaults() {
        let mut m = ShaderMaterialManager::new();
        let mat = m.create_gradient_material().unwrap();
        assert_eq!(mat.uniforms().get("pulseIntensity"), Some(&UniformValue::Float(0.6)));
        assert_eq!(mat.uniforms().get("radialPos2"), Some(&UniformValue::Vec2(Vec2::new(0.8, 0.5))));
        assert_eq!(mat.blend(), BlendMode::Opaque);
        assert_eq!(mat.layout().size(), 96);
    }

    #[test]
    fn background_reuses_gradient_shader_with_centred_focus() {
        let mut m = ShaderMaterialManager::new();
        let source = m.create_gradient_background_material().unwrap().source().to_string();
        assert_eq!(source, GRADIENT_WGSL);
        let u = m.uniforms(GRADIENT_BACKGROUND).unwrap();
        assert_eq!(u.get("radialPos1"), Some(&UniformValue::Vec2(Vec2::splat(0.5))));
        assert_eq!(u.get("pulseIntensity"), Some(&UniformValue::Float(0.3)));
    }

    #[test]
    fn logo_materials_are_independent() {
        let mut m = ShaderMaterialManager::new();
        m.create_logo_gradient_material(Rgb::from_hex(0xbd34fe), Rgb::from_hex(0x41d1ff), "a");
        m.create_logo_gradient_material(Rgb::from_hex(0xffdd35), Rgb::from_hex(0xffa800), "b");
        m.update_material_uniforms("a", &[("time", UniformValue::Float(42.0))]);
        assert_eq!(m.uniforms("a").unwrap().get("time"), Some(&UniformValue::Float(42.0)));
        assert_eq!(m.uniforms("b").unwrap().get("time"), Some(&UniformValue::Float(1.0)));
    }

    // ── fallback ──────────────────────────────────────────────────────────

    #[test]
    fn broken_source_degrades_to_flat() {
        let mut m = ShaderMaterialManager::new();
        let initial = UniformSet::new().with("tint", Vec3::ONE);
        let mat = m
            .create_from_source("broken", "fn shade(uv: vec2<f32>) -> vec4<f32> {}", initial, BlendMode::Opaque, OPAQUE_BLACK)
            .unwrap();
        assert!(mat.is_degraded());
        assert!(!mat.uniforms().contains("tint"));
    }

    #[test]
    fn invalid_shade_body_degrades_to_flat() {
        let mut m = ShaderMaterialManager::new();
        let source = "struct Uniforms {\n    a: f32,\n};\nfn shade(uv: vec2<f32>) -> vec4<f32> {\n    return oops;\n}\n";
        let initial = UniformSet::new().with("a", 1.0_f32);
        let mat = m.create_from_source("typo", source, initial, BlendMode::Opaque, OPAQUE_BLACK).unwrap();
        assert!(mat.is_degraded());
        assert!(mat.degraded_reason().unwrap().starts_with("shader does not compile"));
        assert!(mat.uniforms().contains("flatColor"));
    }

    #[test]
    fn logo_source_compiles_with_mesh_stage() {
        let mut m = ShaderMaterialManager::new();
        let mat = m.create_logo_gradient_material(Rgb::from_hex(0xbd34fe), Rgb::from_hex(0x41d1ff), "logo").unwrap();
        assert!(!mat.is_degraded(), "{:?}", mat.degraded_reason());
    }

    #[test]
    fn undeclared_initial_uniform_degrades() {
        let mut m = ShaderMaterialManager::new();
        let initial = UniformSet::new()
            .with("glowColor", Vec3::ONE)
            .with("glowIntensity", 0.4_f32)
            .with("extra", 1.0_f32);
        let mat = m.create_from_source("g", GLOW_WGSL, initial, BlendMode::Additive, OPAQUE_BLACK).unwrap();
        assert!(mat.degraded_reason().unwrap().contains("extra"));
    }

    #[test]
    fn degraded_material_still_accepts_updates_silently() {
        let mut m = ShaderMaterialManager::new();
        m.create_from_source("broken", "", UniformSet::new(), BlendMode::Opaque, OPAQUE_BLACK);
        let before = m.uniforms("broken").unwrap().clone();
        m.update_material_uniforms("broken", &[("time", UniformValue::Float(3.0))]);
        assert_eq!(m.uniforms("broken"), Some(&before));
    }
}
