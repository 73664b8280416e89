use glam::Vec4;

use crate::graphics::animation::color::Rgb;

use super::{UniformLayout, UniformSet};

/// How a material's fragments combine with the target.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum BlendMode {
    #[default]
    Opaque,
    /// Straight alpha over.
    Alpha,
    /// `src * a + dst`.
    Additive,
}

/// Color and opacity used when a material fails to build.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Fallback {
    pub color: Rgb,
    pub opacity: f32,
    pub blend: BlendMode,
}

impl Fallback {
    pub fn flat(self, name: &str, reason: impl Into<String>) -> Material {
        Material::flat(name, self.color, self.opacity, self.blend, reason)
    }
}

/// A compiled-to-WGSL material and its live uniform values.
///
/// `source` declares `struct Uniforms` and defines
/// `fn shade(uv: vec2<f32>) -> vec4<f32>`, reading uniforms through a
/// `material` binding the painter provides.
#[derive(Debug, Clone)]
pub struct Material {
    name: String,
    source: String,
    layout: UniformLayout,
    uniforms: UniformSet,
    blend: BlendMode,
    degraded: Option<String>,
}

const FLAT_SHADE: &str = "
fn shade(uv: vec2<f32>) -> vec4<f32> {
    return material.flatColor;
}
";

impl Material {
    pub fn new(
        name: &str,
        source: String,
        layout: UniformLayout,
        uniforms: UniformSet,
        blend: BlendMode,
    ) -> Self {
        Self {
            name: name.to_string(),
            source,
            layout,
            uniforms,
            blend,
            degraded: None,
        }
    }

    /// Single-color, non-animated stand-in for a material that failed to build.
    ///
    /// Only `flatColor` is declared, so updates to the original uniforms are
    /// ignored.
    pub fn flat(name: &str, color: Rgb, opacity: f32, blend: BlendMode, reason: impl Into<String>) -> Self {
        let uniforms = UniformSet::new().with("flatColor", color.to_linear().extend(opacity));
        let layout = UniformLayout::from_set(&uniforms);
        let source = format!("{}{FLAT_SHADE}", layout.wgsl_struct());
        Self {
            name: name.to_string(),
            source,
            layout,
            uniforms,
            blend,
            degraded: Some(reason.into()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// WGSL module fragment; also the pipeline cache key.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn layout(&self) -> &UniformLayout {
        &self.layout
    }

    pub fn uniforms(&self) -> &UniformSet {
        &self.uniforms
    }

    pub(crate) fn uniforms_mut(&mut self) -> &mut UniformSet {
        &mut self.uniforms
    }

    pub fn blend(&self) -> BlendMode {
        self.blend
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded.is_some()
    }

    pub fn degraded_reason(&self) -> Option<&str> {
        self.degraded.as_deref()
    }

    /// Current uniform block bytes.
    pub fn uniform_bytes(&self) -> Vec<u8> {
        self.layout.pack(&self.uniforms)
    }

    /// Flat color of a degraded material.
    pub fn flat_color(&self) -> Option<Vec4> {
        match self.uniforms.get("flatColor") {
            Some(super::UniformValue::Vec4(v)) if self.is_degraded() => Some(*v),
            _ => None,
        }
    }
}

/// Materials by name, in creation order.
#[derive(Debug, Default)]
pub struct MaterialRegistry {
    materials: Vec<Material>,
    disposed: bool,
}

impl MaterialRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `material`, replacing one with the same name in place.
    /// Returns `None` once disposed.
    pub fn insert(&mut self, material: Material) -> Option<&Material> {
        if self.disposed {
            log::debug!("material `{}` created after dispose, dropped", material.name);
            return None;
        }
        let idx = match self.materials.iter().position(|m| m.name == material.name) {
            Some(i) => {
                self.materials[i] = material;
                i
            }
            None => {
                self.materials.push(material);
                self.materials.len() - 1
            }
        };
        self.materials.get(idx)
    }

    pub fn get(&self, name: &str) -> Option<&Material> {
        self.materials.iter().find(|m| m.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Material> {
        self.materials.iter_mut().find(|m| m.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Material> {
        self.materials.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.materials.iter().map(|m| m.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Drops every material. Later inserts are refused.
    pub fn dispose(&mut self) {
        if !self.disposed {
            log::debug!("disposing {} material(s)", self.materials.len());
        }
        self.materials.clear();
        self.disposed = true;
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

#[cfg(test)]
mod tests {
    use super::super::UniformValue;
    use super::*;

    fn plain(name: &str, t: f32) -> Material {
        let uniforms = UniformSet::new().with("time", t);
        let layout = UniformLayout::from_set(&uniforms);
        Material::new(name, String::new(), layout, uniforms, BlendMode::Opaque)
    }

    // ── Material::flat ────────────────────────────────────────────────────

    #[test]
    fn flat_declares_only_its_color() {
        let m = Material::flat("gradient", Rgb::from_hex(0x1a1a2e), 0.8, BlendMode::Alpha, "boom");
        assert!(m.is_degraded());
        assert_eq!(m.degraded_reason(), Some("boom"));
        assert_eq!(m.uniforms().len(), 1);
        assert!(m.source().contains("struct Uniforms"));
        assert!(m.source().contains("fn shade"));
        assert!((m.flat_color().unwrap().w - 0.8).abs() < 1e-6);
    }

    #[test]
    fn flat_ignores_animated_uniforms() {
        let mut m = Material::flat("glow", Rgb::from_hex(0x4dd0e1), 0.4, BlendMode::Additive, "x");
        assert!(m.uniforms_mut().update("glowIntensity", UniformValue::Float(1.0)).is_err());
    }

    #[test]
    fn uniform_bytes_follow_layout() {
        let m = plain("a", 2.5);
        let bytes = m.uniform_bytes();
        assert_eq!(bytes.len(), 16);
        assert_eq!(f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]), 2.5);
    }

    // ── MaterialRegistry ──────────────────────────────────────────────────

    #[test]
    fn insert_keeps_creation_order_and_replaces_in_place() {
        let mut reg = MaterialRegistry::new();
        reg.insert(plain("a", 1.0));
        reg.insert(plain("b", 2.0));
        reg.insert(plain("a", 3.0));
        assert_eq!(reg.names().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(reg.get("a").unwrap().uniforms().get("time"), Some(&UniformValue::Float(3.0)));
    }

    #[test]
    fn dispose_refuses_later_inserts() {
        let mut reg = MaterialRegistry::new();
        reg.insert(plain("a", 1.0));
        reg.dispose();
        assert!(reg.is_empty());
        assert!(reg.insert(plain("b", 1.0)).is_none());
        assert!(reg.get("b").is_none());
    }
}
