//! Whole-module checks for material WGSL.
//!
//! A material only supplies `struct Uniforms` and `fn shade`; the GPU sees it
//! joined to the shared mesh stage. Both are validated together with naga
//! before a material is registered, so a shader that would be rejected by
//! the device never reaches pipeline creation.

use wgpu::naga;

use super::MaterialError;

const SCENE_WGSL: &str = include_str!("../renderers/shaders/scene.wgsl");

/// The full module compiled for a material: mesh stage plus `material_source`.
pub fn module_source(material_source: &str) -> String {
    format!("{SCENE_WGSL}\n{material_source}")
}

/// Parses and validates the module built from `material_source`.
pub fn validate(material_source: &str) -> Result<(), MaterialError> {
    let source = module_source(material_source);
    let module = naga::front::wgsl::parse_str(&source).map_err(|e| MaterialError::Wgsl(e.message().to_string()))?;
    naga::valid::Validator::new(naga::valid::ValidationFlags::all(), naga::valid::Capabilities::default())
        .validate(&module)
        .map_err(|e| MaterialError::Wgsl(e.as_inner().to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::graphics::animation::color::Rgb;

    use super::super::{BlendMode, Material};
    use super::*;

    #[test]
    fn flat_material_compiles() {
        let m = Material::flat("x", Rgb::from_hex(0x41d1ff), 1.0, BlendMode::Opaque, "test");
        validate(m.source()).unwrap();
    }

    #[test]
    fn undefined_identifier_is_rejected() {
        let src = "struct Uniforms { a: f32, };\nfn shade(uv: vec2<f32>) -> vec4<f32> { return oops; }\n";
        assert!(matches!(validate(src), Err(MaterialError::Wgsl(_))));
    }

    #[test]
    fn wrong_return_type_is_rejected() {
        let src = "struct Uniforms { a: f32, };\nfn shade(uv: vec2<f32>) -> vec4<f32> { return material.a; }\n";
        assert!(validate(src).is_err());
    }

    #[test]
    fn module_source_puts_mesh_stage_first() {
        let full = module_source("// material");
        assert!(full.contains("fn vs_main"));
        assert!(full.trim_end().ends_with("// material"));
    }
}
