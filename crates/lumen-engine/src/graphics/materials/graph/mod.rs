//! Materials built as typed expression graphs and lowered to WGSL.

mod codegen;
pub mod library;
mod node;

pub use codegen::lower;
pub use node::{BinaryOp, GraphError, Node, NodeGraph, NodeRef, UnaryOp};

use glam::Vec2;

use crate::graphics::animation::color::Rgb;

use super::{
    Backend, BlendMode, Fallback, GLOW, GRADIENT, GRADIENT_BACKGROUND, Material, MaterialError, MaterialManager,
    MaterialRegistry, validate,
};

const GRADIENT_FLAT: Rgb = Rgb::from_hex(0x7c3aed);
const GLOW_COLOR: Rgb = Rgb::from_hex(0x4dd0e1);

/// Lowers `graph` into a material named `name`.
pub fn build_material(name: &str, graph: &NodeGraph, blend: BlendMode) -> Result<Material, MaterialError> {
    let (source, layout) = lower(graph)?;
    validate(&source)?;
    Ok(Material::new(name, source, layout, graph.uniforms().clone(), blend))
}

/// [`MaterialManager`] over node graphs.
#[derive(Debug, Default)]
pub struct GraphMaterialManager {
    registry: MaterialRegistry,
}

impl GraphMaterialManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds `name` from the graph `build` returns, registering a flat
    /// material if building or lowering fails.
    pub fn create_from_graph(
        &mut self,
        name: &str,
        build: impl FnOnce() -> Result<NodeGraph, GraphError>,
        blend: BlendMode,
        fallback: Fallback,
    ) -> Option<&Material> {
        if self.registry.is_disposed() {
            return None;
        }
        let material = build()
            .map_err(MaterialError::from)
            .and_then(|graph| build_material(name, &graph, blend))
            .unwrap_or_else(|e| {
                log::warn!("material graph `{name}` failed ({e}); using flat fallback");
                fallback.flat(name, e.to_string())
            });
        self.registry.insert(material)
    }
}

impl MaterialManager for GraphMaterialManager {
    fn backend(&self) -> Backend {
        Backend::UniformGraph
    }

    fn registry(&self) -> &MaterialRegistry {
        &self.registry
    }

    fn registry_mut(&mut self) -> &mut MaterialRegistry {
        &mut self.registry
    }

    fn create_gradient_material(&mut self) -> Option<&Material> {
        let build = || library::gradient(Vec2::new(0.3, 0.7), Vec2::new(0.8, 0.2), 0.4);
        let fallback = Fallback { color: GRADIENT_FLAT, opacity: 1.0, blend: BlendMode::Opaque };
        self.create_from_graph(GRADIENT, build, BlendMode::Opaque, fallback)
    }

    fn create_glow_material(&mut self) -> Option<&Material> {
        let build = || library::glow(GLOW_COLOR, 0.6);
        let fallback = Fallback { color: GLOW_COLOR, opacity: 1.0, blend: BlendMode::Additive };
        self.create_from_graph(GLOW, build, BlendMode::Additive, fallback)
    }

    fn create_logo_gradient_material(&mut self, color1: Rgb, color2: Rgb, name: &str) -> Option<&Material> {
        let build = || library::logo_gradient(color1, color2);
        let fallback = Fallback { color: color1, opacity: 1.0, blend: BlendMode::Opaque };
        self.create_from_graph(name, build, BlendMode::Opaque, fallback)
    }

    /// Falls back to a fixed radial graph before going flat.
    fn create_gradient_background_material(&mut self) -> Option<&Material> {
        let build = || {
            library::gradient_background().or_else(|e| {
                log::warn!("gradient background graph failed ({e}); trying radial fallback");
                library::radial_fallback()
            })
        };
        let fallback = Fallback { color: Rgb::from_hex(0x1a1a2e), opacity: 1.0, blend: BlendMode::Opaque };
        self.create_from_graph(GRADIENT_BACKGROUND, build, BlendMode::Opaque, fallback)
    }
}
