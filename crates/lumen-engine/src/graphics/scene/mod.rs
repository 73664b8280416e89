//! The logo scene: geometry, scene graph, model loading and the manager that
//! assembles them.

mod geometry;
mod graph;
mod manager;
mod model;

pub use geometry::{Geometry, Vertex, signed_area, triangulate};
pub use graph::{DrawMesh, GeometryId, Light, Mesh, Node, NodeId, NodeKind, PerspectiveCamera, Scene, Transform};
pub use manager::{SceneManager, SceneOptions};
pub use model::{BuiltinModelLoader, LOGO_MODEL, Model, ModelLoader, ModelPart};

#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("model `{0}` not found")]
    ModelNotFound(String),

    #[error("outline with {0} point(s) cannot be triangulated")]
    Outline(usize),

    #[error("scene manager already disposed")]
    Disposed,
}
