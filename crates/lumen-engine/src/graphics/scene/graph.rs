//! Minimal 3D scene graph: transforms, meshes, lights and a perspective camera.

use glam::{EulerRot, Mat3, Mat4, Quat, Vec3};

use crate::graphics::animation::color::Rgb;

use super::geometry::Geometry;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct GeometryId(usize);

/// Translation, XYZ Euler rotation (radians) and per-axis scale.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self { position: Vec3::ZERO, rotation: Vec3::ZERO, scale: Vec3::ONE }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self { position, ..Self::default() }
    }

    pub fn quat(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }

    /// Local-to-parent matrix: scale, then rotate, then translate.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.quat(), self.position)
    }

    /// Rotates so local +Z points at `target`. No-op when `target` coincides
    /// with the position.
    pub fn look_at(&mut self, target: Vec3) {
        let z = target - self.position;
        if z.length_squared() <= f32::EPSILON {
            return;
        }
        let z = z.normalize();
        let mut x = Vec3::Y.cross(z);
        if x.length_squared() <= f32::EPSILON {
            // Looking straight up or down: pick another up vector.
            x = Vec3::Z.cross(z);
        }
        let x = x.normalize();
        let y = z.cross(x);
        let q = Quat::from_mat3(&Mat3::from_cols(x, y, z));
        let (rx, ry, rz) = q.to_euler(EulerRot::XYZ);
        self.rotation = Vec3::new(rx, ry, rz);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub geometry: GeometryId,
    /// Name of the material in the material manager.
    pub material: String,
    pub visible: bool,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Light {
    Directional { color: Rgb, intensity: f32 },
    Ambient { color: Rgb, intensity: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Group,
    Mesh(Mesh),
    Light(Light),
}

#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub transform: Transform,
    pub kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn new(name: &str, kind: NodeKind) -> Self {
        Self {
            name: name.to_string(),
            transform: Transform::default(),
            kind,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn mesh(&self) -> Option<&Mesh> {
        match &self.kind {
            NodeKind::Mesh(m) => Some(m),
            _ => None,
        }
    }
}

/// A mesh ready to draw: world matrix plus what to draw it with.
#[derive(Debug, Clone)]
pub struct DrawMesh<'a> {
    pub node: NodeId,
    pub world: Mat4,
    pub geometry: GeometryId,
    pub material: &'a str,
}

/// Node arena plus shared geometry.
///
/// `generation` changes whenever geometry is added or the scene is cleared,
/// so GPU caches keyed on it know when to rebuild.
#[derive(Debug, Default)]
pub struct Scene {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
    geometries: Vec<Geometry>,
    generation: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_geometry(&mut self, geometry: Geometry) -> GeometryId {
        self.geometries.push(geometry);
        self.generation += 1;
        GeometryId(self.geometries.len() - 1)
    }

    pub fn geometry(&self, id: GeometryId) -> Option<&Geometry> {
        self.geometries.get(id.0)
    }

    pub fn geometries(&self) -> impl Iterator<Item = (GeometryId, &Geometry)> {
        self.geometries.iter().enumerate().map(|(i, g)| (GeometryId(i), g))
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Adds `node` under `parent`, or as a root. An unknown parent makes it a root.
    pub fn add(&mut self, mut node: Node, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        let parent = parent.filter(|p| p.0 < self.nodes.len());
        node.parent = parent;
        node.children.clear();
        self.nodes.push(node);
        match parent {
            Some(p) => self.nodes[p.0].children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    pub fn transform_mut(&mut self, id: NodeId) -> Option<&mut Transform> {
        self.get_mut(id).map(|n| &mut n.transform)
    }

    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.traverse().into_iter().find(|id| self.nodes[id.0].name == name)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Depth-first pre-order over every node.
    pub fn traverse(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            if let Some(n) = self.nodes.get(id.0) {
                stack.extend(n.children.iter().rev().copied());
            }
        }
        out
    }

    /// Pre-order from `root` over the subtree.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(n) = self.nodes.get(id.0) else { continue };
            out.push(id);
            stack.extend(n.children.iter().rev().copied());
        }
        out
    }

    pub fn world_matrix(&self, id: NodeId) -> Option<Mat4> {
        let mut m = self.nodes.get(id.0)?.transform.matrix();
        let mut cur = self.nodes[id.0].parent;
        while let Some(p) = cur {
            let node = &self.nodes[p.0];
            m = node.transform.matrix() * m;
            cur = node.parent;
        }
        Some(m)
    }

    /// Visible meshes in traversal order. Meshes under an invisible mesh are
    /// still drawn.
    pub fn draw_list(&self) -> Vec<DrawMesh<'_>> {
        let mut out = Vec::new();
        let mut stack: Vec<(NodeId, Mat4)> = self.roots.iter().rev().map(|r| (*r, Mat4::IDENTITY)).collect();
        while let Some((id, parent)) = stack.pop() {
            let node = &self.nodes[id.0];
            let world = parent * node.transform.matrix();
            if let NodeKind::Mesh(mesh) = &node.kind {
                if mesh.visible {
                    out.push(DrawMesh {
                        node: id,
                        world,
                        geometry: mesh.geometry,
                        material: &mesh.material,
                    });
                }
            }
            stack.extend(node.children.iter().rev().map(|c| (*c, world)));
        }
        out
    }

    pub fn lights(&self) -> impl Iterator<Item = (NodeId, &Light)> {
        self.nodes.iter().enumerate().filter_map(|(i, n)| match &n.kind {
            NodeKind::Light(l) => Some((NodeId(i), l)),
            _ => None,
        })
    }

    /// Removes every node and geometry.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.roots.clear();
        self.geometries.clear();
        self.generation += 1;
    }
}

/// Right-handed perspective camera looking down its local -Z.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PerspectiveCamera {
    /// Vertical field of view in degrees.
    pub fov_deg: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self {
            fov_deg: 45.0,
            aspect: 1.0,
            near: 0.1,
            far: 1000.0,
            position: Vec3::new(0.0, 0.0, 5.0),
        }
    }
}

impl PerspectiveCamera {
    /// Ignores non-positive or non-finite sizes.
    pub fn set_aspect(&mut self, width: f32, height: f32) {
        let aspect = width / height;
        if height > 0.0 && aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, Vec3::NEG_Z, Vec3::Y)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_deg.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }
}
