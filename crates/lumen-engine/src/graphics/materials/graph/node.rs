//! Typed expression graph for material shading.
//!
//! Nodes live in an arena and only reference earlier nodes, so arena order is
//! a valid evaluation order. Every builder call checks operand types
//! immediately, so a graph that finished building is well-typed.

use glam::{Vec2, Vec3};

use super::super::{UniformKind, UniformSet, UniformValue};

/// Handle to a node inside one [`NodeGraph`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct NodeRef(pub(super) usize);

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum UnaryOp {
    Sin,
    Length,
    OneMinus,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Max,
    Distance,
}

impl BinaryOp {
    pub fn name(self) -> &'static str {
        match self {
            BinaryOp::Add => "add",
            BinaryOp::Sub => "sub",
            BinaryOp::Mul => "mul",
            BinaryOp::Div => "div",
            BinaryOp::Pow => "pow",
            BinaryOp::Max => "max",
            BinaryOp::Distance => "distance",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Constant(UniformValue),
    Uniform(String),
    Uv,
    Unary(UnaryOp, NodeRef),
    Binary(BinaryOp, NodeRef, NodeRef),
    Mix { a: NodeRef, b: NodeRef, t: NodeRef },
    Smoothstep { low: NodeRef, high: NodeRef, x: NodeRef },
    Swizzle(NodeRef, String),
    Vec4 { rgb: NodeRef, a: NodeRef },
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    #[error("`{op}` cannot combine {lhs:?} with {rhs:?}")]
    TypeMismatch {
        op: &'static str,
        lhs: UniformKind,
        rhs: UniformKind,
    },

    #[error("uniform `{0}` declared twice")]
    DuplicateUniform(String),

    #[error("invalid swizzle `.{pattern}` on {kind:?}")]
    Swizzle { pattern: String, kind: UniformKind },

    #[error("node {0} does not belong to this graph")]
    ForeignNode(usize),

    #[error("constant {0} is not finite")]
    NonFinite(f32),

    #[error("graph has no output")]
    NoOutput,

    #[error("output must be vec4, got {0:?}")]
    OutputKind(UniformKind),
}

/// Expression arena plus the initial values of its uniforms.
#[derive(Debug, Clone, Default)]
pub struct NodeGraph {
    nodes: Vec<(Node, UniformKind)>,
    uniforms: UniformSet,
    output: Option<NodeRef>,
}

impl NodeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, node: Node, kind: UniformKind) -> NodeRef {
        self.nodes.push((node, kind));
        NodeRef(self.nodes.len() - 1)
    }

    pub fn kind(&self, node: NodeRef) -> Result<UniformKind, GraphError> {
        self.nodes.get(node.0).map(|(_, k)| *k).ok_or(GraphError::ForeignNode(node.0))
    }

    pub fn node(&self, node: NodeRef) -> Option<&Node> {
        self.nodes.get(node.0).map(|(n, _)| n)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Initial values of every declared uniform, in declaration order.
    pub fn uniforms(&self) -> &UniformSet {
        &self.uniforms
    }

    pub fn output(&self) -> Option<NodeRef> {
        self.output
    }

    // ── leaves ────────────────────────────────────────────────────────────

    pub fn float(&mut self, v: f32) -> NodeRef {
        self.push(Node::Constant(UniformValue::Float(v)), UniformKind::Float)
    }

    pub fn vec2(&mut self, x: f32, y: f32) -> NodeRef {
        self.push(Node::Constant(UniformValue::Vec2(Vec2::new(x, y))), UniformKind::Vec2)
    }

    pub fn vec3(&mut self, x: f32, y: f32, z: f32) -> NodeRef {
        self.push(Node::Constant(UniformValue::Vec3(Vec3::new(x, y, z))), UniformKind::Vec3)
    }

    pub fn uv(&mut self) -> NodeRef {
        self.push(Node::Uv, UniformKind::Vec2)
    }

    /// Declares a named uniform; its type is the type of `initial`.
    pub fn uniform(&mut self, name: &str, initial: impl Into<UniformValue>) -> Result<NodeRef, GraphError> {
        if self.uniforms.contains(name) {
            return Err(GraphError::DuplicateUniform(name.to_string()));
        }
        let initial = initial.into();
        self.uniforms.insert(name, initial);
        Ok(self.push(Node::Uniform(name.to_string()), initial.kind()))
    }

    // ── operators ─────────────────────────────────────────────────────────

    fn unary(&mut self, op: UnaryOp, arg: NodeRef) -> Result<NodeRef, GraphError> {
        let kind = match (op, self.kind(arg)?) {
            (UnaryOp::Length, _) => UniformKind::Float,
            (_, k) => k,
        };
        Ok(self.push(Node::Unary(op, arg), kind))
    }

    pub fn sin(&mut self, arg: NodeRef) -> Result<NodeRef, GraphError> {
        self.unary(UnaryOp::Sin, arg)
    }

    pub fn length(&mut self, arg: NodeRef) -> Result<NodeRef, GraphError> {
        self.unary(UnaryOp::Length, arg)
    }

    /// `1 - arg`.
    pub fn one_minus(&mut self, arg: NodeRef) -> Result<NodeRef, GraphError> {
        self.unary(UnaryOp::OneMinus, arg)
    }

    fn binary(&mut self, op: BinaryOp, lhs: NodeRef, rhs: NodeRef) -> Result<NodeRef, GraphError> {
        let (l, r) = (self.kind(lhs)?, self.kind(rhs)?);
        let mismatch = GraphError::TypeMismatch { op: op.name(), lhs: l, rhs: r };
        let kind = match op {
            // Arithmetic broadcasts a scalar over a vector.
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => match (l, r) {
                _ if l == r => l,
                (UniformKind::Float, v) | (v, UniformKind::Float) => v,
                _ => return Err(mismatch),
            },
            BinaryOp::Pow | BinaryOp::Max if l == r => l,
            BinaryOp::Distance if l == r => UniformKind::Float,
            _ => return Err(mismatch),
        };
        Ok(self.push(Node::Binary(op, lhs, rhs), kind))
    }

    pub fn add(&mut self, a: NodeRef, b: NodeRef) -> Result<NodeRef, GraphError> {
        self.binary(BinaryOp::Add, a, b)
    }

    pub fn sub(&mut self, a: NodeRef, b: NodeRef) -> Result<NodeRef, GraphError> {
        self.binary(BinaryOp::Sub, a, b)
    }

    pub fn mul(&mut self, a: NodeRef, b: NodeRef) -> Result<NodeRef, GraphError> {
        self.binary(BinaryOp::Mul, a, b)
    }

    pub fn div(&mut self, a: NodeRef, b: NodeRef) -> Result<NodeRef, GraphError> {
        self.binary(BinaryOp::Div, a, b)
    }

    pub fn pow(&mut self, a: NodeRef, b: NodeRef) -> Result<NodeRef, GraphError> {
        self.binary(BinaryOp::Pow, a, b)
    }

    pub fn max(&mut self, a: NodeRef, b: NodeRef) -> Result<NodeRef, GraphError> {
        self.binary(BinaryOp::Max, a, b)
    }

    pub fn distance(&mut self, a: NodeRef, b: NodeRef) -> Result<NodeRef, GraphError> {
        self.binary(BinaryOp::Distance, a, b)
    }

    /// `a * k` for a constant `k`.
    pub fn scale(&mut self, a: NodeRef, k: f32) -> Result<NodeRef, GraphError> {
        let k = self.float(k);
        self.mul(a, k)
    }

    /// `a + k` for a constant `k`.
    pub fn offset(&mut self, a: NodeRef, k: f32) -> Result<NodeRef, GraphError> {
        let k = self.float(k);
        self.add(a, k)
    }

    /// `mix(a, b, t)`; `t` is a scalar or matches `a`.
    pub fn mix(&mut self, a: NodeRef, b: NodeRef, t: NodeRef) -> Result<NodeRef, GraphError> {
        let (ka, kb, kt) = (self.kind(a)?, self.kind(b)?, self.kind(t)?);
        if ka != kb {
            return Err(GraphError::TypeMismatch { op: "mix", lhs: ka, rhs: kb });
        }
        if kt != UniformKind::Float && kt != ka {
            return Err(GraphError::TypeMismatch { op: "mix", lhs: ka, rhs: kt });
        }
        Ok(self.push(Node::Mix { a, b, t }, ka))
    }

    pub fn smoothstep(&mut self, low: NodeRef, high: NodeRef, x: NodeRef) -> Result<NodeRef, GraphError> {
        let (kl, kh, kx) = (self.kind(low)?, self.kind(high)?, self.kind(x)?);
        if kl != kh || kl != kx {
            let rhs = if kl != kh { kh } else { kx };
            return Err(GraphError::TypeMismatch { op: "smoothstep", lhs: kl, rhs });
        }
        Ok(self.push(Node::Smoothstep { low, high, x }, kx))
    }

    /// Component selection such as `.x` or `.xyz`.
    pub fn swizzle(&mut self, arg: NodeRef, pattern: &str) -> Result<NodeRef, GraphError> {
        let kind = self.kind(arg)?;
        let bad = || GraphError::Swizzle { pattern: pattern.to_string(), kind };
        let width = kind.components();
        let valid = kind != UniformKind::Float
            && (1..=4).contains(&pattern.len())
            && pattern.chars().all(|c| "xyzw".find(c).is_some_and(|i| i < width));
        if !valid {
            return Err(bad());
        }
        let out = match pattern.len() {
            1 => UniformKind::Float,
            2 => UniformKind::Vec2,
            3 => UniformKind::Vec3,
            _ => UniformKind::Vec4,
        };
        Ok(self.push(Node::Swizzle(arg, pattern.to_string()), out))
    }

    /// `vec4(rgb, a)`.
    pub fn vec4(&mut self, rgb: NodeRef, a: NodeRef) -> Result<NodeRef, GraphError> {
        let (kr, ka) = (self.kind(rgb)?, self.kind(a)?);
        if kr != UniformKind::Vec3 || ka != UniformKind::Float {
            return Err(GraphError::TypeMismatch { op: "vec4", lhs: kr, rhs: ka });
        }
        Ok(self.push(Node::Vec4 { rgb, a }, UniformKind::Vec4))
    }

    /// Marks the fragment color. Must be a `vec4`.
    pub fn set_output(&mut self, node: NodeRef) -> Result<(), GraphError> {
        match self.kind(node)? {
            UniformKind::Vec4 => {
                self.output = Some(node);
                Ok(())
            }
            other => Err(GraphError::OutputKind(other)),
        }
    }
}
