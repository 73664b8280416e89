//! Lowers a [`NodeGraph`] to a WGSL `shade` function.

use std::fmt::Write as _;

use super::super::{UniformLayout, UniformValue};
use super::node::{BinaryOp, GraphError, Node, NodeGraph, NodeRef, UnaryOp};

/// WGSL source declaring `struct Uniforms` and `fn shade`, plus the layout of
/// the uniform block.
pub fn lower(graph: &NodeGraph) -> Result<(String, UniformLayout), GraphError> {
    let output = graph.output().ok_or(GraphError::NoOutput)?;
    let live = live_nodes(graph, output)?;

    let layout = UniformLayout::from_set(graph.uniforms());
    let mut src = layout.wgsl_struct();
    src.push_str("\nfn shade(uv: vec2<f32>) -> vec4<f32> {\n");

    for idx in (0..graph.len()).filter(|&i| live[i]) {
        let node = NodeRef(idx);
        let Some(n) = graph.node(node) else { continue };
        if is_inline(n) {
            continue;
        }
        let expr = expression(graph, n)?;
        let _ = writeln!(src, "    let n{idx} = {expr};");
    }
    let _ = writeln!(src, "    return {};", operand(graph, output)?);
    src.push_str("}\n");
    Ok((src, layout))
}

/// Marks nodes reachable from `output`. Operands always precede their users.
fn live_nodes(graph: &NodeGraph, output: NodeRef) -> Result<Vec<bool>, GraphError> {
    let mut live = vec![false; graph.len()];
    *live.get_mut(output.0).ok_or(GraphError::ForeignNode(output.0))? = true;
    for idx in (0..graph.len()).rev() {
        if !live[idx] {
            continue;
        }
        let Some(n) = graph.node(NodeRef(idx)) else { continue };
        for dep in operands(n) {
            *live.get_mut(dep.0).ok_or(GraphError::ForeignNode(dep.0))? = true;
        }
    }
    Ok(live)
}

fn operands(n: &Node) -> Vec<NodeRef> {
    match n {
        Node::Constant(_) | Node::Uniform(_) | Node::Uv => Vec::new(),
        Node::Unary(_, a) | Node::Swizzle(a, _) => vec![*a],
        Node::Binary(_, a, b) | Node::Vec4 { rgb: a, a: b } => vec![*a, *b],
        Node::Mix { a, b, t } => vec![*a, *b, *t],
        Node::Smoothstep { low, high, x } => vec![*low, *high, *x],
    }
}

/// Leaves are written at their use sites instead of getting a `let`.
fn is_inline(n: &Node) -> bool {
    matches!(n, Node::Constant(_) | Node::Uniform(_) | Node::Uv)
}

fn operand(graph: &NodeGraph, node: NodeRef) -> Result<String, GraphError> {
    let n = graph.node(node).ok_or(GraphError::ForeignNode(node.0))?;
    if is_inline(n) { expression(graph, n) } else { Ok(format!("n{}", node.0)) }
}

fn float_literal(v: f32) -> Result<String, GraphError> {
    if !v.is_finite() {
        return Err(GraphError::NonFinite(v));
    }
    // `{:?}` keeps a decimal point on whole numbers.
    Ok(format!("{v:?}"))
}

fn constant(v: UniformValue) -> Result<String, GraphError> {
    let parts = |xs: &[f32]| -> Result<String, GraphError> {
        let lits = xs.iter().map(|x| float_literal(*x)).collect::<Result<Vec<_>, _>>()?;
        Ok(lits.join(", "))
    };
    Ok(match v {
        UniformValue::Float(x) => float_literal(x)?,
        UniformValue::Vec2(x) => format!("vec2<f32>({})", parts(&x.to_array())?),
        UniformValue::Vec3(x) => format!("vec3<f32>({})", parts(&x.to_array())?),
        UniformValue::Vec4(x) => format!("vec4<f32>({})", parts(&x.to_array())?),
    })
}

fn expression(graph: &NodeGraph, n: &Node) -> Result<String, GraphError> {
    let op = |r: &NodeRef| operand(graph, *r);
    Ok(match n {
        Node::Constant(v) => constant(*v)?,
        Node::Uniform(name) => format!("material.{name}"),
        Node::Uv => "uv".to_string(),
        Node::Unary(UnaryOp::Sin, a) => format!("sin({})", op(a)?),
        Node::Unary(UnaryOp::Length, a) => format!("length({})", op(a)?),
        Node::Unary(UnaryOp::OneMinus, a) => format!("1.0 - {}", op(a)?),
        Node::Binary(kind, a, b) => {
            let (a, b) = (op(a)?, op(b)?);
            match kind {
                BinaryOp::Add => format!("{a} + {b}"),
                BinaryOp::Sub => format!("{a} - {b}"),
                BinaryOp::Mul => format!("{a} * {b}"),
                BinaryOp::Div => format!("{a} / {b}"),
                BinaryOp::Pow => format!("pow({a}, {b})"),
                BinaryOp::Max => format!("max({a}, {b})"),
                BinaryOp::Distance => format!("distance({a}, {b})"),
            }
        }
        Node::Mix { a, b, t } => format!("mix({}, {}, {})", op(a)?, op(b)?, op(t)?),
        Node::Smoothstep { low, high, x } => {
            format!("smoothstep({}, {}, {})", op(low)?, op(high)?, op(x)?)
        }
        Node::Swizzle(a, pattern) => format!("{}.{pattern}", op(a)?),
        Node::Vec4 { rgb, a } => format!("vec4<f32>({}, {})", op(rgb)?, op(a)?),
    })
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    fn tinted() -> NodeGraph {
        let mut g = NodeGraph::new();
        let tint = g.uniform("tint", Vec3::new(1.0, 0.5, 0.0)).unwrap();
        let uv = g.uv();
        let center = g.vec2(0.5, 0.5);
        let d = g.distance(uv, center).unwrap();
        let fade = g.one_minus(d).unwrap();
        let out = g.vec4(tint, fade).unwrap();
        g.set_output(out).unwrap();
        g
    }

    // ── lower ─────────────────────────────────────────────────────────────

    #[test]
    fn emits_struct_lets_and_return() {
        let (src, layout) = lower(&tinted()).unwrap();
        assert!(src.starts_with("struct Uniforms {\n    tint: vec3<f32>,\n};"));
        assert!(src.contains("fn shade(uv: vec2<f32>) -> vec4<f32> {"));
        assert!(src.contains("let n3 = distance(uv, vec2<f32>(0.5, 0.5));"));
        assert!(src.contains("let n4 = 1.0 - n3;"));
        assert!(src.contains("let n5 = vec4<f32>(material.tint, n4);"));
        assert!(src.trim_end().ends_with("return n5;\n}"));
        assert_eq!(layout.size(), 16);
    }

    #[test]
    fn dead_nodes_are_not_emitted() {
        let mut g = tinted();
        let stray = g.float(3.0);
        g.sin(stray).unwrap();
        let (src, _) = lower(&g).unwrap();
        assert!(!src.contains("sin("));
    }

    #[test]
    fn whole_numbers_keep_a_decimal_point() {
        assert_eq!(float_literal(2.0).unwrap(), "2.0");
        assert_eq!(float_literal(0.001).unwrap(), "0.001");
        assert!(float_literal(f32::NAN).is_err());
    }

    #[test]
    fn missing_output_is_an_error() {
        let mut g = NodeGraph::new();
        g.uv();
        assert_eq!(lower(&g).unwrap_err(), GraphError::NoOutput);
    }

    #[test]
    fn non_finite_constants_fail_lowering() {
        let mut g = NodeGraph::new();
        let rgb = g.vec3(0.0, f32::INFINITY, 0.0);
        let a = g.float(1.0);
        let out = g.vec4(rgb, a).unwrap();
        g.set_output(out).unwrap();
        assert!(matches!(lower(&g), Err(GraphError::NonFinite(_))));
    }
}
