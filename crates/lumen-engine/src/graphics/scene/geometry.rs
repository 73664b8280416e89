//! Mesh geometry: planes and extruded outlines.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

use super::SceneError;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    pub const ATTRIBS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x2,
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }

    fn new(p: Vec3, uv: Vec2) -> Self {
        Self { position: p.to_array(), uv: uv.to_array() }
    }
}

/// Indexed triangle list. Front faces wind counter-clockwise.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Geometry {
    /// `width × height` plane centred on the origin, facing +Z. `uv` runs
    /// from (0, 0) bottom-left to (1, 1) top-right.
    pub fn plane(width: f32, height: f32) -> Self {
        let (hw, hh) = (width * 0.5, height * 0.5);
        let vertices = vec![
            Vertex::new(Vec3::new(-hw, hh, 0.0), Vec2::new(0.0, 1.0)),
            Vertex::new(Vec3::new(hw, hh, 0.0), Vec2::new(1.0, 1.0)),
            Vertex::new(Vec3::new(-hw, -hh, 0.0), Vec2::new(0.0, 0.0)),
            Vertex::new(Vec3::new(hw, -hh, 0.0), Vec2::new(1.0, 0.0)),
        ];
        Self { vertices, indices: vec![0, 2, 1, 2, 3, 1] }
    }

    /// Extrudes a simple polygon along Z, centred on `z = 0`.
    ///
    /// Caps map `uv` over the outline's bounding box; sides run `u` along the
    /// perimeter.
    pub fn prism(outline: &[Vec2], depth: f32) -> Result<Self, SceneError> {
        let tris = triangulate(outline).ok_or(SceneError::Outline(outline.len()))?;
        let ccw = signed_area(outline) > 0.0;
        let (min, max) = bounds_2d(outline);
        let extent = (max - min).max(Vec2::splat(f32::EPSILON));
        let cap_uv = |p: Vec2| (p - min) / extent;
        let hd = depth * 0.5;

        let mut g = Geometry::default();
        let n = outline.len() as u32;

        // Front cap.
        for &p in outline {
            g.vertices.push(Vertex::new(p.extend(hd), cap_uv(p)));
        }
        for [a, b, c] in &tris {
            g.indices.extend([*a as u32, *b as u32, *c as u32]);
        }
        // Back cap, reversed winding.
        for &p in outline {
            g.vertices.push(Vertex::new(p.extend(-hd), cap_uv(p)));
        }
        for [a, b, c] in &tris {
            g.indices.extend([n + *a as u32, n + *c as u32, n + *b as u32]);
        }

        // Sides.
        let perimeter: f32 = (0..outline.len())
            .map(|i| outline[i].distance(outline[(i + 1) % outline.len()]))
            .sum::<f32>()
            .max(f32::EPSILON);
        let mut run = 0.0;
        for i in 0..outline.len() {
            let (p, q) = (outline[i], outline[(i + 1) % outline.len()]);
            let (u0, u1) = (run / perimeter, (run + p.distance(q)) / perimeter);
            run += p.distance(q);

            let base = g.vertices.len() as u32;
            g.vertices.extend([
                Vertex::new(p.extend(hd), Vec2::new(u0, 1.0)),
                Vertex::new(q.extend(hd), Vec2::new(u1, 1.0)),
                Vertex::new(p.extend(-hd), Vec2::new(u0, 0.0)),
                Vertex::new(q.extend(-hd), Vec2::new(u1, 0.0)),
            ]);
            // Outward facing for a counter-clockwise outline.
            if ccw {
                g.indices.extend([base, base + 2, base + 1, base + 1, base + 2, base + 3]);
            } else {
                g.indices.extend([base, base + 1, base + 2, base + 1, base + 3, base + 2]);
            }
        }
        Ok(g)
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Axis-aligned bounds; zero for empty geometry.
    pub fn bounds(&self) -> (Vec3, Vec3) {
        let mut it = self.vertices.iter().map(|v| Vec3::from_array(v.position));
        let Some(first) = it.next() else {
            return (Vec3::ZERO, Vec3::ZERO);
        };
        it.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)))
    }
}

fn bounds_2d(points: &[Vec2]) -> (Vec2, Vec2) {
    points.iter().fold(
        (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)),
        |(lo, hi), p| (lo.min(*p), hi.max(*p)),
    )
}

/// Shoelace area; positive for counter-clockwise outlines.
pub fn signed_area(outline: &[Vec2]) -> f32 {
    let n = outline.len();
    (0..n)
        .map(|i| outline[i].perp_dot(outline[(i + 1) % n]))
        .sum::<f32>()
        * 0.5
}

fn point_in_triangle(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    let d1 = (b - a).perp_dot(p - a);
    let d2 = (c - b).perp_dot(p - b);
    let d3 = (a - c).perp_dot(p - c);
    d1 >= 0.0 && d2 >= 0.0 && d3 >= 0.0
}

/// Ear-clipping triangulation of a simple polygon.
///
/// Triangles index into `outline` and wind counter-clockwise regardless of
/// the outline's orientation. `None` for degenerate or self-intersecting
/// input.
pub fn triangulate(outline: &[Vec2]) -> Option<Vec<[usize; 3]>> {
    const EPS: f32 = 1e-7;

    let n = outline.len();
    let area = signed_area(outline);
    if n < 3 || area.abs() <= EPS {
        return None;
    }
    let mut ring: Vec<usize> = if area > 0.0 { (0..n).collect() } else { (0..n).rev().collect() };
    let mut tris = Vec::with_capacity(n - 2);

    while ring.len() > 3 {
        let m = ring.len();
        let mut progressed = false;
        for i in 0..m {
            let (a, b, c) = (ring[(i + m - 1) % m], ring[i], ring[(i + 1) % m]);
            let (pa, pb, pc) = (outline[a], outline[b], outline[c]);
            let turn = (pb - pa).perp_dot(pc - pb);
            if turn.abs() <= EPS {
                // Collinear vertex: drop it.
                ring.remove(i);
                progressed = true;
                break;
            }
            if turn < 0.0 {
                continue;
            }
            let blocked = ring
                .iter()
                .filter(|&&k| k != a && k != b && k != c)
                .any(|&k| point_in_triangle(outline[k], pa, pb, pc));
            if blocked {
                continue;
            }
            tris.push([a, b, c]);
            ring.remove(i);
            progressed = true;
            break;
        }
        if !progressed {
            return None;
        }
    }
    let (pa, pb, pc) = (outline[ring[0]], outline[ring[1]], outline[ring[2]]);
    if (pb - pa).perp_dot(pc - pb).abs() > EPS {
        tris.push([ring[0], ring[1], ring[2]]);
    }
    Some(tris)
}
