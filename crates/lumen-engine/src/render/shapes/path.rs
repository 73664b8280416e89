use bytemuck::{Pod, Zeroable};

use crate::coords::Vec2;
use crate::draw::{Clip, DrawCmd, DrawList};
use crate::draw::shapes::PathStyle;
use crate::paint::Paint;
use crate::render::{RenderCtx, RenderTarget};

use super::common::{
    PaintClip, ViewportUniform, begin_load_pass, build_pipeline, ensure_vertex_capacity,
    scissor_runs,
};

/// Triangle list filling a closed polyline as a fan around its centroid.
///
/// Exact for star-shaped outlines (every superellipse is one).
pub fn tessellate_fill(points: &[Vec2]) -> Vec<Vec2> {
    let n = points.len();
    if n < 3 {
        return Vec::new();
    }
    let sum = points.iter().fold(Vec2::zero(), |acc, p| acc + *p);
    let center = sum * (1.0 / n as f32);

    let mut out = Vec::with_capacity(n * 3);
    for i in 0..n {
        out.push(center);
        out.push(points[i]);
        out.push(points[(i + 1) % n]);
    }
    out
}

/// Triangle list outlining a closed polyline with `width`, centered on it.
///
/// Corners are mitred; the miter is capped at 4× the half width.
pub fn tessellate_stroke(points: &[Vec2], width: f32) -> Vec<Vec2> {
    let n = points.len();
    if n < 2 || !(width > 0.0) {
        return Vec::new();
    }
    let half = width * 0.5;

    let normal = |a: Vec2, b: Vec2| -> Vec2 {
        let d = b - a;
        let len = d.x.hypot(d.y);
        if len <= f32::EPSILON { Vec2::zero() } else { Vec2::new(-d.y / len, d.x / len) }
    };

    let offsets: Vec<Vec2> = (0..n)
        .map(|i| {
            let prev = points[(i + n - 1) % n];
            let next = points[(i + 1) % n];
            let n0 = normal(prev, points[i]);
            let n1 = normal(points[i], next);
            let sum = n0 + n1;
            let len = sum.x.hypot(sum.y);
            if len <= f32::EPSILON {
                return n1 * half;
            }
            let miter = sum * (1.0 / len);
            let cos = (miter.x * n1.x + miter.y * n1.y).max(0.25);
            miter * (half / cos)
        })
        .collect();

    let mut out = Vec::with_capacity(n * 6);
    for i in 0..n {
        let j = (i + 1) % n;
        let (a_out, a_in) = (points[i] + offsets[i], points[i] - offsets[i]);
        let (b_out, b_in) = (points[j] + offsets[j], points[j] - offsets[j]);
        out.extend_from_slice(&[a_out, b_out, b_in, a_out, b_in, a_in]);
    }
    out
}

/// Renderer for `DrawCmd::Path`. Tessellates on the CPU every frame.
#[derive(Default)]
pub struct PathRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    viewport_ubo: Option<wgpu::Buffer>,

    vertex_vbo: Option<wgpu::Buffer>,
    vertex_capacity: usize,

    warned_multi_stop: bool,
}

impl PathRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        draw_list: &mut DrawList,
    ) {
        let mut vertices: Vec<PathVertex> = Vec::new();
        // One clip per triangle so runs split on triangle boundaries.
        let mut clips: Vec<Option<Clip>> = Vec::new();

        for item in draw_list.iter_in_paint_order() {
            let DrawCmd::Path(cmd) = &item.cmd else { continue };
            let (triangles, paint) = match &cmd.style {
                PathStyle::Fill(paint) => (tessellate_fill(&cmd.points), paint.clone()),
                PathStyle::Stroke(stroke) => (
                    tessellate_stroke(&cmd.points, stroke.width),
                    Paint::Solid(stroke.color),
                ),
            };
            let pc = PaintClip::new(&paint, item.clip.as_ref(), &mut self.warned_multi_stop);
            vertices.extend(triangles.iter().map(|p| PathVertex { pos: [p.x, p.y], paint: pc }));
            clips.extend(std::iter::repeat_n(item.clip, triangles.len() / 3));
        }

        if vertices.is_empty() {
            return;
        }

        self.ensure_pipeline(ctx);
        self.ensure_bindings(ctx);
        ensure_vertex_capacity(
            ctx,
            &mut self.vertex_vbo,
            &mut self.vertex_capacity,
            vertices.len(),
            std::mem::size_of::<PathVertex>(),
            "lumen path vbo",
        );

        let (Some(pipeline), Some(bind_group), Some(ubo), Some(vbo)) = (
            self.pipeline.as_ref(),
            self.bind_group.as_ref(),
            self.viewport_ubo.as_ref(),
            self.vertex_vbo.as_ref(),
        ) else {
            return;
        };

        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&ViewportUniform::from_ctx(ctx)));
        ctx.queue.write_buffer(vbo, 0, bytemuck::cast_slice(&vertices));

        let mut rpass = begin_load_pass(target, "lumen path pass");
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, vbo.slice(..));

        for ((sx, sy, sw, sh), tris) in scissor_runs(&clips, ctx.viewport, ctx.scale_factor) {
            rpass.set_scissor_rect(sx, sy, sw, sh);
            rpass.draw(tris.start * 3..tris.end * 3, 0..1);
        }
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("lumen path bgl"),
            entries: &[ViewportUniform::layout_entry()],
        });
        let pipeline = build_pipeline(
            ctx,
            "lumen path pipeline",
            include_str!("shaders/path.wgsl"),
            &bgl,
            &[PathVertex::layout()],
        );

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bgl);
        self.bind_group = None;
        self.viewport_ubo = None;
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() && self.viewport_ubo.is_some() {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };

        let viewport_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("lumen path viewport ubo"),
            size: std::mem::size_of::<ViewportUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("lumen path bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: viewport_ubo.as_entire_binding(),
            }],
        });

        self.viewport_ubo = Some(viewport_ubo);
        self.bind_group = Some(bind_group);
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct PathVertex {
    pos: [f32; 2],
    paint: PaintClip,
}

impl PathVertex {
    const ATTRS: [wgpu::VertexAttribute; 6] = wgpu::vertex_attr_array![
        0 => Float32x2, // pos
        1 => Float32x4, // color0
        2 => Float32x4, // color1
        3 => Float32x4, // grad
        4 => Float32x4, // clip bounds
        5 => Float32    // clip exponent
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PathVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}
