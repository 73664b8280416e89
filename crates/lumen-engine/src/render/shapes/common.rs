//! GPU types and helpers shared by the shape renderers.

use std::ops::Range;

use bytemuck::{Pod, Zeroable};

use crate::coords::Viewport;
use crate::draw::Clip;
use crate::paint::Paint;
use crate::render::{RenderCtx, RenderTarget};

pub(super) const COMMON_WGSL: &str = include_str!("shaders/common.wgsl");

// ── blend ─────────────────────────────────────────────────────────────────

pub(super) fn premul_alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING
}

// ── viewport uniform ──────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct ViewportUniform {
    pub viewport: [f32; 2],
    pub _pad: [f32; 2],
}

impl ViewportUniform {
    pub(super) fn from_ctx(ctx: &RenderCtx<'_>) -> Self {
        Self {
            viewport: [ctx.viewport.width.max(1.0), ctx.viewport.height.max(1.0)],
            _pad: [0.0; 2],
        }
    }

    pub(super) fn binding_size() -> Option<wgpu::BufferSize> {
        wgpu::BufferSize::new(std::mem::size_of::<Self>() as u64)
    }

    pub(super) fn layout_entry() -> wgpu::BindGroupLayoutEntry {
        wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: Self::binding_size(),
            },
            count: None,
        }
    }
}

// ── unit quad ─────────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct QuadVertex {
    pub pos: [f32; 2],
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    pub(super) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

pub(super) const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { pos: [0.0, 0.0] },
    QuadVertex { pos: [1.0, 0.0] },
    QuadVertex { pos: [1.0, 1.0] },
    QuadVertex { pos: [0.0, 1.0] },
];

pub(super) const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

// ── paint + clip parameters ───────────────────────────────────────────────

/// Per-primitive fill and curved-clip parameters, shared by every shape shader.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub(super) struct PaintClip {
    pub color0: [f32; 4],
    pub color1: [f32; 4],
    /// `p0.xy, p1.xy` of the gradient axis; zero length = solid `color0`.
    pub grad: [f32; 4],
    /// Superellipse bounds `x, y, w, h`; zero size = no curve.
    pub clip_bounds: [f32; 4],
    pub clip_exponent: f32,
}

impl PaintClip {
    pub(super) fn new(paint: &Paint, clip: Option<&Clip>, warned_multi_stop: &mut bool) -> Self {
        let (color0, color1, grad) = resolve_paint(paint, warned_multi_stop);
        let (clip_bounds, clip_exponent) = match clip.and_then(|c| c.curve) {
            Some(curve) => {
                let b = curve.bounds;
                ([b.origin.x, b.origin.y, b.size.x, b.size.y], curve.exponent)
            }
            None => ([0.0; 4], 1.0),
        };
        Self { color0, color1, grad, clip_bounds, clip_exponent }
    }
}

/// Converts a paint to `(color0, color1, grad)`.
///
/// Gradients use their first and last stops only.
pub(super) fn resolve_paint(paint: &Paint, warned_multi_stop: &mut bool) -> ([f32; 4], [f32; 4], [f32; 4]) {
    match paint {
        Paint::Solid(c) => (c.to_array(), c.to_array(), [0.0; 4]),
        Paint::LinearGradient(g) => match (g.stops.first(), g.stops.last()) {
            (Some(first), Some(last)) if g.stops.len() >= 2 => {
                if g.stops.len() > 2 && !*warned_multi_stop {
                    log::debug!("only 2-stop gradients supported; using first and last stop");
                    *warned_multi_stop = true;
                }
                (
                    first.color.to_array(),
                    last.color.to_array(),
                    [g.start.x, g.start.y, g.end.x, g.end.y],
                )
            }
            _ => {
                let c = paint.primary_color().to_array();
                (c, c, [0.0; 4])
            }
        },
    }
}

// ── scissor ───────────────────────────────────────────────────────────────

/// Physical scissor `(x, y, w, h)` for a clip, clamped to the viewport.
///
/// `None` clip = full viewport. Returns `None` when the result is zero-area.
pub(super) fn clip_to_scissor(
    clip: Option<&Clip>,
    viewport: Viewport,
    scale: f32,
) -> Option<(u32, u32, u32, u32)> {
    let vw = (viewport.width * scale).max(1.0) as u32;
    let vh = (viewport.height * scale).max(1.0) as u32;

    let (x, y, w, h) = match clip {
        None => (0, 0, vw, vh),
        Some(c) => {
            let r = c.scissor;
            let x = ((r.origin.x * scale).max(0.0) as u32).min(vw);
            let y = ((r.origin.y * scale).max(0.0) as u32).min(vh);
            let x2 = (((r.origin.x + r.size.x) * scale).max(0.0).ceil() as u32).min(vw);
            let y2 = (((r.origin.y + r.size.y) * scale).max(0.0).ceil() as u32).min(vh);
            (x, y, x2.saturating_sub(x), y2.saturating_sub(y))
        }
    };

    (w > 0 && h > 0).then_some((x, y, w, h))
}

/// Splits `clips` into runs of equal scissor and yields `(scissor, range)`.
///
/// Curved clips are per-primitive data, so only the scissor breaks a run.
pub(super) fn scissor_runs(
    clips: &[Option<Clip>],
    viewport: Viewport,
    scale: f32,
) -> Vec<((u32, u32, u32, u32), Range<u32>)> {
    let mut runs = Vec::new();
    let mut i = 0;
    while i < clips.len() {
        let scissor = clips[i].map(|c| c.scissor);
        let mut j = i + 1;
        while j < clips.len() && clips[j].map(|c| c.scissor) == scissor {
            j += 1;
        }
        if let Some(s) = clip_to_scissor(clips[i].as_ref(), viewport, scale) {
            runs.push((s, i as u32..j as u32));
        }
        i = j;
    }
    runs
}

// ── pass + pipeline ───────────────────────────────────────────────────────

/// Begins a pass that draws on top of what the target already holds.
pub(super) fn begin_load_pass<'e>(
    target: &'e mut RenderTarget<'_>,
    label: &'static str,
) -> wgpu::RenderPass<'e> {
    target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: target.color_view,
            resolve_target: None,
            ops: wgpu::Operations { load: wgpu::LoadOp::Load, store: wgpu::StoreOp::Store },
            depth_slice: None,
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
        multiview_mask: None,
    })
}

/// Builds a premultiplied-alpha triangle-list pipeline from `common.wgsl` + `body`.
pub(super) fn build_pipeline(
    ctx: &RenderCtx<'_>,
    label: &'static str,
    body: &str,
    bind_group_layout: &wgpu::BindGroupLayout,
    buffers: &[wgpu::VertexBufferLayout<'_>],
) -> wgpu::RenderPipeline {
    let source = format!("{COMMON_WGSL}\n{body}");
    let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    let layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts: &[bind_group_layout],
        immediate_size: 0,
    });

    ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers,
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: ctx.surface_format,
                blend: Some(premul_alpha_blend()),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

/// Grows a vertex buffer to hold at least `required` elements of `stride` bytes.
pub(super) fn ensure_vertex_capacity(
    ctx: &RenderCtx<'_>,
    buffer: &mut Option<wgpu::Buffer>,
    capacity: &mut usize,
    required: usize,
    stride: usize,
    label: &'static str,
) {
    if required <= *capacity && buffer.is_some() {
        return;
    }
    let new_cap = required.next_power_of_two().max(64);
    *buffer = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: (new_cap * stride) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    }));
    *capacity = new_cap;
}
