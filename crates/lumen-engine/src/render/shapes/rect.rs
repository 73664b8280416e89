use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::draw::{Clip, DrawCmd, DrawList};
use crate::render::{RenderCtx, RenderTarget};

use super::common::{
    PaintClip, QUAD_INDICES, QUAD_VERTICES, QuadVertex, ViewportUniform, begin_load_pass,
    build_pipeline, ensure_vertex_capacity, scissor_runs,
};

/// Instanced renderer for `DrawCmd::Rect`, solid or linear-gradient filled.
#[derive(Default)]
pub struct RectRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    viewport_ubo: Option<wgpu::Buffer>,

    quad_vbo: Option<wgpu::Buffer>,
    quad_ibo: Option<wgpu::Buffer>,

    instance_vbo: Option<wgpu::Buffer>,
    instance_capacity: usize,

    warned_multi_stop: bool,
}

impl RectRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        draw_list: &mut DrawList,
    ) {
        let mut instances: Vec<RectInstance> = Vec::new();
        let mut clips: Vec<Option<Clip>> = Vec::new();

        for item in draw_list.iter_in_paint_order() {
            let DrawCmd::Rect(cmd) = &item.cmd else { continue };
            let r = cmd.rect.normalized();
            if r.is_empty() {
                continue;
            }
            instances.push(RectInstance {
                origin: [r.origin.x, r.origin.y],
                size: [r.size.x, r.size.y],
                paint: PaintClip::new(&cmd.paint, item.clip.as_ref(), &mut self.warned_multi_stop),
            });
            clips.push(item.clip);
        }

        if instances.is_empty() {
            return;
        }

        self.ensure_pipeline(ctx);
        self.ensure_static_buffers(ctx);
        self.ensure_bindings(ctx);
        ensure_vertex_capacity(
            ctx,
            &mut self.instance_vbo,
            &mut self.instance_capacity,
            instances.len(),
            std::mem::size_of::<RectInstance>(),
            "lumen rect instance vbo",
        );

        let (Some(pipeline), Some(bind_group), Some(ubo), Some(quad_vbo), Some(quad_ibo), Some(instance_vbo)) = (
            self.pipeline.as_ref(),
            self.bind_group.as_ref(),
            self.viewport_ubo.as_ref(),
            self.quad_vbo.as_ref(),
            self.quad_ibo.as_ref(),
            self.instance_vbo.as_ref(),
        ) else {
            return;
        };

        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&ViewportUniform::from_ctx(ctx)));
        ctx.queue.write_buffer(instance_vbo, 0, bytemuck::cast_slice(&instances));

        let mut rpass = begin_load_pass(target, "lumen rect pass");
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, quad_vbo.slice(..));
        rpass.set_vertex_buffer(1, instance_vbo.slice(..));
        rpass.set_index_buffer(quad_ibo.slice(..), wgpu::IndexFormat::Uint16);

        for ((sx, sy, sw, sh), range) in scissor_runs(&clips, ctx.viewport, ctx.scale_factor) {
            rpass.set_scissor_rect(sx, sy, sw, sh);
            rpass.draw_indexed(0..6, 0, range);
        }
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("lumen rect bgl"),
            entries: &[ViewportUniform::layout_entry()],
        });
        let pipeline = build_pipeline(
            ctx,
            "lumen rect pipeline",
            include_str!("shaders/rect.wgsl"),
            &bgl,
            &[QuadVertex::layout(), RectInstance::layout()],
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
            label: Some("lumen rect viewport ubo"),
            size: std::mem::size_of::<ViewportUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("lumen rect bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: viewport_ubo.as_entire_binding(),
            }],
        });

        self.viewport_ubo = Some(viewport_ubo);
        self.bind_group = Some(bind_group);
    }

    fn ensure_static_buffers(&mut self, ctx: &RenderCtx<'_>) {
        if self.quad_vbo.is_some() && self.quad_ibo.is_some() {
            return;
        }
        self.quad_vbo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("lumen rect quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        }));
        self.quad_ibo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("lumen rect quad ibo"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        }));
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct RectInstance {
    origin: [f32; 2],
    size: [f32; 2],
    paint: PaintClip,
}

impl RectInstance {
    const ATTRS: [wgpu::VertexAttribute; 7] = wgpu::vertex_attr_array![
        1 => Float32x2, // origin
        2 => Float32x2, // size
        3 => Float32x4, // color0
        4 => Float32x4, // color1
        5 => Float32x4, // grad
        6 => Float32x4, // clip bounds
        7 => Float32    // clip exponent
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<RectInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}
