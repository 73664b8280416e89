//! Depth-tested mesh drawing shared by both renderers.

use std::collections::HashMap;

use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use crate::device::{Gpu, GpuFrame, SurfaceErrorAction};
use crate::graphics::materials::{BlendMode, Material, MaterialManager, module_source};
use crate::graphics::scene::{GeometryId, PerspectiveCamera, Scene, Vertex};
use crate::render::{RenderCtx, RenderTarget};

use super::{Overlay, RenderOutcome};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const MESH_UNIFORM_SIZE: u64 = std::mem::size_of::<[[f32; 4]; 4]>() as u64;
const CLEAR: wgpu::Color = wgpu::Color { r: 0.0, g: 0.0, b: 0.0, a: 1.0 };

/// Clip-space correction for a canvas taller than the visible area.
///
/// The projection covers the full canvas; this keeps its top
/// `visible_fraction` and stretches it over the target.
pub fn bleed_crop(visible_fraction: f32) -> Mat4 {
    let f = if visible_fraction.is_finite() && visible_fraction > 0.0 {
        visible_fraction.min(1.0)
    } else {
        1.0
    };
    Mat4::from_translation(Vec3::new(0.0, -(1.0 - f) / f, 0.0)) * Mat4::from_scale(Vec3::new(1.0, 1.0 / f, 1.0))
}

fn blend_state(blend: BlendMode) -> Option<wgpu::BlendState> {
    match blend {
        BlendMode::Opaque => Some(wgpu::BlendState::REPLACE),
        BlendMode::Alpha => Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
        BlendMode::Additive => Some(wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent::OVER,
        }),
    }
}

struct GpuMesh {
    vbo: wgpu::Buffer,
    ibo: wgpu::Buffer,
    index_count: u32,
}

/// Pipeline and uniform block for one material.
struct MaterialGpu {
    /// Source the pipeline was built from; a different source rebuilds.
    source: String,
    blend: BlendMode,
    pipeline: wgpu::RenderPipeline,
    ubo: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

struct DepthTarget {
    size: (u32, u32),
    view: wgpu::TextureView,
}

/// What one scene frame draws.
pub struct SceneFrame<'a> {
    pub scene: &'a Scene,
    pub camera: &'a PerspectiveCamera,
    pub materials: &'a dyn MaterialManager,
    /// Share of the canvas height that is on screen.
    pub visible_fraction: f32,
}

/// Draws a [`Scene`] with per-material pipelines.
///
/// Meshes are uploaded once per scene generation; pipelines are cached by
/// material name and rebuilt when the material's source changes.
pub struct ScenePainter {
    format: wgpu::TextureFormat,
    mesh_layout: wgpu::BindGroupLayout,
    material_layout: wgpu::BindGroupLayout,
    mesh_ubo: Option<wgpu::Buffer>,
    mesh_bind_group: Option<wgpu::BindGroup>,
    mesh_capacity: usize,
    mesh_stride: u64,
    meshes: HashMap<GeometryId, GpuMesh>,
    generation: Option<u64>,
    materials: HashMap<String, MaterialGpu>,
    depth: Option<DepthTarget>,
}

impl ScenePainter {
    pub fn new(gpu: &Gpu) -> Self {
        let device = gpu.device();
        let mesh_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("lumen scene mesh bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(MESH_UNIFORM_SIZE),
                },
                count: None,
            }],
        });
        let material_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("lumen scene material bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let align = u64::from(device.limits().min_uniform_buffer_offset_alignment);
        Self {
            format: gpu.surface_format(),
            mesh_layout,
            material_layout,
            mesh_ubo: None,
            mesh_bind_group: None,
            mesh_capacity: 0,
            mesh_stride: MESH_UNIFORM_SIZE.next_multiple_of(align.max(1)),
            meshes: HashMap::new(),
            generation: None,
            materials: HashMap::new(),
            depth: None,
        }
    }

    /// Records the scene into `target`, clearing color and depth.
    pub fn draw(&mut self, gpu: &Gpu, target: &mut RenderTarget<'_>, frame: &SceneFrame<'_>) {
        let size = gpu.size();
        self.ensure_depth(gpu, (size.width.max(1), size.height.max(1)));
        self.sync_geometry(gpu, frame.scene);

        let view_proj = bleed_crop(frame.visible_fraction) * frame.camera.view_projection();
        let mut draws = Vec::new();
        for item in frame.scene.draw_list() {
            let Some(material) = frame.materials.material(item.material) else {
                log::trace!("no material `{}`; mesh skipped", item.material);
                continue;
            };
            if !self.meshes.contains_key(&item.geometry) {
                continue;
            }
            self.ensure_material(gpu, material);
            draws.push((item.geometry, material.name().to_string(), material.blend(), view_proj * item.world));
        }
        // Opaque first; blended meshes keep scene order on top.
        draws.sort_by_key(|(_, _, blend, _)| *blend != BlendMode::Opaque);

        for name in draws.iter().map(|(_, n, _, _)| n).collect::<std::collections::BTreeSet<_>>() {
            if let (Some(m), Some(gpu_m)) = (frame.materials.material(name), self.materials.get(name.as_str())) {
                gpu.queue().write_buffer(&gpu_m.ubo, 0, &m.uniform_bytes());
            }
        }

        self.ensure_mesh_capacity(gpu, draws.len());
        let mut staging = vec![0u8; (self.mesh_stride as usize) * draws.len().max(1)];
        for (i, (_, _, _, mvp)) in draws.iter().enumerate() {
            let at = i * self.mesh_stride as usize;
            staging[at..at + MESH_UNIFORM_SIZE as usize].copy_from_slice(bytemuck::cast_slice(&mvp.to_cols_array()));
        }

        let (Some(depth), Some(mesh_ubo), Some(mesh_bind_group)) =
            (self.depth.as_ref(), self.mesh_ubo.as_ref(), self.mesh_bind_group.as_ref())
        else {
            return;
        };
        gpu.queue().write_buffer(mesh_ubo, 0, &staging);

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("lumen scene pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations { load: wgpu::LoadOp::Clear(CLEAR), store: wgpu::StoreOp::Store },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &depth.view,
                depth_ops: Some(wgpu::Operations { load: wgpu::LoadOp::Clear(1.0), store: wgpu::StoreOp::Store }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        for (i, (geometry, name, _, _)) in draws.iter().enumerate() {
            let (Some(mesh), Some(material)) = (self.meshes.get(geometry), self.materials.get(name.as_str())) else {
                continue;
            };
            rpass.set_pipeline(&material.pipeline);
            rpass.set_bind_group(0, mesh_bind_group, &[(i as u64 * self.mesh_stride) as u32]);
            rpass.set_bind_group(1, &material.bind_group, &[]);
            rpass.set_vertex_buffer(0, mesh.vbo.slice(..));
            rpass.set_index_buffer(mesh.ibo.slice(..), wgpu::IndexFormat::Uint32);
            rpass.draw_indexed(0..mesh.index_count, 0, 0..1);
        }
    }

    fn ensure_depth(&mut self, gpu: &Gpu, size: (u32, u32)) {
        if self.depth.as_ref().is_some_and(|d| d.size == size) {
            return;
        }
        let texture = gpu.device().create_texture(&wgpu::TextureDescriptor {
            label: Some("lumen scene depth"),
            size: wgpu::Extent3d { width: size.0, height: size.1, depth_or_array_layers: 1 },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        self.depth = Some(DepthTarget { size, view });
    }

    fn sync_geometry(&mut self, gpu: &Gpu, scene: &Scene) {
        if self.generation == Some(scene.generation()) {
            return;
        }
        self.meshes.clear();
        for (id, geometry) in scene.geometries() {
            if geometry.indices.is_empty() {
                continue;
            }
            let vbo = gpu.device().create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("lumen scene vbo"),
                contents: bytemuck::cast_slice::<Vertex, u8>(&geometry.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
            let ibo = gpu.device().create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("lumen scene ibo"),
                contents: bytemuck::cast_slice(&geometry.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
            self.meshes.insert(id, GpuMesh { vbo, ibo, index_count: geometry.indices.len() as u32 });
        }
        log::debug!("uploaded {} mesh(es) for scene generation {}", self.meshes.len(), scene.generation());
        self.generation = Some(scene.generation());
    }

    fn ensure_mesh_capacity(&mut self, gpu: &Gpu, required: usize) {
        if required <= self.mesh_capacity && self.mesh_ubo.is_some() {
            return;
        }
        let capacity = required.next_power_of_two().max(8);
        let ubo = gpu.device().create_buffer(&wgpu::BufferDescriptor {
            label: Some("lumen scene mesh ubo"),
            size: capacity as u64 * self.mesh_stride,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = gpu.device().create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("lumen scene mesh bind group"),
            layout: &self.mesh_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &ubo,
                    offset: 0,
                    size: wgpu::BufferSize::new(MESH_UNIFORM_SIZE),
                }),
            }],
        });
        self.mesh_ubo = Some(ubo);
        self.mesh_bind_group = Some(bind_group);
        self.mesh_capacity = capacity;
    }

    fn ensure_material(&mut self, gpu: &Gpu, material: &Material) {
        if self
            .materials
            .get(material.name())
            .is_some_and(|m| m.source == material.source() && m.blend == material.blend())
        {
            return;
        }
        let device = gpu.device();
        let label = format!("lumen material {}", material.name());
        let source = module_source(material.source());
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&label),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&label),
            bind_group_layouts: &[&self.mesh_layout, &self.material_layout],
            immediate_size: 0,
        });
        let blended = material.blend() != BlendMode::Opaque;
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&label),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[Vertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.format,
                    blend: blend_state(material.blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: !blended,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });
        let ubo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&label),
            contents: &material.uniform_bytes(),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&label),
            layout: &self.material_layout,
            entries: &[wgpu::BindGroupEntry { binding: 0, resource: ubo.as_entire_binding() }],
        });
        log::debug!("built pipeline for material `{}` ({:?})", material.name(), material.blend());
        self.materials.insert(
            material.name().to_string(),
            MaterialGpu { source: material.source().to_string(), blend: material.blend(), pipeline, ubo, bind_group },
        );
    }

    /// Drops every cached GPU resource.
    pub fn clear(&mut self) {
        self.meshes.clear();
        self.materials.clear();
        self.generation = None;
        self.depth = None;
        self.mesh_ubo = None;
        self.mesh_bind_group = None;
        self.mesh_capacity = 0;
    }
}

/// Acquires a surface frame, draws the scene and the overlay, and presents.
pub(super) fn present(
    gpu: &mut Gpu,
    painter: &mut ScenePainter,
    scene: &SceneFrame<'_>,
    overlay: Option<&mut dyn Overlay>,
    scale_factor: f32,
) -> RenderOutcome {
    let mut frame: GpuFrame = match gpu.begin_frame() {
        Ok(frame) => frame,
        Err(e) => {
            return match gpu.handle_surface_error(e) {
                SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => RenderOutcome::Skipped,
                SurfaceErrorAction::Fatal => {
                    log::error!("surface lost for good");
                    RenderOutcome::Failed
                }
            };
        }
    };

    {
        let mut target = RenderTarget::new(&mut frame.encoder, &frame.view);
        painter.draw(gpu, &mut target, scene);

        if let Some(overlay) = overlay {
            let size = gpu.size();
            let scale = if scale_factor > 0.0 { scale_factor } else { 1.0 };
            let viewport = crate::coords::Viewport::new(size.width as f32 / scale, size.height as f32 / scale);
            let ctx = RenderCtx::new(gpu.device(), gpu.queue(), gpu.surface_format(), viewport, scale);
            overlay.draw(&ctx, &mut target);
        }
    }

    gpu.submit(frame);
    RenderOutcome::Presented
}
