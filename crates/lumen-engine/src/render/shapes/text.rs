use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use fontdue::layout::{CoordinateSystem, GlyphRasterConfig, Layout, LayoutSettings, TextStyle};
use wgpu::util::DeviceExt;

use crate::draw::{Clip, DrawCmd, DrawList};
use crate::render::{RenderCtx, RenderTarget};
use crate::text::FontSystem;

use super::common::{
    PaintClip, QUAD_INDICES, QUAD_VERTICES, QuadVertex, ViewportUniform, begin_load_pass,
    build_pipeline, ensure_vertex_capacity, scissor_runs,
};

// ── atlas ─────────────────────────────────────────────────────────────────

const ATLAS_SIZE: u32 = 2048;
const GLYPH_PADDING: u32 = 1;

struct CachedGlyph {
    uv_min: [f32; 2],
    uv_max: [f32; 2],
}

/// Shelf packer over a square R8 atlas.
struct ShelfPacker {
    cursor_x: u32,
    cursor_y: u32,
    row_height: u32,
    full: bool,
}

impl Default for ShelfPacker {
    fn default() -> Self {
        Self { cursor_x: GLYPH_PADDING, cursor_y: GLYPH_PADDING, row_height: 0, full: false }
    }
}

impl ShelfPacker {
    /// Reserves a `w × h` cell and returns its top-left, or `None` once full.
    fn place(&mut self, w: u32, h: u32) -> Option<(u32, u32)> {
        if self.full {
            return None;
        }
        if self.cursor_x + w + GLYPH_PADDING > ATLAS_SIZE {
            self.cursor_y += self.row_height + GLYPH_PADDING;
            self.cursor_x = GLYPH_PADDING;
            self.row_height = 0;
        }
        if self.cursor_y + h + GLYPH_PADDING > ATLAS_SIZE || w + 2 * GLYPH_PADDING > ATLAS_SIZE {
            self.full = true;
            return None;
        }
        let at = (self.cursor_x, self.cursor_y);
        self.cursor_x += w + GLYPH_PADDING;
        self.row_height = self.row_height.max(h);
        Some(at)
    }
}

/// Rasterization scale for a device scale factor, quantized to quarter steps
/// so resizes between close factors reuse cached glyphs.
fn raster_scale(scale_factor: f32) -> f32 {
    if !scale_factor.is_finite() || scale_factor <= 0.0 {
        return 1.0;
    }
    ((scale_factor * 4.0).round() / 4.0).max(0.25)
}

// ── renderer ──────────────────────────────────────────────────────────────

/// Renderer for `DrawCmd::Text`.
///
/// Glyphs are rasterized through fontdue at the device scale on first use and
/// cached in a 2048² atlas. The text paint (solid or gradient) is evaluated per
/// fragment in logical pixels, so a gradient spans the whole run rather than
/// each glyph.
pub struct TextRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    bind_group_layout: Option<wgpu::BindGroupLayout>,

    bind_group: Option<wgpu::BindGroup>,
    viewport_ubo: Option<wgpu::Buffer>,
    sampler: Option<wgpu::Sampler>,

    atlas_texture: Option<wgpu::Texture>,
    atlas_view: Option<wgpu::TextureView>,
    packer: ShelfPacker,
    glyph_cache: HashMap<GlyphRasterConfig, CachedGlyph>,
    warned_full: bool,

    quad_vbo: Option<wgpu::Buffer>,
    quad_ibo: Option<wgpu::Buffer>,
    instance_vbo: Option<wgpu::Buffer>,
    instance_capacity: usize,

    layout: Layout<()>,
    warned_multi_stop: bool,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            pipeline_format: None,
            pipeline: None,
            bind_group_layout: None,
            bind_group: None,
            viewport_ubo: None,
            sampler: None,
            atlas_texture: None,
            atlas_view: None,
            packer: ShelfPacker::default(),
            glyph_cache: HashMap::new(),
            warned_full: false,
            quad_vbo: None,
            quad_ibo: None,
            instance_vbo: None,
            instance_capacity: 0,
            layout: Layout::new(CoordinateSystem::PositiveYDown),
            warned_multi_stop: false,
        }
    }
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        draw_list: &mut DrawList,
        fonts: &FontSystem,
    ) {
        let cmds: Vec<_> = draw_list
            .iter_in_paint_order()
            .filter_map(|item| match &item.cmd {
                DrawCmd::Text(cmd) => Some((cmd.clone(), item.clip)),
                _ => None,
            })
            .collect();
        if cmds.is_empty() {
            return;
        }

        self.ensure_pipeline(ctx);
        self.ensure_atlas(ctx);
        self.ensure_sampler(ctx);
        self.ensure_static_buffers(ctx);
        self.ensure_bindings(ctx);

        let scale = raster_scale(ctx.scale_factor);
        let mut instances: Vec<GlyphInstance> = Vec::new();
        let mut clips: Vec<Option<Clip>> = Vec::new();

        for (cmd, clip) in &cmds {
            let Some(font) = fonts.get(cmd.font) else {
                log::warn!("text: unknown font {:?}, skipping", cmd.font);
                continue;
            };
            let paint = PaintClip::new(&cmd.paint, clip.as_ref(), &mut self.warned_multi_stop);

            self.layout.reset(&LayoutSettings {
                x: cmd.origin.x * scale,
                y: cmd.origin.y * scale,
                max_width: cmd.max_width.map(|w| w * scale),
                ..LayoutSettings::default()
            });
            self.layout.append(&[font], &TextStyle::new(&cmd.text, cmd.size * scale, 0));

            // Copy positions out so the layout borrow ends before atlas uploads.
            let glyphs: Vec<(GlyphRasterConfig, f32, f32, usize, usize)> = self
                .layout
                .glyphs()
                .iter()
                .filter(|g| g.char_data.rasterize() && g.width > 0 && g.height > 0)
                .map(|g| (g.key, g.x, g.y, g.width, g.height))
                .collect();

            for (key, x, y, w, h) in glyphs {
                if !self.glyph_cache.contains_key(&key) {
                    let (metrics, bitmap) = font.rasterize_config(key);
                    if metrics.width == 0 || metrics.height == 0 {
                        continue;
                    }
                    match self.upload_glyph(ctx, &bitmap, metrics.width as u32, metrics.height as u32) {
                        Some(entry) => {
                            self.glyph_cache.insert(key, entry);
                        }
                        None => continue,
                    }
                }
                let Some(cached) = self.glyph_cache.get(&key) else { continue };

                instances.push(GlyphInstance {
                    dst_min: [x / scale, y / scale],
                    dst_max: [(x + w as f32) / scale, (y + h as f32) / scale],
                    uv_min: cached.uv_min,
                    uv_max: cached.uv_max,
                    paint,
                });
                clips.push(*clip);
            }
        }

        if instances.is_empty() {
            return;
        }

        ensure_vertex_capacity(
            ctx,
            &mut self.instance_vbo,
            &mut self.instance_capacity,
            instances.len(),
            std::mem::size_of::<GlyphInstance>(),
            "lumen text instance vbo",
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

        let mut rpass = begin_load_pass(target, "lumen text pass");
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

    fn upload_glyph(&mut self, ctx: &RenderCtx<'_>, bitmap: &[u8], w: u32, h: u32) -> Option<CachedGlyph> {
        let Some((gx, gy)) = self.packer.place(w, h) else {
            if !self.warned_full {
                log::warn!("text: glyph atlas is full ({ATLAS_SIZE}x{ATLAS_SIZE}); some glyphs will be skipped");
                self.warned_full = true;
            }
            return None;
        };
        let atlas = self.atlas_texture.as_ref()?;

        ctx.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: atlas,
                mip_level: 0,
                origin: wgpu::Origin3d { x: gx, y: gy, z: 0 },
                aspect: wgpu::TextureAspect::All,
            },
            bitmap,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(w),
                rows_per_image: Some(h),
            },
            wgpu::Extent3d { width: w, height: h, depth_or_array_layers: 1 },
        );

        let size = ATLAS_SIZE as f32;
        Some(CachedGlyph {
            uv_min: [gx as f32 / size, gy as f32 / size],
            uv_max: [(gx + w) as f32 / size, (gy + h) as f32 / size],
        })
    }

    // ── lazy init ─────────────────────────────────────────────────────────

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("lumen text bgl"),
            entries: &[
                ViewportUniform::layout_entry(),
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });
        let pipeline = build_pipeline(
            ctx,
            "lumen text pipeline",
            include_str!("shaders/text.wgsl"),
            &bgl,
            &[QuadVertex::layout(), GlyphInstance::layout()],
        );

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bgl);
        self.bind_group = None;
        self.viewport_ubo = None;
    }

    fn ensure_atlas(&mut self, ctx: &RenderCtx<'_>) {
        if self.atlas_texture.is_some() {
            return;
        }
        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("lumen glyph atlas"),
            size: wgpu::Extent3d { width: ATLAS_SIZE, height: ATLAS_SIZE, depth_or_array_layers: 1 },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::R8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        self.atlas_view = Some(texture.create_view(&wgpu::TextureViewDescriptor::default()));
        self.atlas_texture = Some(texture);
        self.packer = ShelfPacker::default();
        self.glyph_cache.clear();
        self.bind_group = None;
    }

    fn ensure_sampler(&mut self, ctx: &RenderCtx<'_>) {
        if self.sampler.is_some() {
            return;
        }
        self.sampler = Some(ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("lumen glyph sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        }));
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() && self.viewport_ubo.is_some() {
            return;
        }
        let (Some(bgl), Some(atlas_view), Some(sampler)) =
            (self.bind_group_layout.as_ref(), self.atlas_view.as_ref(), self.sampler.as_ref())
        else {
            return;
        };

        let viewport_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("lumen text viewport ubo"),
            size: std::mem::size_of::<ViewportUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("lumen text bind group"),
            layout: bgl,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: viewport_ubo.as_entire_binding() },
                wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::TextureView(atlas_view) },
                wgpu::BindGroupEntry { binding: 2, resource: wgpu::BindingResource::Sampler(sampler) },
            ],
        });

        self.viewport_ubo = Some(viewport_ubo);
        self.bind_group = Some(bind_group);
    }

    fn ensure_static_buffers(&mut self, ctx: &RenderCtx<'_>) {
        if self.quad_vbo.is_some() && self.quad_ibo.is_some() {
            return;
        }
        self.quad_vbo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("lumen text quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        }));
        self.quad_ibo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("lumen text quad ibo"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        }));
    }
}

// ── GPU types ─────────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct GlyphInstance {
    dst_min: [f32; 2],
    dst_max: [f32; 2],
    uv_min: [f32; 2],
    uv_max: [f32; 2],
    paint: PaintClip,
}

impl GlyphInstance {
    const ATTRS: [wgpu::VertexAttribute; 9] = wgpu::vertex_attr_array![
        1 => Float32x2, // dst_min
        2 => Float32x2, // dst_max
        3 => Float32x2, // uv_min
        4 => Float32x2, // uv_max
        5 => Float32x4, // color0
        6 => Float32x4, // color1
        7 => Float32x4, // grad
        8 => Float32x4, // clip bounds
        9 => Float32    // clip exponent
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GlyphInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raster_scale_quantizes_to_quarters() {
        assert_eq!(raster_scale(1.0), 1.0);
        assert_eq!(raster_scale(1.3), 1.25);
        assert_eq!(raster_scale(2.0), 2.0);
        assert_eq!(raster_scale(0.0), 1.0);
        assert_eq!(raster_scale(f32::NAN), 1.0);
    }

    #[test]
    fn packer_wraps_to_next_shelf() {
        let mut p = ShelfPacker::default();
        let first = p.place(ATLAS_SIZE - 10, 20).unwrap();
        assert_eq!(first, (GLYPH_PADDING, GLYPH_PADDING));
        let second = p.place(30, 10).unwrap();
        assert_eq!(second, (GLYPH_PADDING, GLYPH_PADDING + 20 + GLYPH_PADDING));
    }

    #[test]
    fn packer_reports_full_and_stays_full() {
        let mut p = ShelfPacker::default();
        assert!(p.place(ATLAS_SIZE, 10).is_none());
        assert!(p.place(1, 1).is_none());
    }
}
