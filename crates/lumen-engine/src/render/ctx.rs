use crate::coords::Viewport;

/// Device handles and target metadata shared by the 2D renderers.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    /// Logical pixels.
    pub viewport: Viewport,
    /// Physical pixels per logical pixel.
    pub scale_factor: f32,
}

impl<'a> RenderCtx<'a> {
    #[inline]
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        viewport: Viewport,
        scale_factor: f32,
    ) -> Self {
        Self { device, queue, surface_format, viewport, scale_factor }
    }

    /// Physical size of the viewport, at least 1×1.
    pub fn physical_size(&self) -> (u32, u32) {
        (
            (self.viewport.width * self.scale_factor).max(1.0) as u32,
            (self.viewport.height * self.scale_factor).max(1.0) as u32,
        )
    }
}

/// Encoder + color view of the frame being recorded.
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
}

impl<'a> RenderTarget<'a> {
    #[inline]
    pub fn new(encoder: &'a mut wgpu::CommandEncoder, color_view: &'a wgpu::TextureView) -> Self {
        Self { encoder, color_view }
    }
}
