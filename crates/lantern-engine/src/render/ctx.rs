/// Renderer-facing context (device/queue + attachment formats + surface size).
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    pub depth_format: wgpu::TextureFormat,
    /// Surface size in physical pixels.
    pub size: (u32, u32),
}

impl<'a> RenderCtx<'a> {
    #[inline]
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        depth_format: wgpu::TextureFormat,
        size: (u32, u32),
    ) -> Self {
        Self {
            device,
            queue,
            surface_format,
            depth_format,
            size,
        }
    }

    /// Width over height, never dividing by zero.
    pub fn aspect_ratio(&self) -> f32 {
        let (w, h) = self.size;
        w.max(1) as f32 / h.max(1) as f32
    }
}

/// Target for drawing (encoder + color and depth views).
///
/// Both attachments are already cleared for the frame; renderers load them.
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
    pub depth_view: &'a wgpu::TextureView,
}

impl<'a> RenderTarget<'a> {
    #[inline]
    pub fn new(
        encoder: &'a mut wgpu::CommandEncoder,
        color_view: &'a wgpu::TextureView,
        depth_view: &'a wgpu::TextureView,
    ) -> Self {
        Self {
            encoder,
            color_view,
            depth_view,
        }
    }
}
