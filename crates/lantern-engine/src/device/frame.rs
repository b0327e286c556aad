/// One acquired swapchain image plus the encoder recording into it.
///
/// Holding it blocks acquisition of the next image; submit promptly.
pub struct GpuFrame {
    pub texture: wgpu::SurfaceTexture,
    pub color_view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}
