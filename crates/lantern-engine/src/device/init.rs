/// Initialization parameters for the GPU layer.
///
/// Everything here is decided once, before the first frame. Fields that only
/// matter after a resize (surface size, depth texture size) are derived from
/// the window instead.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Prefer an sRGB surface format when available.
    ///
    /// The scene shader picks its output gamma from the chosen format, so
    /// either answer renders correctly; sRGB avoids banding in dark shades.
    pub prefer_srgb: bool,

    /// Present mode (swap behavior).
    ///
    /// FIFO is the only mode every backend must support.
    pub present_mode: wgpu::PresentMode,

    /// Optional alpha mode preference for the surface.
    ///
    /// If provided but unsupported on the current surface, a supported mode is selected.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    /// Required wgpu features.
    ///
    /// The viewer needs none; keep it empty so any adapter qualifies.
    pub required_features: wgpu::Features,

    /// Limits requested from the device.
    ///
    /// Large glTF buffers are bound as whole vertex buffers, so raise
    /// `max_buffer_size` here if an asset exceeds the default.
    pub required_limits: wgpu::Limits,

    /// Desired maximum frame latency for the surface.
    ///
    /// A hint only. Two frames keeps camera drag responsive without starving
    /// the GPU.
    pub desired_maximum_frame_latency: u32,

    /// Format of the depth buffer owned by the GPU context.
    ///
    /// Must match the depth format the scene pipeline is built with, which
    /// reads it back through `Gpu::depth_format`.
    pub depth_format: wgpu::TextureFormat,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
            depth_format: wgpu::TextureFormat::Depth24Plus,
        }
    }
}

impl GpuInit {
    /// Same defaults, with vsync disabled when the platform allows it.
    pub fn without_vsync() -> Self {
        Self {
            present_mode: wgpu::PresentMode::AutoNoVsync,
            ..Self::default()
        }
    }
}
