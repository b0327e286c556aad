use anyhow::{Context, Result};
use winit::dpi::PhysicalSize;

use super::GpuInit;

/// What the frame loop should do after failing to acquire a surface texture.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// The surface was reconfigured; the next frame may succeed.
    Reconfigured,
    /// Drop this frame and try again.
    SkipFrame,
    /// Unrecoverable; stop rendering.
    Fatal,
}

/// Window surface together with its active configuration.
pub(crate) struct SurfaceTarget<'w> {
    surface: wgpu::Surface<'w>,
    config: wgpu::SurfaceConfiguration,
    /// Last size reported by the window; may be 0x0 while minimized.
    size: PhysicalSize<u32>,
}

impl<'w> SurfaceTarget<'w> {
    pub(crate) fn configure(
        surface: wgpu::Surface<'w>,
        adapter: &wgpu::Adapter,
        device: &wgpu::Device,
        init: &GpuInit,
        size: PhysicalSize<u32>,
    ) -> Result<Self> {
        let caps = surface.get_capabilities(adapter);
        let format = pick_format(&caps.formats, init.prefer_srgb)
            .context("surface reports no supported formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: init.present_mode,
            alpha_mode: pick_alpha_mode(&caps.alpha_modes, init.alpha_mode),
            view_formats: vec![],
            desired_maximum_frame_latency: init.desired_maximum_frame_latency,
        };
        surface.configure(device, &config);

        log::info!(
            "surface configured: {format:?} {}x{} ({:?})",
            config.width,
            config.height,
            config.present_mode
        );

        Ok(Self {
            surface,
            config,
            size,
        })
    }

    pub(crate) fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Configured texture size; never zero.
    pub(crate) fn extent(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub(crate) fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    /// Returns `false` when `new_size` is degenerate and reconfiguration was deferred.
    pub(crate) fn resize(&mut self, device: &wgpu::Device, new_size: PhysicalSize<u32>) -> bool {
        self.size = new_size;
        if new_size.width == 0 || new_size.height == 0 {
            return false;
        }
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(device, &self.config);
        true
    }

    pub(crate) fn acquire(&self) -> Result<wgpu::SurfaceTexture, wgpu::SurfaceError> {
        self.surface.get_current_texture()
    }

    pub(crate) fn recover(&self, device: &wgpu::Device, err: wgpu::SurfaceError) -> SurfaceErrorAction {
        match err {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
                if self.size.width > 0 && self.size.height > 0 {
                    self.surface.configure(device, &self.config);
                }
                SurfaceErrorAction::Reconfigured
            }
            wgpu::SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
            wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => SurfaceErrorAction::SkipFrame,
        }
    }
}

/// First sRGB format when preferred, otherwise the surface's first format.
fn pick_format(formats: &[wgpu::TextureFormat], prefer_srgb: bool) -> Option<wgpu::TextureFormat> {
    let srgb = formats.iter().copied().find(|f| f.is_srgb());
    match srgb {
        Some(f) if prefer_srgb => Some(f),
        _ => formats.first().copied(),
    }
}

fn pick_alpha_mode(
    supported: &[wgpu::CompositeAlphaMode],
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    match requested {
        Some(mode) if supported.contains(&mode) => mode,
        _ => supported
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto),
    }
}
