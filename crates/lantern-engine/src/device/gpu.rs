use anyhow::{Context, Result};
use winit::dpi::PhysicalSize;
use winit::window::Window;

use super::surface::SurfaceTarget;
use super::{DepthBuffer, GpuFrame, GpuInit, SurfaceErrorAction};

/// Device, queue and window surface, plus a depth buffer kept at surface size.
///
/// `'w` ties the surface to the window it was created from.
pub struct Gpu<'w> {
    _instance: wgpu::Instance,
    device: wgpu::Device,
    queue: wgpu::Queue,
    target: SurfaceTarget<'w>,
    depth: DepthBuffer,
}

impl<'w> Gpu<'w> {
    /// Negotiates adapter and device for `window` and configures its surface.
    pub async fn new(window: &'w Window, init: GpuInit) -> Result<Self> {
        let size = window.inner_size();
        anyhow::ensure!(size.width > 0 && size.height > 0, "window has zero size");

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .context("cannot create window surface")?;

        log::info!("requesting adapter");
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no compatible GPU adapter")?;
        let info = adapter.get_info();
        log::info!("adapter: {} ({:?}, {:?})", info.name, info.backend, info.device_type);

        log::info!("requesting device");
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("lantern device"),
                required_features: init.required_features,
                required_limits: init.required_limits.clone(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("cannot create device")?;
        device.set_device_lost_callback(|reason, message| {
            log::error!("device lost: {reason:?} ({message})");
        });

        let target = SurfaceTarget::configure(surface, &adapter, &device, &init, size)?;
        let (width, height) = target.extent();
        let depth = DepthBuffer::new(&device, init.depth_format, width, height);

        Ok(Self {
            _instance: instance,
            device,
            queue,
            target,
            depth,
        })
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.target.format()
    }

    pub fn depth_format(&self) -> wgpu::TextureFormat {
        self.depth.format()
    }

    /// Window size in physical pixels, as last reported.
    pub fn size(&self) -> PhysicalSize<u32> {
        self.target.size()
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn depth_view(&self) -> &wgpu::TextureView {
        self.depth.view()
    }

    /// Follows a window resize. A 0x0 size is remembered but not applied.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if !self.target.resize(&self.device, new_size) {
            return;
        }
        let extent = self.target.extent();
        if self.depth.size() != extent {
            log::debug!("recreating depth buffer {}x{}", extent.0, extent.1);
            self.depth = DepthBuffer::new(&self.device, self.depth.format(), extent.0, extent.1);
        }
    }

    pub fn begin_frame(&self) -> Result<GpuFrame, wgpu::SurfaceError> {
        let texture = self.target.acquire()?;
        let color_view = texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("lantern frame encoder"),
            });
        Ok(GpuFrame {
            texture,
            color_view,
            encoder,
        })
    }

    /// Submits the frame's commands and presents it without waiting.
    pub fn submit(&self, frame: GpuFrame) {
        let GpuFrame {
            texture,
            color_view,
            encoder,
        } = frame;
        self.queue.submit(std::iter::once(encoder.finish()));
        drop(color_view);
        texture.present();
    }

    pub fn handle_surface_error(&mut self, err: wgpu::SurfaceError) -> SurfaceErrorAction {
        self.target.recover(&self.device, err)
    }
}
