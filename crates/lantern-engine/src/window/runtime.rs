use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App, AppControl, FrameCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::{translate_window_event, InputFrame, InputState};
use crate::time::FrameClock;

/// Settings of the viewer window.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub resizable: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "lantern".to_string(),
            initial_size: LogicalSize::new(640.0, 480.0),
            resizable: true,
        }
    }
}

/// Owns the event loop and the single application window.
pub struct Runtime;

impl Runtime {
    /// Opens the window and drives `app` until it exits or the window closes.
    ///
    /// Window or GPU initialization failures are returned after the event
    /// loop has shut down.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: App + 'static,
    {
        let event_loop = EventLoop::new().context("cannot create event loop")?;
        let mut driver = Driver {
            config,
            gpu_init,
            app,
            surface: None,
            started: false,
            fatal: None,
        };

        event_loop
            .run_app(&mut driver)
            .context("event loop terminated with error")?;

        driver.fatal.map_or(Ok(()), Err)
    }
}

/// Window plus everything that borrows it or is tracked per window.
#[self_referencing]
struct ViewerSurface {
    input: InputState,
    input_frame: InputFrame,
    clock: FrameClock,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct Driver<A: App> {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    surface: Option<ViewerSurface>,
    /// Set once the window was opened; `resumed` may fire again on some platforms.
    started: bool,
    fatal: Option<anyhow::Error>,
}

impl<A: App> Driver<A> {
    fn open(&mut self, event_loop: &ActiveEventLoop) -> Result<ViewerSurface> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size)
            .with_resizable(self.config.resizable);
        let window = event_loop
            .create_window(attrs)
            .context("cannot create window")?;

        let gpu_init = self.gpu_init.clone();
        ViewerSurfaceTryBuilder {
            input: InputState::default(),
            input_frame: InputFrame::default(),
            clock: FrameClock::default(),
            window,
            gpu_builder: |window| pollster::block_on(Gpu::new(window, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed")
    }

    /// Lets the app release its GPU resources, then drops window and device.
    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(surface) = self.surface.take() {
            self.app.on_exit();
            drop(surface);
            log::info!("window closed");
        }
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        let app = &mut self.app;

        let control = surface.with_mut(|fields| {
            let mut ctx = FrameCtx {
                window: fields.window,
                gpu: fields.gpu,
                input: fields.input,
                input_frame: fields.input_frame,
                time: fields.clock.tick(),
            };
            let control = app.on_frame(&mut ctx);
            fields.input_frame.reset();
            control
        });

        if control == AppControl::Exit {
            self.shutdown(event_loop);
        }
    }
}

impl<A: App> ApplicationHandler for Driver<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.started {
            return;
        }
        self.started = true;

        match self.open(event_loop) {
            Ok(surface) => {
                surface.borrow_window().request_redraw();
                self.surface = Some(surface);
            }
            Err(err) => {
                log::error!("{err:#}");
                self.fatal = Some(err);
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        // Redraw continuously; the camera may be coasting.
        event_loop.set_control_flow(ControlFlow::Wait);
        if let Some(surface) = &self.surface {
            surface.borrow_window().request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };

        surface.with_mut(|fields| {
            if let Some(ev) = translate_window_event(
                &event,
                fields.window.scale_factor(),
                fields.input.pointer_pos,
            ) {
                fields.input.apply_event(fields.input_frame, ev);
            }
        });

        if self.app.on_window_event(&event) == AppControl::Exit {
            self.shutdown(event_loop);
            return;
        }

        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),
            WindowEvent::Resized(size) => {
                log::debug!("window resized to {}x{}", size.width, size.height);
                surface.with_gpu_mut(|gpu| gpu.resize(size));
                surface.borrow_window().request_redraw();
            }
            WindowEvent::ScaleFactorChanged { .. } => {
                let size = surface.borrow_window().inner_size();
                surface.with_gpu_mut(|gpu| gpu.resize(size));
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}
