use std::cell::Cell;
use std::rc::Rc;

use lantern_engine::camera::{CameraConfig, OrbitController};
use lantern_engine::core::{App, AppControl, FrameCtx};
use lantern_engine::input::{InputEvent, Key};
use lantern_engine::render::{clear_color, gamma_for_format, SceneRenderer, SceneUniforms};
use lantern_engine::scene::{GpuScene, SourceAsset};

/// GPU-side state, created on the first frame once a device exists.
struct Loaded {
    scene: GpuScene,
    renderer: SceneRenderer,
}

/// Viewer application: one scene, one orbit camera.
pub struct ViewerApp {
    asset: SourceAsset,
    camera: OrbitController,
    uniforms: SceneUniforms,
    loaded: Option<Loaded>,
    /// Set when the scene cannot be built; read by `main` for the exit code.
    failed: Rc<Cell<bool>>,
}

impl ViewerApp {
    pub fn new(asset: SourceAsset, camera: CameraConfig, failed: Rc<Cell<bool>>) -> Self {
        Self {
            asset,
            camera: OrbitController::new(camera),
            uniforms: SceneUniforms::default(),
            loaded: None,
            failed,
        }
    }

    fn handle_input(&mut self, ctx: &FrameCtx<'_, '_>) {
        if ctx.input_frame.key_pressed(Key::R) {
            log::debug!("camera reset");
            self.camera.reset();
        }

        for ev in &ctx.input_frame.events {
            match ev {
                InputEvent::PointerMoved { x, y } => self.camera.on_pointer_move(*x, *y),
                InputEvent::PointerButton {
                    button,
                    state,
                    x,
                    y,
                } => self.camera.on_button(*button, *state, *x, *y),
                _ => {}
            }
        }

        let wheel = ctx.input_frame.wheel_lines();
        if wheel != 0.0 {
            self.camera.on_scroll(wheel);
        }

        self.camera.update_inertia();
    }

    fn ensure_loaded(&mut self, ctx: &FrameCtx<'_, '_>) -> bool {
        if self.loaded.is_some() {
            return true;
        }

        let rctx = ctx.render_ctx();
        match GpuScene::from_asset(rctx.device, rctx.queue, &self.asset) {
            Ok(scene) => {
                let renderer = SceneRenderer::new(&rctx);
                self.loaded = Some(Loaded { scene, renderer });
                true
            }
            Err(e) => {
                log::error!("cannot construct scene: {e}");
                self.failed.set(true);
                false
            }
        }
    }
}

impl App for ViewerApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if ctx.input_frame.key_pressed(Key::Escape) {
            return AppControl::Exit;
        }

        self.handle_input(ctx);

        if !self.ensure_loaded(ctx) {
            return AppControl::Exit;
        }

        let (gamma, aspect) = {
            let rctx = ctx.render_ctx();
            if ctx.time.frame_index == 0 {
                log::info!(
                    "rendering {}x{} to {:?}",
                    rctx.size.0,
                    rctx.size.1,
                    rctx.surface_format
                );
            }
            (gamma_for_format(rctx.surface_format), rctx.aspect_ratio())
        };

        self.uniforms.gamma = gamma;
        self.uniforms.time = ctx.time.elapsed;
        self.uniforms.set_camera(
            self.camera.projection_matrix(aspect),
            self.camera.view_matrix(),
            self.camera.position(),
        );

        let Some(loaded) = self.loaded.as_mut() else {
            return AppControl::Continue;
        };
        let uniforms = &self.uniforms;

        ctx.render(clear_color(gamma), |rctx, target| {
            loaded.renderer.render(rctx, target, &loaded.scene, uniforms);
        })
    }

    fn on_exit(&mut self) {
        if let Some(mut loaded) = self.loaded.take() {
            loaded.scene.destroy();
            log::debug!("scene released");
        }
    }
}
