//! GPU rendering subsystem.
//!
//! Renderers consume a loaded `scene::GpuScene` and issue GPU commands via
//! wgpu. Each renderer owns its pipeline and per-frame uniforms; the scene
//! owns the asset resources.
//!
//! Convention:
//! - world space is left-handed with +Z up
//! - clip-space depth is `[0, 1]`, cleared to 1.0 and tested with `Less`

mod ctx;
mod scene_renderer;

pub use ctx::{RenderCtx, RenderTarget};
pub use scene_renderer::{clear_color, gamma_for_format, SceneRenderer, SceneUniforms};
