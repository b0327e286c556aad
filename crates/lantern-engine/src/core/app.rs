use winit::event::WindowEvent;

use super::ctx::FrameCtx;

/// What the runtime should do after an app callback.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application driven by `window::Runtime`.
pub trait App {
    /// Raw window event, delivered after it has been folded into the input state.
    fn on_window_event(&mut self, _event: &WindowEvent) -> AppControl {
        AppControl::Continue
    }

    /// One rendered frame.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// Called once before the window and its GPU context are dropped.
    fn on_exit(&mut self) {}
}
