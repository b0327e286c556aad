//! Input subsystem.
//!
//! Apps see engine-owned event types only. `translate` converts winit window
//! events; `InputState` tracks what is held down and `InputFrame` what changed
//! during the current frame.

mod frame;
mod state;
mod translate;
mod types;

pub use frame::InputFrame;
pub use state::InputState;
pub use translate::translate_window_event;
pub use types::{ButtonState, InputEvent, Key, MouseButton, WheelDelta};
