/// Keyboard keys the engine reacts to.
///
/// Anything else is reported as `Other` with the platform key code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    R,
    Other(u32),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

/// Press/release state shared by keys and mouse buttons.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ButtonState {
    Pressed,
    Released,
}

/// Mouse wheel delta.
///
/// `Line` is "scroll lines" style input; `Pixel` comes from touchpads.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum WheelDelta {
    Line { x: f32, y: f32 },
    Pixel { x: f32, y: f32 },
}

impl WheelDelta {
    /// Logical pixels per wheel line, used to bring both variants to one scale.
    pub const PIXELS_PER_LINE: f32 = 20.0;

    /// Vertical delta expressed in lines.
    pub fn lines_y(&self) -> f32 {
        match *self {
            WheelDelta::Line { y, .. } => y,
            WheelDelta::Pixel { y, .. } => y / Self::PIXELS_PER_LINE,
        }
    }
}

/// Platform-agnostic input events emitted by the runtime.
///
/// Pointer coordinates are logical pixels, origin top-left.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerMoved { x: f32, y: f32 },
    PointerButton {
        button: MouseButton,
        state: ButtonState,
        x: f32,
        y: f32,
    },
    MouseWheel(WheelDelta),
    Key {
        key: Key,
        state: ButtonState,
        repeat: bool,
    },
    /// Pointer left the window surface.
    PointerLeft,
    /// Window focus change.
    Focused(bool),
}
