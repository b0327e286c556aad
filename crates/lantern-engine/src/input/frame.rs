use std::collections::HashSet;

use super::types::{InputEvent, Key, MouseButton};

/// What changed since the previous rendered frame.
///
/// The runtime fills it while dispatching window events and clears it after
/// `App::on_frame` returns, so each event is seen by exactly one frame.
#[derive(Debug, Default)]
pub struct InputFrame {
    /// Events in arrival order.
    pub events: Vec<InputEvent>,

    pub keys_pressed: HashSet<Key>,
    pub buttons_pressed: HashSet<MouseButton>,
}

impl InputFrame {
    pub fn key_pressed(&self, key: Key) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Sum of vertical wheel movement this frame, in lines.
    pub fn wheel_lines(&self) -> f32 {
        self.events
            .iter()
            .filter_map(|ev| match ev {
                InputEvent::MouseWheel(d) => Some(d.lines_y()),
                _ => None,
            })
            .sum()
    }

    pub(crate) fn reset(&mut self) {
        self.events.clear();
        self.keys_pressed.clear();
        self.buttons_pressed.clear();
    }
}
