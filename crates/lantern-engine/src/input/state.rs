use std::collections::HashSet;

use super::frame::InputFrame;
use super::types::{ButtonState, InputEvent, Key, MouseButton};

/// Current input state for a single window.
#[derive(Debug, Default)]
pub struct InputState {
    pub focused: bool,

    /// Pointer position in logical pixels, `None` while outside the window.
    pub pointer_pos: Option<(f32, f32)>,

    pub keys_down: HashSet<Key>,
    pub buttons_down: HashSet<MouseButton>,
}

impl InputState {
    /// Applies an event to the current state and records transitions in `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match &ev {
            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Releases are not delivered to unfocused windows.
                    self.keys_down.clear();
                    self.buttons_down.clear();
                }
            }

            InputEvent::PointerMoved { x, y } => {
                self.pointer_pos = Some((*x, *y));
            }

            InputEvent::PointerLeft => {
                self.pointer_pos = None;
            }

            InputEvent::Key { key, state, .. } => match state {
                ButtonState::Pressed => {
                    if self.keys_down.insert(*key) {
                        frame.keys_pressed.insert(*key);
                    }
                }
                ButtonState::Released => {
                    self.keys_down.remove(key);
                }
            },

            InputEvent::PointerButton { button, state, x, y } => {
                self.pointer_pos = Some((*x, *y));
                match state {
                    ButtonState::Pressed => {
                        if self.buttons_down.insert(*button) {
                            frame.buttons_pressed.insert(*button);
                        }
                    }
                    ButtonState::Released => {
                        self.buttons_down.remove(button);
                    }
                }
            }

            InputEvent::MouseWheel(_) => {}
        }

        frame.events.push(ev);
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn button_down(&self, btn: MouseButton) -> bool {
        self.buttons_down.contains(&btn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(button: MouseButton) -> InputEvent {
        InputEvent::PointerButton { button, state: ButtonState::Pressed, x: 3.0, y: 4.0 }
    }

    fn release(button: MouseButton) -> InputEvent {
        InputEvent::PointerButton { button, state: ButtonState::Released, x: 3.0, y: 4.0 }
    }

    #[test]
    fn button_press_is_reported_once() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, press(MouseButton::Left));
        state.apply_event(&mut frame, press(MouseButton::Left));

        assert!(state.button_down(MouseButton::Left));
        assert_eq!(frame.buttons_pressed.len(), 1);
        assert_eq!(frame.events.len(), 2);
        assert_eq!(state.pointer_pos, Some((3.0, 4.0)));
    }

    #[test]
    fn release_without_press_is_ignored() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, release(MouseButton::Right));

        assert!(!state.button_down(MouseButton::Right));
        assert!(frame.buttons_pressed.is_empty());
        assert_eq!(frame.events.len(), 1);
    }

    #[test]
    fn focus_loss_clears_held_inputs() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, press(MouseButton::Left));
        state.apply_event(
            &mut frame,
            InputEvent::Key { key: Key::R, state: ButtonState::Pressed, repeat: false },
        );
        state.apply_event(&mut frame, InputEvent::Focused(false));

        assert!(!state.button_down(MouseButton::Left));
        assert!(!state.key_down(Key::R));
        assert!(frame.key_pressed(Key::R));
    }

    #[test]
    fn pointer_left_forgets_position() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, InputEvent::PointerMoved { x: 1.0, y: 2.0 });
        state.apply_event(&mut frame, InputEvent::PointerLeft);

        assert_eq!(state.pointer_pos, None);
    }

    #[test]
    fn pixel_wheel_is_scaled_to_lines() {
        let d = crate::input::WheelDelta::Pixel { x: 0.0, y: 40.0 };
        assert_eq!(d.lines_y(), 2.0);
    }
}
