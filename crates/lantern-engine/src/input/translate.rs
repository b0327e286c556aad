//! winit → engine input translation.

use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton as WinitButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use super::{ButtonState, InputEvent, Key, MouseButton, WheelDelta};

/// Converts a window event into an engine event, if it carries input.
///
/// `scale_factor` converts physical pixels to logical ones; `pointer` is the
/// last known pointer position, used for button events.
pub fn translate_window_event(
    event: &WindowEvent,
    scale_factor: f64,
    pointer: Option<(f32, f32)>,
) -> Option<InputEvent> {
    let ev = match event {
        WindowEvent::Focused(focused) => InputEvent::Focused(*focused),
        WindowEvent::CursorLeft { .. } => InputEvent::PointerLeft,
        WindowEvent::CursorMoved { position, .. } => {
            let (x, y) = logical(*position, scale_factor);
            InputEvent::PointerMoved { x, y }
        }
        WindowEvent::MouseInput { state, button, .. } => {
            let (x, y) = pointer.unwrap_or_default();
            InputEvent::PointerButton {
                button: mouse_button(*button),
                state: button_state(*state),
                x,
                y,
            }
        }
        WindowEvent::MouseWheel { delta, .. } => InputEvent::MouseWheel(match *delta {
            MouseScrollDelta::LineDelta(x, y) => WheelDelta::Line { x, y },
            MouseScrollDelta::PixelDelta(p) => {
                let (x, y) = logical(p, scale_factor);
                WheelDelta::Pixel { x, y }
            }
        }),
        WindowEvent::KeyboardInput { event, .. } => InputEvent::Key {
            key: key(event.physical_key),
            state: button_state(event.state),
            repeat: event.repeat,
        },
        _ => return None,
    };
    Some(ev)
}

fn logical(pos: PhysicalPosition<f64>, scale_factor: f64) -> (f32, f32) {
    let p = pos.to_logical::<f64>(scale_factor);
    (p.x as f32, p.y as f32)
}

fn button_state(state: ElementState) -> ButtonState {
    if state.is_pressed() {
        ButtonState::Pressed
    } else {
        ButtonState::Released
    }
}

fn mouse_button(button: WinitButton) -> MouseButton {
    match button {
        WinitButton::Left => MouseButton::Left,
        WinitButton::Right => MouseButton::Right,
        WinitButton::Middle => MouseButton::Middle,
        WinitButton::Back => MouseButton::Other(3),
        WinitButton::Forward => MouseButton::Other(4),
        WinitButton::Other(v) => MouseButton::Other(v),
    }
}

fn key(physical: PhysicalKey) -> Key {
    match physical {
        PhysicalKey::Code(KeyCode::Escape) => Key::Escape,
        PhysicalKey::Code(KeyCode::KeyR) => Key::R,
        PhysicalKey::Code(code) => Key::Other(code as u32),
        PhysicalKey::Unidentified(_) => Key::Other(u32::MAX),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::NativeKeyCode;

    #[test]
    fn known_keys_are_named() {
        assert_eq!(key(PhysicalKey::Code(KeyCode::Escape)), Key::Escape);
        assert_eq!(key(PhysicalKey::Code(KeyCode::KeyR)), Key::R);
        assert!(matches!(key(PhysicalKey::Code(KeyCode::KeyQ)), Key::Other(_)));
        assert_eq!(
            key(PhysicalKey::Unidentified(NativeKeyCode::Unidentified)),
            Key::Other(u32::MAX)
        );
    }

    #[test]
    fn mouse_buttons_map() {
        assert_eq!(mouse_button(WinitButton::Left), MouseButton::Left);
        assert_eq!(mouse_button(WinitButton::Other(9)), MouseButton::Other(9));
    }

    #[test]
    fn focus_and_unrelated_events() {
        assert_eq!(
            translate_window_event(&WindowEvent::Focused(false), 1.0, None),
            Some(InputEvent::Focused(false))
        );
        assert_eq!(translate_window_event(&WindowEvent::Destroyed, 1.0, None), None);
    }

    #[test]
    fn positions_are_converted_to_logical_pixels() {
        assert_eq!(logical(PhysicalPosition::new(200.0, 100.0), 2.0), (100.0, 50.0));
        assert_eq!(logical(PhysicalPosition::new(3.0, 4.0), 1.0), (3.0, 4.0));
    }

    #[test]
    fn element_states_map() {
        assert_eq!(button_state(ElementState::Pressed), ButtonState::Pressed);
        assert_eq!(button_state(ElementState::Released), ButtonState::Released);
    }
}
