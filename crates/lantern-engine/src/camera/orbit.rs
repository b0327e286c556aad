use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Vec2, Vec3};

use crate::input::{ButtonState, MouseButton};

use super::DragState;

const ELEVATION_LIMIT: f32 = FRAC_PI_2 - 1e-5;
const INERTIA_EPSILON: f32 = 1e-4;

/// Orbit parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    /// `(azimuth, elevation)` in radians.
    pub angles: Vec2,
    /// Log-scale distance: the eye sits at `exp(-zoom)` from the origin.
    pub zoom: f32,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            angles: Vec2::new(0.8, 0.5),
            zoom: -1.2,
        }
    }
}

impl CameraState {
    /// Eye position in world space.
    pub fn position(&self) -> Vec3 {
        let (sx, cx) = self.angles.x.sin_cos();
        let (sy, cy) = self.angles.y.sin_cos();
        Vec3::new(cx * cy, sx * cy, sy) * (-self.zoom).exp()
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_lh(self.position(), Vec3::ZERO, Vec3::Z)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraConfig {
    /// Radians per logical pixel of drag.
    pub drag_sensitivity: f32,
    /// Zoom change per wheel line.
    pub scroll_sensitivity: f32,
    /// Per-frame velocity decay after a drag is released.
    pub inertia: f32,
    pub zoom_min: f32,
    pub zoom_max: f32,
    pub fov_y_degrees: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            drag_sensitivity: 0.01,
            scroll_sensitivity: 0.1,
            inertia: 0.9,
            zoom_min: -5.0,
            zoom_max: 5.0,
            fov_y_degrees: 45.0,
            z_near: 0.01,
            z_far: 100.0,
        }
    }
}

/// Orbit camera with left-button drag, wheel zoom and release inertia.
#[derive(Debug, Clone, Default)]
pub struct OrbitController {
    pub config: CameraConfig,
    pub state: CameraState,
    pub drag: DragState,
}

impl OrbitController {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            config,
            state: CameraState::default(),
            drag: DragState::default(),
        }
    }

    /// Left button starts and ends a drag; other buttons are ignored.
    pub fn on_button(&mut self, button: MouseButton, state: ButtonState, x: f32, y: f32) {
        if button != MouseButton::Left {
            return;
        }
        match state {
            ButtonState::Pressed => self.drag.begin(Vec2::new(-x, y), self.state),
            ButtonState::Released => self.drag.end(),
        }
    }

    pub fn on_pointer_move(&mut self, x: f32, y: f32) {
        if !self.drag.active {
            return;
        }
        let current = Vec2::new(-x, y);
        let delta = (current - self.drag.start_mouse) * self.config.drag_sensitivity;
        self.state.angles = self.drag.start_camera.angles + delta;
        self.state.angles.y = self.state.angles.y.clamp(-ELEVATION_LIMIT, ELEVATION_LIMIT);
        self.drag.record(delta);
    }

    /// `lines` is the vertical wheel movement, positive away from the user.
    pub fn on_scroll(&mut self, lines: f32) {
        self.state.zoom += self.config.scroll_sensitivity * lines;
        self.state.zoom = self.state.zoom.clamp(self.config.zoom_min, self.config.zoom_max);
    }

    /// Applies and decays the release velocity. Returns true if the camera moved.
    pub fn update_inertia(&mut self) -> bool {
        if !self.drag.coasting(INERTIA_EPSILON) {
            return false;
        }
        self.state.angles += self.drag.velocity;
        self.state.angles.y = self.state.angles.y.clamp(-ELEVATION_LIMIT, ELEVATION_LIMIT);
        self.drag.velocity *= self.config.inertia;
        true
    }

    pub fn reset(&mut self) {
        self.state = CameraState::default();
        self.drag = DragState::default();
    }

    pub fn position(&self) -> Vec3 {
        self.state.position()
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.state.view_matrix()
    }

    /// Left-handed perspective with depth in `[0, 1]`.
    pub fn projection_matrix(&self, aspect_ratio: f32) -> Mat4 {
        Mat4::perspective_lh(
            self.config.fov_y_degrees.to_radians(),
            aspect_ratio,
            self.config.z_near,
            self.config.z_far,
        )
    }
}
