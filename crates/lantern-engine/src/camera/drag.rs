use glam::Vec2;

use super::CameraState;

/// Pointer-drag bookkeeping for the orbit camera.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DragState {
    pub active: bool,
    /// Pointer position at drag start, x negated.
    pub start_mouse: Vec2,
    pub start_camera: CameraState,
    /// Angle change of the last pointer event; applied per frame after release.
    pub velocity: Vec2,
    pub previous_delta: Vec2,
}

impl DragState {
    pub fn begin(&mut self, mouse: Vec2, camera: CameraState) {
        self.active = true;
        self.start_mouse = mouse;
        self.start_camera = camera;
        self.previous_delta = Vec2::ZERO;
        self.velocity = Vec2::ZERO;
    }

    pub fn end(&mut self) {
        self.active = false;
    }

    /// Records the accumulated angle delta of the current drag.
    pub fn record(&mut self, delta: Vec2) {
        self.velocity = delta - self.previous_delta;
        self.previous_delta = delta;
    }

    /// True while released and moving faster than `eps` on either axis.
    pub fn coasting(&self, eps: f32) -> bool {
        !self.active && (self.velocity.x.abs() >= eps || self.velocity.y.abs() >= eps)
    }
}
