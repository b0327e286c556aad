//! Orbit camera driven by pointer drag and wheel input.
//!
//! The camera circles the origin with +Z up. State is plain data; the
//! controller owns it together with the drag state and is fed engine input
//! events by the app.

mod drag;
mod orbit;

pub use drag::DragState;
pub use orbit::{CameraConfig, CameraState, OrbitController};
