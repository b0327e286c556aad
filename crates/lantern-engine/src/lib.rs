//! Lantern engine crate.
//!
//! This crate owns the platform + GPU runtime pieces, the glTF scene loader
//! and the renderer that draws it.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod camera;
pub mod render;
pub mod scene;
