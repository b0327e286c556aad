//! Event loop and window lifetime.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
