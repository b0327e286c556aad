//! Logger initialization. The rest of the workspace only uses the `log` macros.

mod init;

pub use init::{init_logging, LoggingConfig};
