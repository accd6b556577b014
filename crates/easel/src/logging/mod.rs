//! Logging utilities.
//!
//! Call sites use the `log` facade; this module only wires up `env_logger`
//! for binaries and tests that want output.

mod init;

pub use init::{init_logging, LoggingConfig};
