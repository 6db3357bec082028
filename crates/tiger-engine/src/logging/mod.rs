//! Logging utilities.
//!
//! All diagnostics (fatal init failures, shader/link info logs) go through the
//! `log` facade; this module only installs the `env_logger` backend.

mod init;

pub use init::{init_logging, LoggingConfig};
