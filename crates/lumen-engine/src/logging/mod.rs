//! Logger setup for binaries built on the engine.
//!
//! Libraries only use the `log` facade; `env_logger` is installed once by the
//! application through [`init_logging`].

mod init;

pub use init::{init_logging, LoggingConfig};
