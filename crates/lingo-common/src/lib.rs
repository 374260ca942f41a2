//! # Lingo Common
//!
//! Shared logging setup and test helpers for the lingo workspace.
//!
//! Library crates only emit `tracing` events; installing a subscriber is
//! left to binaries (through [`logging::init_logging`]) and to tests
//! (through `test_utils::init_test_logging` behind the `testing` feature).

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod logging;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use logging::{init_dev_logging, init_logging, LogFormat, LoggingConfig, LoggingError};
