//! # Lingo Config
//!
//! Configuration for the lingo internationalization service.
//!
//! This crate provides the service configuration schema, the registry of
//! named format presets shared by every formatting call, and loading of both
//! from TOML, YAML or JSON documents.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod defaults;
pub mod error;
pub mod formats;
pub mod loader;
pub mod schema;

pub use error::{ConfigError, ConfigResult};
pub use formats::*;
pub use loader::*;
pub use schema::*;
