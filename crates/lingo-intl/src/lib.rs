//! # Lingo Intl
//!
//! Runtime internationalization facade. It provides:
//!
//! - Locale normalization and per-call fallback chains
//! - A translation store with dot-path flattening and replace-on-add
//! - Cached, locale-bound formatting engines (Fluent messages, numbers,
//!   dates, times and relative times)
//! - An active locale list with a deferred, coalesced change notification
//!
//! # Example
//!
//! ```rust
//! use lingo_intl::{FormatOptions, IntlService, ManualScheduler};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), lingo_intl::IntlError> {
//! let service = IntlService::builder()
//!     .locales(["fr-FR", "en"])
//!     .scheduler(Arc::new(ManualScheduler::new()))
//!     .build()?;
//!
//! service.add_translations("fr-fr", &json!({"greeting": "Bonjour"}))?;
//! service.add_translations("en", &json!({"farewell": "Bye"}))?;
//!
//! assert_eq!(service.t("greeting", &FormatOptions::new())?, "Bonjour");
//! assert_eq!(service.t("farewell", &FormatOptions::new())?, "Bye");
//! # Ok(())
//! # }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod controller;
pub mod engine;
pub mod error;
pub mod format;
mod formatters;
pub mod loader;
pub mod locale;
mod locale_data;
pub mod scheduler;
pub mod service;
pub mod store;

pub use cache::EngineCache;
pub use controller::{ActiveLocaleController, LanguageSink, LocaleChanged, NoopLanguageSink};
pub use engine::{
    default_error_handler, EngineConfig, EngineFactory, EngineHandle, EngineIssue, ErrorHandler,
    FluentEngine, FluentEngineFactory, IntlEngine,
};
pub use error::{IntlError, IntlResult};
pub use format::{ArgValue, FormatKind, FormatOptions, FormatValue, MessageArgs, MessageDescriptor};
pub use loader::TranslationLoader;
pub use locale::{language_identifier, normalize_locale, resolve_candidates, LocaleArg};
pub use scheduler::{ManualScheduler, Scheduler, Task, TimerHandle, TokioScheduler};
pub use service::{default_missing_message, IntlService, IntlServiceBuilder, MissingMessageHandler};
pub use store::{flatten, Messages, TranslationStore};

// Option types shared with the configuration crate
pub use lingo_config::{
    DateOptions, DateStyle, Formats, NumberOptions, NumberStyle, Numeric, RelativeOptions,
    RelativeUnit, TimeStyle,
};
