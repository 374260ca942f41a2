//! Error types for internationalization operations

use crate::format::FormatKind;
use lingo_config::ConfigError;
use thiserror::Error;

/// Errors that can occur during internationalization operations
#[derive(Error, Debug)]
pub enum IntlError {
    /// An operation needed a locale but the candidate list was empty
    #[error("No locale configured for {operation}")]
    NoLocaleConfigured { operation: &'static str },

    /// An argument had an unsupported shape or value
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// A locale could not be turned into a language identifier
    #[error("Invalid locale: {0}")]
    InvalidLocale(String),

    /// The formatting engine reported a defect (bad pattern, bad option)
    #[error("Failed to format {kind}: {message}")]
    Format { kind: FormatKind, message: String },

    /// Loading translation or configuration documents failed
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntlError {
    /// Create an invalid-argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

/// Result type for i18n operations
pub type IntlResult<T> = Result<T, IntlError>;
