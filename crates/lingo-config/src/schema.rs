//! Configuration schema for the internationalization service.

use crate::error::{ConfigError, ConfigResult};
use lingo_common::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntlConfig {
    /// Initial active locales, most preferred first.
    pub locales: Vec<String>,
    /// Locale the formatting engines fall back to for their own data.
    pub default_locale: String,
    /// Directory of `<locale>.{json,yaml,yml,toml}` translation files.
    pub translations_dir: Option<PathBuf>,
    /// Document holding the format presets; built-in presets when absent.
    pub formats_file: Option<PathBuf>,
    /// Delay before the locale-change notification fires.
    pub notification_delay_ms: u64,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl IntlConfig {
    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.default_locale.trim().is_empty() {
            return Err(ConfigError::validation(
                "default_locale",
                "default locale cannot be empty",
            ));
        }

        if let Some(index) = self.locales.iter().position(|l| l.trim().is_empty()) {
            return Err(ConfigError::validation(
                "locales",
                format!("entry {index} is empty"),
            ));
        }

        if let Some(dir) = &self.translations_dir {
            if !dir.is_dir() {
                return Err(ConfigError::validation(
                    "translations_dir",
                    format!("{} is not a directory", dir.display()),
                ));
            }
        }

        Ok(())
    }
}
