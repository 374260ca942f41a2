//! Loading configuration and format presets from TOML, YAML or JSON files.

use crate::error::{ConfigError, ConfigResult};
use crate::formats::Formats;
use crate::schema::IntlConfig;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable overriding the initial locales (comma separated)
pub const LOCALES_ENV: &str = "LINGO_LOCALES";

/// Environment variable overriding the translations directory
pub const TRANSLATIONS_DIR_ENV: &str = "LINGO_TRANSLATIONS_DIR";

/// Supported document syntaxes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Toml,
    Yaml,
    Json,
}

impl DocumentFormat {
    /// Detect the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "toml" => Some(Self::Toml),
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Read and deserialize a document, picking the parser by extension
pub fn parse_document<T: DeserializeOwned>(path: &Path) -> ConfigResult<T> {
    let format = DocumentFormat::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    debug!("Parsing {:?} document: {}", format, path.display());

    match format {
        DocumentFormat::Toml => toml::from_str(&content).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        }),
        DocumentFormat::Yaml => {
            serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
                path: path.to_path_buf(),
                source,
            })
        }
        DocumentFormat::Json => {
            serde_json::from_str(&content).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })
        }
    }
}

/// Configuration loader.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    path: PathBuf,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the configuration document
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads configuration from file, applies environment overrides and validates it.
    pub fn load(&self) -> ConfigResult<IntlConfig> {
        let mut config: IntlConfig = parse_document(&self.path)?;
        apply_overrides(&mut config, |key| std::env::var(key).ok());
        config.validate()?;

        info!(
            "Loaded configuration from {} (locales: {:?})",
            self.path.display(),
            config.locales
        );
        Ok(config)
    }
}

/// Apply environment overrides through `lookup`
pub fn apply_overrides<F>(config: &mut IntlConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup(LOCALES_ENV) {
        let locales: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();
        if !locales.is_empty() {
            debug!("Overriding locales from {}: {:?}", LOCALES_ENV, locales);
            config.locales = locales;
        }
    }

    if let Some(dir) = lookup(TRANSLATIONS_DIR_ENV) {
        debug!("Overriding translations_dir from {}: {}", TRANSLATIONS_DIR_ENV, dir);
        config.translations_dir = Some(PathBuf::from(dir));
    }
}

/// Resolve the format presets for `config`.
///
/// Reads `formats_file` when set, otherwise returns the built-in registry.
pub fn load_formats(config: &IntlConfig) -> ConfigResult<Formats> {
    match &config.formats_file {
        Some(path) => {
            let formats = parse_document(path)?;
            info!("Loaded format presets from {}", path.display());
            Ok(formats)
        }
        None => Ok(Formats::default()),
    }
}
