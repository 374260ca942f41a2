//! Loading translation documents from a directory

use crate::error::IntlResult;
use crate::locale::normalize_locale;
use lingo_config::{parse_document, DocumentFormat};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reads `<locale>.{json,yaml,yml,toml}` files from one directory.
///
/// The file stem names the locale; the document is a nested tree of
/// messages, flattened when ingested.
#[derive(Debug, Clone)]
pub struct TranslationLoader {
    base_dir: PathBuf,
}

impl TranslationLoader {
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    /// Directory the loader reads from
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Parse every translation document, ordered by file name.
    ///
    /// Files with other extensions are skipped. A document that fails to
    /// parse aborts the load.
    pub fn documents(&self) -> IntlResult<Vec<(String, Value)>> {
        let mut paths = fs::read_dir(&self.base_dir)?
            .map(|entry| entry.map(|entry| entry.path()))
            .collect::<Result<Vec<_>, _>>()?;
        paths.sort();

        let mut documents = Vec::with_capacity(paths.len());
        for path in paths {
            let Some(locale) = translation_locale(&path) else {
                debug!("Skipping non-translation file: {}", path.display());
                continue;
            };
            let document = parse_document::<Value>(&path)?;
            debug!(%locale, "Parsed translation file: {}", path.display());
            documents.push((locale, document));
        }
        Ok(documents)
    }
}

/// Locale named by a translation file, if `path` is one
fn translation_locale(path: &Path) -> Option<String> {
    if !path.is_file() {
        return None;
    }
    DocumentFormat::from_path(path)?;
    let locale = normalize_locale(path.file_stem()?.to_str()?);
    (!locale.is_empty()).then_some(locale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translation_locale_from_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("fr_FR.json");
        let notes = dir.path().join("README.md");
        fs::write(&json, "{}").unwrap();
        fs::write(&notes, "notes").unwrap();

        assert_eq!(translation_locale(&json).as_deref(), Some("fr-fr"));
        assert_eq!(translation_locale(&notes), None);
        assert_eq!(translation_locale(Path::new("/nonexistent/en.json")), None);
    }
}
