//! Locale normalization and candidate resolution.
//!
//! Every locale string that reaches a map lookup or comparison goes through
//! [`normalize_locale`] first, so `"fr_FR"`, `"FR-fr"` and `"fr-FR.UTF-8"` all
//! address the same translations.

use crate::error::{IntlError, IntlResult};
use serde_json::Value;
use unic_langid::LanguageIdentifier;

/// Canonicalize a locale identifier.
///
/// Lowercases, turns `_` into `-` and drops POSIX encoding or modifier
/// suffixes (`.UTF-8`, `@euro`). Total over all strings.
pub fn normalize_locale(raw: &str) -> String {
    let trimmed = raw.trim();
    let tag = trimmed.split(['.', '@']).next().unwrap_or_default();
    tag.trim().replace('_', "-").to_lowercase()
}

/// A locale argument as supplied by a caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocaleArg {
    /// One locale, or several separated by commas or whitespace
    Single(String),
    /// An ordered list of locales
    Many(Vec<String>),
}

impl LocaleArg {
    /// Normalized, ordered sequence of locales; blank entries are dropped
    pub fn normalized(&self) -> Vec<String> {
        match self {
            Self::Single(raw) => raw
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|part| !part.is_empty())
                .map(normalize_locale)
                .filter(|locale| !locale.is_empty())
                .collect(),
            Self::Many(items) => items
                .iter()
                .map(|item| normalize_locale(item))
                .filter(|locale| !locale.is_empty())
                .collect(),
        }
    }
}

impl From<&str> for LocaleArg {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<String> for LocaleArg {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<String>> for LocaleArg {
    fn from(value: Vec<String>) -> Self {
        Self::Many(value)
    }
}

impl From<Vec<&str>> for LocaleArg {
    fn from(value: Vec<&str>) -> Self {
        Self::Many(value.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for LocaleArg {
    fn from(value: &[&str]) -> Self {
        Self::Many(value.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for LocaleArg {
    fn from(value: [&str; N]) -> Self {
        Self::Many(value.iter().map(|s| s.to_string()).collect())
    }
}

impl TryFrom<&Value> for LocaleArg {
    type Error = IntlError;

    fn try_from(value: &Value) -> IntlResult<Self> {
        match value {
            Value::String(s) => Ok(Self::Single(s.clone())),
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s.clone()),
                    other => Err(IntlError::invalid_argument(format!(
                        "locale list entries must be strings, got {other} ({})",
                        json_type_name(other)
                    ))),
                })
                .collect::<IntlResult<Vec<_>>>()
                .map(Self::Many),
            other => Err(IntlError::invalid_argument(format!(
                "locale must be a string or a list of strings, got {other} ({})",
                json_type_name(other)
            ))),
        }
    }
}

/// Name of a JSON value's type for error messages
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Resolve the ordered candidate locales for one call.
///
/// Without an explicit locale the active list is returned unchanged; it is
/// already normalized. Never consults the translation store.
pub fn resolve_candidates(explicit: Option<&LocaleArg>, active: &[String]) -> Vec<String> {
    match explicit {
        None => active.to_vec(),
        Some(arg) => arg.normalized(),
    }
}

/// Parse a normalized locale into a language identifier.
///
/// Extension and private-use sequences (`-u-co-phonebk`, `-x-...`) start at
/// the first single-letter subtag and are dropped.
pub fn language_identifier(locale: &str) -> IntlResult<LanguageIdentifier> {
    let base = locale
        .split('-')
        .take_while(|subtag| subtag.len() != 1)
        .collect::<Vec<_>>()
        .join("-");
    base.parse::<LanguageIdentifier>()
        .map_err(|e| IntlError::InvalidLocale(format!("{locale}: {e}")))
}
