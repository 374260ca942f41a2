//! Formatting engines and the error-reporting policy.
//!
//! An engine is bound to one locale and one formats registry. The service
//! never builds engines directly; it asks an [`EngineFactory`] through the
//! engine cache, so tests and embedders can substitute their own.

use crate::error::{IntlError, IntlResult};
use crate::format::{ArgValue, FormatKind, FormatOptions, FormatValue, MessageArgs};
use crate::locale::language_identifier;
use crate::locale_data::{locale_data, LocaleData, ENGLISH};
use crate::store::Messages;
use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::resolver::errors::ReferenceKind;
use fluent_bundle::resolver::ResolverError;
use fluent_bundle::{FluentArgs, FluentError, FluentResource};
use fluent_syntax::ast;
use lingo_config::Formats;
use parking_lot::RwLock;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, trace, warn};
use unic_langid::LanguageIdentifier;

/// Id of the single message each compiled pattern is wrapped in
const MESSAGE_ID: &str = "lingo-message";

/// A recoverable condition reported by an engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineIssue {
    /// No pattern exists for the message id
    #[error("Missing translation \"{id}\" for locale \"{locale}\"")]
    MissingTranslation { id: String, locale: String },

    /// A pattern references an argument the caller did not pass
    #[error("Missing argument \"{name}\" for message \"{id}\"")]
    MissingArgument { id: String, name: String },

    /// A pattern could not be parsed or resolved
    #[error("Invalid pattern for \"{id}\": {message}")]
    InvalidPattern { id: String, message: String },

    /// A named preset is absent from both formats registries
    #[error("Unknown {kind} format \"{name}\"")]
    UnknownFormat { kind: FormatKind, name: String },

    /// The value or options do not fit the requested kind
    #[error("Invalid {kind} value: {message}")]
    InvalidValue { kind: FormatKind, message: String },
}

impl EngineIssue {
    /// Kind of formatting the issue arose in
    pub fn kind(&self) -> FormatKind {
        match self {
            Self::MissingTranslation { .. }
            | Self::MissingArgument { .. }
            | Self::InvalidPattern { .. } => FormatKind::Message,
            Self::UnknownFormat { kind, .. } | Self::InvalidValue { kind, .. } => *kind,
        }
    }
}

/// Callback deciding whether an issue is swallowed (`Ok`) or escalated
pub type ErrorHandler = Arc<dyn Fn(&EngineIssue) -> IntlResult<()> + Send + Sync>;

/// Swallow missing translations and escalate everything else.
///
/// Fallback-chain lookups are expected to miss on some locales, while the
/// other issues point at a broken pattern or option.
pub fn default_error_handler() -> ErrorHandler {
    Arc::new(|issue: &EngineIssue| match issue {
        EngineIssue::MissingTranslation { .. } => {
            debug!(%issue, "Missing translation");
            Ok(())
        }
        other => {
            warn!(%other, "Formatting failed");
            Err(IntlError::Format {
                kind: other.kind(),
                message: other.to_string(),
            })
        }
    })
}

/// A handle to a locale-bound formatting engine
pub trait IntlEngine: Send + Sync + fmt::Debug {
    /// Normalized locale the engine was built for
    fn locale(&self) -> &str;

    /// Format one value
    fn format(
        &self,
        kind: FormatKind,
        value: &FormatValue,
        options: &FormatOptions,
    ) -> IntlResult<String>;
}

/// Shared engine handle, cached per (locale, formats)
pub type EngineHandle = Arc<dyn IntlEngine>;

/// Everything an engine is constructed from
#[derive(Clone)]
pub struct EngineConfig {
    /// Normalized target locale
    pub locale: String,
    /// Locale whose data backs languages without their own
    pub default_locale: String,
    /// Formats registry of the service
    pub formats: Arc<Formats>,
    /// Built-in presets consulted after `formats`
    pub default_formats: Arc<Formats>,
    /// Translations stored for `locale`
    pub messages: Arc<Messages>,
    /// Error-reporting callback
    pub on_error: ErrorHandler,
}

impl fmt::Debug for EngineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineConfig")
            .field("locale", &self.locale)
            .field("default_locale", &self.default_locale)
            .field("messages", &self.messages.len())
            .finish_non_exhaustive()
    }
}

/// Engine constructor used by the engine cache
pub trait EngineFactory: Send + Sync {
    fn create(&self, config: EngineConfig) -> IntlResult<EngineHandle>;
}

/// Builds [`FluentEngine`]s
#[derive(Debug, Default, Clone, Copy)]
pub struct FluentEngineFactory;

impl EngineFactory for FluentEngineFactory {
    fn create(&self, config: EngineConfig) -> IntlResult<EngineHandle> {
        Ok(Arc::new(FluentEngine::new(config)?))
    }
}

/// The built-in engine: Fluent messages plus locale-aware numbers, dates and
/// relative times
pub struct FluentEngine {
    locale: String,
    language: LanguageIdentifier,
    formats: Arc<Formats>,
    default_formats: Arc<Formats>,
    messages: Arc<Messages>,
    on_error: ErrorHandler,
    data: &'static LocaleData,
    bundle: FluentBundle<FluentResource>,
    patterns: RwLock<HashMap<String, Arc<FluentResource>>>,
}

impl FluentEngine {
    /// Build an engine; fails if the locale is not a valid language tag
    pub fn new(config: EngineConfig) -> IntlResult<Self> {
        let language = language_identifier(&config.locale)?;
        let data = data_for(&language)
            .or_else(|| {
                language_identifier(&config.default_locale)
                    .ok()
                    .and_then(|fallback| data_for(&fallback))
            })
            .unwrap_or(&ENGLISH);

        let mut bundle = FluentBundle::new_concurrent(vec![language.clone()]);
        bundle.set_use_isolating(false);

        debug!(
            locale = %config.locale,
            language = %language,
            data = data.language,
            messages = config.messages.len(),
            "Created formatting engine"
        );

        Ok(Self {
            locale: config.locale,
            language,
            formats: config.formats,
            default_formats: config.default_formats,
            messages: config.messages,
            on_error: config.on_error,
            data,
            bundle,
            patterns: RwLock::new(HashMap::new()),
        })
    }

    pub(crate) fn report(&self, issue: &EngineIssue) -> IntlResult<()> {
        (self.on_error)(issue)
    }

    pub(crate) fn formats(&self) -> &Formats {
        &self.formats
    }

    pub(crate) fn default_formats(&self) -> &Formats {
        &self.default_formats
    }

    pub(crate) fn locale_data(&self) -> &'static LocaleData {
        self.data
    }

    /// Primary language subtag, e.g. `"fr"`
    pub(crate) fn language(&self) -> &str {
        self.language.language.as_str()
    }

    /// Number of distinct patterns compiled so far
    pub fn compiled_patterns(&self) -> usize {
        self.patterns.read().len()
    }

    /// Format a message from an explicit pattern or this engine's messages
    pub(crate) fn format_message(
        &self,
        id: &str,
        pattern: Option<&str>,
        args: &MessageArgs,
    ) -> IntlResult<String> {
        let Some(pattern) = pattern.or_else(|| self.messages.get(id).map(String::as_str)) else {
            self.report(&EngineIssue::MissingTranslation {
                id: id.to_string(),
                locale: self.locale.clone(),
            })?;
            return Ok(id.to_string());
        };
        if pattern.trim().is_empty() {
            return Ok(pattern.to_string());
        }

        let resource = match self.compile(pattern) {
            Ok(resource) => resource,
            Err(message) => {
                self.report(&EngineIssue::InvalidPattern {
                    id: id.to_string(),
                    message,
                })?;
                return Ok(pattern.to_string());
            }
        };
        let Some(value) = message_value(&resource) else {
            return Ok(String::new());
        };

        let fluent_args = to_fluent_args(args);
        let mut errors = Vec::new();
        let formatted = self
            .bundle
            .format_pattern(value, Some(&fluent_args), &mut errors)
            .into_owned();

        // Fluent resolves the selected variant only
        let mut missing = BTreeSet::new();
        let mut other = Vec::new();
        for error in errors {
            match error {
                FluentError::ResolverError(ResolverError::Reference(ReferenceKind::Variable {
                    id: name,
                })) => {
                    missing.insert(name);
                }
                error => other.push(error),
            }
        }
        for name in missing {
            self.report(&EngineIssue::MissingArgument {
                id: id.to_string(),
                name,
            })?;
        }
        if !other.is_empty() {
            self.report(&EngineIssue::InvalidPattern {
                id: id.to_string(),
                message: format!("{:?}", other),
            })?;
        }
        Ok(formatted)
    }

    /// Parse a pattern once per engine
    fn compile(&self, pattern: &str) -> Result<Arc<FluentResource>, String> {
        if let Some(resource) = self.patterns.read().get(pattern) {
            trace!(locale = %self.locale, "Pattern cache hit");
            return Ok(Arc::clone(resource));
        }

        let resource = FluentResource::try_new(message_source(pattern))
            .map_err(|(_, errors)| format!("{:?}", errors))?;

        let mut patterns = self.patterns.write();
        let resource = patterns
            .entry(pattern.to_string())
            .or_insert_with(|| Arc::new(resource));
        Ok(Arc::clone(resource))
    }
}

impl IntlEngine for FluentEngine {
    fn locale(&self) -> &str {
        &self.locale
    }

    fn format(
        &self,
        kind: FormatKind,
        value: &FormatValue,
        options: &FormatOptions,
    ) -> IntlResult<String> {
        trace!(locale = %self.locale, %kind, "Formatting value");
        kind.formatter().format(self, value, options)
    }
}

impl fmt::Debug for FluentEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FluentEngine")
            .field("locale", &self.locale)
            .field("language", &self.language)
            .field("data", &self.data.language)
            .field("messages", &self.messages.len())
            .finish_non_exhaustive()
    }
}

fn data_for(language: &LanguageIdentifier) -> Option<&'static LocaleData> {
    locale_data(
        language.language.as_str(),
        language.region.as_ref().map(|region| region.as_str()),
    )
}

fn message_value(resource: &FluentResource) -> Option<&ast::Pattern<&str>> {
    resource.entries().find_map(|entry| match entry {
        ast::Entry::Message(message) if message.id.name == MESSAGE_ID => message.value.as_ref(),
        _ => None,
    })
}

fn to_fluent_args(args: &MessageArgs) -> FluentArgs<'_> {
    let mut fluent_args = FluentArgs::with_capacity(args.len());
    for (name, value) in args {
        match value {
            ArgValue::String(text) => fluent_args.set(name.as_str(), text.as_str()),
            ArgValue::Number(number) => fluent_args.set(name.as_str(), *number),
        }
    }
    fluent_args
}

/// Wrap `pattern` as the value of the single compiled message.
///
/// A continuation line starting with `[`, `*` or `.` outside any placeable
/// would parse as Fluent syntax, so that character is written as a string
/// literal placeable instead.
fn message_source(pattern: &str) -> String {
    let mut source = format!("{MESSAGE_ID} =");
    let mut depth = 0usize;
    for (index, line) in pattern.lines().enumerate() {
        source.push_str(if index == 0 { " " } else { "\n    " });
        let text = line.trim_start();
        if index > 0 && depth == 0 && text.starts_with(&['[', '*', '.'][..]) {
            source.push_str(&line[..line.len() - text.len()]);
            source.push_str("{\"");
            source.push_str(&text[..1]);
            source.push_str("\"}");
            source.push_str(&text[1..]);
        } else {
            source.push_str(line);
        }
        depth = placeable_depth(line, depth);
    }
    source
}

/// Brace depth after `line`, ignoring braces inside string literals
fn placeable_depth(line: &str, mut depth: usize) -> usize {
    let mut in_literal = false;
    let mut escaped = false;
    for c in line.chars() {
        if in_literal {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_literal = false,
                _ => {}
            }
            continue;
        }
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            '"' if depth > 0 => in_literal = true,
            _ => {}
        }
    }
    depth
}
