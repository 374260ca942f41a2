//! The internationalization service: translation storage, locale state and
//! the formatting entry points.
//!
//! Every formatting call resolves its candidate locales (the per-call
//! `locale` option, else the active list), picks the first as the primary
//! locale, fetches the engine for it from the cache and delegates. Message
//! formatting additionally looks the pattern up through the whole candidate
//! chain, so a key missing in the primary locale falls back to later ones.

use crate::cache::EngineCache;
use crate::controller::{ActiveLocaleController, LanguageSink, LocaleChanged, NoopLanguageSink};
use crate::engine::{
    default_error_handler, EngineConfig, EngineFactory, EngineHandle, EngineIssue, ErrorHandler,
    FluentEngineFactory,
};
use crate::error::{IntlError, IntlResult};
use crate::format::{FormatKind, FormatOptions, FormatValue, MessageDescriptor};
use crate::loader::TranslationLoader;
use crate::locale::{json_type_name, normalize_locale, resolve_candidates, LocaleArg};
use crate::scheduler::{default_scheduler, Scheduler};
use crate::store::{Messages, TranslationStore};
use lingo_config::defaults::DEFAULT_LOCALE;
use lingo_config::{load_formats, Formats, IntlConfig};
use parking_lot::RwLock;
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, info};

/// Produces the text returned for a message no candidate locale has
pub type MissingMessageHandler = Arc<dyn Fn(&str, &[String]) -> String + Send + Sync>;

/// `Missing translation "<key>" for locale "<candidates>"`
pub fn default_missing_message() -> MissingMessageHandler {
    Arc::new(|key: &str, locales: &[String]| {
        format!(
            "Missing translation \"{key}\" for locale \"{}\"",
            locales.join(", ")
        )
    })
}

/// Runtime internationalization service
pub struct IntlService {
    store: RwLock<TranslationStore>,
    controller: ActiveLocaleController,
    cache: EngineCache,
    formats: Arc<Formats>,
    default_formats: Arc<Formats>,
    default_locale: String,
    on_error: ErrorHandler,
    missing_message: MissingMessageHandler,
}

impl IntlService {
    pub fn builder() -> IntlServiceBuilder {
        IntlServiceBuilder::default()
    }

    /// Every locale with stored translations, sorted
    pub fn locales(&self) -> Vec<String> {
        self.store.read().locales()
    }

    /// The active locale list
    pub fn locale(&self) -> Arc<Vec<String>> {
        self.controller.locales()
    }

    /// Replace the active locales; see [`ActiveLocaleController::set_locales`]
    pub fn set_locale(&self, locales: impl Into<LocaleArg>) -> bool {
        self.controller.set_locales(&locales.into())
    }

    /// First active locale
    pub fn primary_locale(&self) -> Option<String> {
        self.controller.primary_locale()
    }

    /// Subscribe to locale change events
    pub fn subscribe(&self) -> broadcast::Receiver<LocaleChanged> {
        self.controller.subscribe()
    }

    /// Whether a locale change notification is still to be delivered
    pub fn is_notification_pending(&self) -> bool {
        self.controller.is_notification_pending()
    }

    /// Deliver a due locale notification when no tokio runtime drives it.
    ///
    /// Services built outside a runtime queue their notification until this
    /// is called; with a runtime it returns 0.
    pub fn run_pending_notifications(&self) -> usize {
        self.controller.run_pending_notifications()
    }

    /// Replace the translations of `locale` with the flattened `payload`
    pub fn add_translations(&self, locale: &str, payload: &Value) -> IntlResult<usize> {
        let count = self.store.write().add_translations(locale, payload)?;
        // Engines carry a snapshot of their locale's messages
        self.cache.evict_locale(&normalize_locale(locale));
        Ok(count)
    }

    /// Flat translations stored for `locale`
    pub fn translations_for(&self, locale: &str) -> Option<Arc<Messages>> {
        self.store.read().translations_for(locale)
    }

    /// Load every translation document in `dir`; returns the locales loaded
    pub fn load_translations(&self, dir: impl AsRef<Path>) -> IntlResult<Vec<String>> {
        let loader = TranslationLoader::new(dir);
        let mut locales = Vec::new();
        for (locale, document) in loader.documents()? {
            self.add_translations(&locale, &document)?;
            locales.push(locale);
        }
        info!(dir = %loader.base_dir().display(), ?locales, "Loaded translations");
        Ok(locales)
    }

    /// First stored value for `key` across the candidate locales
    pub fn lookup(&self, key: &str, locale: Option<&LocaleArg>) -> Option<String> {
        let candidates = self.candidates(locale);
        self.store
            .read()
            .lookup(key, &candidates)
            .map(str::to_string)
    }

    /// Whether any candidate locale has a non-empty value for `key`
    pub fn exists(&self, key: &str, locale: Option<&LocaleArg>) -> IntlResult<bool> {
        let candidates = self.candidates(locale);
        self.store.read().exists(key, &candidates)
    }

    /// Shorthand for [`format_message`](Self::format_message) with a bare key
    pub fn t(&self, key: &str, options: &FormatOptions) -> IntlResult<String> {
        self.format_message(MessageDescriptor::new(key), options)
    }

    /// Format a stored message.
    ///
    /// Falls back to the descriptor's default message, then the options'
    /// default message. When none exists the miss is reported to the error
    /// handler and the missing-message text is returned.
    pub fn format_message(
        &self,
        descriptor: impl Into<MessageDescriptor>,
        options: &FormatOptions,
    ) -> IntlResult<String> {
        let descriptor = descriptor.into();
        let candidates = self.candidates(options.locale.as_ref());
        let engine = self.engine_for(&candidates, "format_message")?;

        let pattern = self
            .store
            .read()
            .lookup(&descriptor.id, &candidates)
            .map(str::to_string)
            .or_else(|| descriptor.default_message.clone())
            .or_else(|| options.default_message.clone());

        let Some(pattern) = pattern else {
            (self.on_error)(&EngineIssue::MissingTranslation {
                id: descriptor.id.clone(),
                locale: candidates.join(", "),
            })?;
            return Ok((self.missing_message)(&descriptor.id, &candidates));
        };

        engine.format(
            FormatKind::Message,
            &FormatValue::Message {
                id: descriptor.id,
                pattern: Some(pattern),
            },
            options,
        )
    }

    /// Format a raw message pattern without consulting the store
    pub fn format_message_pattern(&self, pattern: &str, options: &FormatOptions) -> IntlResult<String> {
        let value = FormatValue::Message {
            id: pattern.to_string(),
            pattern: Some(pattern.to_string()),
        };
        self.format_with(FormatKind::Message, "format_message_pattern", value, options)
    }

    pub fn format_date(&self, value: impl Into<FormatValue>, options: &FormatOptions) -> IntlResult<String> {
        self.format_with(FormatKind::Date, "format_date", value.into(), options)
    }

    pub fn format_time(&self, value: impl Into<FormatValue>, options: &FormatOptions) -> IntlResult<String> {
        self.format_with(FormatKind::Time, "format_time", value.into(), options)
    }

    pub fn format_number(&self, value: impl Into<FormatValue>, options: &FormatOptions) -> IntlResult<String> {
        self.format_with(FormatKind::Number, "format_number", value.into(), options)
    }

    /// Format `value` units of time relative to now; the unit comes from
    /// `options.relative` or the named preset and defaults to seconds
    pub fn format_relative(&self, value: f64, options: &FormatOptions) -> IntlResult<String> {
        self.format_with(FormatKind::Relative, "format_relative", value.into(), options)
    }

    /// Engine for the primary candidate locale
    pub fn engine(&self, locale: Option<&LocaleArg>) -> IntlResult<EngineHandle> {
        let candidates = self.candidates(locale);
        self.engine_for(&candidates, "engine")
    }

    /// Number of cached engines
    pub fn cached_engines(&self) -> usize {
        self.cache.len()
    }

    /// Check that every key is a string
    pub fn validate_keys<'a>(&self, keys: &'a [Value]) -> IntlResult<Vec<&'a str>> {
        keys.iter()
            .enumerate()
            .map(|(index, key)| {
                key.as_str().ok_or_else(|| {
                    IntlError::invalid_argument(format!(
                        "translation keys must be strings, got {key} ({}) at index {index}",
                        json_type_name(key)
                    ))
                })
            })
            .collect()
    }

    /// Cancel the pending locale notification, then drop cached engines
    pub fn dispose(&self) {
        self.controller.dispose();
        self.cache.clear();
        debug!("Disposed intl service");
    }

    fn candidates(&self, explicit: Option<&LocaleArg>) -> Vec<String> {
        resolve_candidates(explicit, &self.controller.locales())
    }

    fn engine_for(&self, candidates: &[String], operation: &'static str) -> IntlResult<EngineHandle> {
        let primary = candidates
            .first()
            .ok_or(IntlError::NoLocaleConfigured { operation })?;

        self.cache.get(primary, &self.formats, || EngineConfig {
            locale: primary.clone(),
            default_locale: self.default_locale.clone(),
            formats: Arc::clone(&self.formats),
            default_formats: Arc::clone(&self.default_formats),
            messages: self
                .store
                .read()
                .translations_for(primary)
                .unwrap_or_default(),
            on_error: Arc::clone(&self.on_error),
        })
    }

    fn format_with(
        &self,
        kind: FormatKind,
        operation: &'static str,
        value: FormatValue,
        options: &FormatOptions,
    ) -> IntlResult<String> {
        let candidates = self.candidates(options.locale.as_ref());
        let engine = self.engine_for(&candidates, operation)?;
        engine.format(kind, &value, options)
    }
}

impl fmt::Debug for IntlService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntlService")
            .field("controller", &self.controller)
            .field("cache", &self.cache)
            .field("default_locale", &self.default_locale)
            .finish_non_exhaustive()
    }
}

/// Builder for [`IntlService`]
pub struct IntlServiceBuilder {
    locales: LocaleArg,
    default_locale: String,
    formats: Option<Formats>,
    engine_factory: Arc<dyn EngineFactory>,
    scheduler: Option<Arc<dyn Scheduler>>,
    language_sink: Arc<dyn LanguageSink>,
    error_handler: ErrorHandler,
    missing_message: MissingMessageHandler,
    notification_delay: Duration,
    translations_dir: Option<PathBuf>,
}

impl Default for IntlServiceBuilder {
    fn default() -> Self {
        Self {
            locales: LocaleArg::from(DEFAULT_LOCALE),
            default_locale: DEFAULT_LOCALE.to_string(),
            formats: None,
            engine_factory: Arc::new(FluentEngineFactory),
            scheduler: None,
            language_sink: Arc::new(NoopLanguageSink),
            error_handler: default_error_handler(),
            missing_message: default_missing_message(),
            notification_delay: Duration::ZERO,
            translations_dir: None,
        }
    }
}

impl IntlServiceBuilder {
    /// Start from a loaded configuration.
    ///
    /// Reads the formats file if one is configured; the translations
    /// directory is loaded by [`build`](Self::build).
    pub fn from_config(config: &IntlConfig) -> IntlResult<Self> {
        Ok(Self {
            locales: LocaleArg::Many(config.locales.clone()),
            default_locale: config.default_locale.clone(),
            formats: Some(load_formats(config)?),
            notification_delay: Duration::from_millis(config.notification_delay_ms),
            translations_dir: config.translations_dir.clone(),
            ..Self::default()
        })
    }

    /// Initial active locales
    pub fn locales(mut self, locales: impl Into<LocaleArg>) -> Self {
        self.locales = locales.into();
        self
    }

    /// Locale whose data backs languages without their own
    pub fn default_locale(mut self, locale: &str) -> Self {
        self.default_locale = normalize_locale(locale);
        self
    }

    /// Formats registry; the built-in presets when not set
    pub fn formats(mut self, formats: Formats) -> Self {
        self.formats = Some(formats);
        self
    }

    pub fn engine_factory(mut self, factory: Arc<dyn EngineFactory>) -> Self {
        self.engine_factory = factory;
        self
    }

    /// Scheduler for change notifications; the current tokio runtime when not set
    pub fn scheduler(mut self, scheduler: Arc<dyn Scheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    pub fn language_sink(mut self, sink: Arc<dyn LanguageSink>) -> Self {
        self.language_sink = sink;
        self
    }

    pub fn error_handler(mut self, handler: ErrorHandler) -> Self {
        self.error_handler = handler;
        self
    }

    pub fn missing_message(mut self, handler: MissingMessageHandler) -> Self {
        self.missing_message = handler;
        self
    }

    pub fn notification_delay(mut self, delay: Duration) -> Self {
        self.notification_delay = delay;
        self
    }

    /// Directory of translation files loaded by [`build`](Self::build)
    pub fn translations_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.translations_dir = Some(dir.into());
        self
    }

    pub fn build(self) -> IntlResult<IntlService> {
        let scheduler = self.scheduler.unwrap_or_else(default_scheduler);
        let controller = ActiveLocaleController::new(
            &self.locales,
            scheduler,
            self.language_sink,
            self.notification_delay,
        );

        let service = IntlService {
            store: RwLock::new(TranslationStore::new()),
            controller,
            cache: EngineCache::new(self.engine_factory),
            formats: Arc::new(self.formats.unwrap_or_default()),
            default_formats: Arc::new(Formats::default()),
            default_locale: normalize_locale(&self.default_locale),
            on_error: self.error_handler,
            missing_message: self.missing_message,
        };

        if let Some(dir) = self.translations_dir {
            service.load_translations(dir)?;
        }

        info!(
            locales = ?service.locale(),
            default_locale = %service.default_locale,
            "Intl service ready"
        );
        Ok(service)
    }
}

impl fmt::Debug for IntlServiceBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntlServiceBuilder")
            .field("locales", &self.locales)
            .field("default_locale", &self.default_locale)
            .field("notification_delay", &self.notification_delay)
            .field("translations_dir", &self.translations_dir)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::ManualScheduler;
    use serde_json::json;

    fn service(locales: &str) -> IntlService {
        IntlService::builder()
            .locales(locales)
            .scheduler(Arc::new(ManualScheduler::new()))
            .build()
            .unwrap()
    }

    #[test]
    fn test_validate_keys() {
        let service = service("en");
        let keys = [json!("a"), json!("b.c")];
        assert_eq!(service.validate_keys(&keys).unwrap(), vec!["a", "b.c"]);

        let err = service.validate_keys(&[json!("a"), json!(42)]).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("42"));
        assert!(message.contains("number"));
        assert!(message.contains("index 1"));
    }

    #[test]
    fn test_add_translations_refreshes_engine_messages() {
        let service = service("en");
        service.add_translations("en", &json!({"a": "1"})).unwrap();
        service.engine(None).unwrap();
        assert_eq!(service.cached_engines(), 1);

        service.add_translations("EN", &json!({"a": "2"})).unwrap();
        assert_eq!(service.cached_engines(), 0);
        assert_eq!(service.t("a", &FormatOptions::new()).unwrap(), "2");
    }

    #[test]
    fn test_default_messages() {
        let service = service("en");

        let descriptor = MessageDescriptor::new("nope").with_default("Hi { $name }");
        let options = FormatOptions::new().arg("name", "Ada");
        assert_eq!(service.format_message(descriptor, &options).unwrap(), "Hi Ada");

        let options = FormatOptions::new().default_message("Fallback");
        assert_eq!(service.t("nope", &options).unwrap(), "Fallback");
    }

    #[test]
    fn test_missing_message_text() {
        let service = service("de, en");
        assert_eq!(
            service.t("nope", &FormatOptions::new()).unwrap(),
            "Missing translation \"nope\" for locale \"de, en\""
        );
    }

    #[test]
    fn test_dispose_clears_engines() {
        let service = service("en");
        service.engine(None).unwrap();
        service.dispose();
        assert_eq!(service.cached_engines(), 0);
    }
}
