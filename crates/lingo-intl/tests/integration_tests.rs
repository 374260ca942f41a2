//! End-to-end tests for translation lookup, fallback and engine caching

use lingo_common::test_utils::{init_test_logging, translation_fixtures};
use lingo_intl::{
    EngineConfig, EngineFactory, EngineHandle, EngineIssue, ErrorHandler, FluentEngineFactory,
    FormatOptions, IntlEngine, IntlError, IntlResult, IntlService, LocaleArg, ManualScheduler,
    MessageDescriptor,
};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn service_with(locales: impl Into<LocaleArg>) -> IntlService {
    init_test_logging();
    let service = IntlService::builder()
        .locales(locales)
        .scheduler(Arc::new(ManualScheduler::new()))
        .build()
        .unwrap();
    service
        .add_translations("en", &translation_fixtures::english())
        .unwrap();
    service
        .add_translations("fr-FR", &translation_fixtures::french())
        .unwrap();
    service
        .add_translations("de", &translation_fixtures::german())
        .unwrap();
    service
}

#[test]
fn test_case_insensitive_locale_match() {
    init_test_logging();
    let service = IntlService::builder()
        .scheduler(Arc::new(ManualScheduler::new()))
        .build()
        .unwrap();

    service.set_locale(vec!["fr-FR"]);
    service
        .add_translations("fr-fr", &json!({"greeting": "Bonjour"}))
        .unwrap();

    assert_eq!(service.t("greeting", &FormatOptions::new()).unwrap(), "Bonjour");
}

#[test]
fn test_fallback_to_later_locale() {
    let service = service_with(vec!["de", "en"]);

    assert_eq!(service.t("farewell", &FormatOptions::new()).unwrap(), "Bye");
    assert_eq!(service.t("greeting", &FormatOptions::new()).unwrap(), "Hallo");
}

#[test]
fn test_locale_with_unicode_extension() {
    let service = service_with("de-DE-u-co-phonebk");
    service
        .add_translations("de-DE-u-co-phonebk", &json!({"greeting": "Servus"}))
        .unwrap();

    assert_eq!(service.t("greeting", &FormatOptions::new()).unwrap(), "Servus");
    assert_eq!(
        service.format_number(1234.5, &FormatOptions::new()).unwrap(),
        "1.234,5"
    );
}

#[test]
fn test_per_call_locale_override() {
    let service = service_with("en");

    let options = FormatOptions::new().locale("fr_FR.UTF-8");
    assert_eq!(service.t("greeting", &options).unwrap(), "Bonjour");

    let options = FormatOptions::new().locale("fr-FR, en");
    assert_eq!(service.t("farewell", &options).unwrap(), "Bye");
}

#[test]
fn test_interpolation_and_plurals() {
    let service = service_with("en");

    let options = FormatOptions::new().arg("name", "Ada");
    assert_eq!(service.t("welcome", &options).unwrap(), "Welcome, Ada!");

    let one = FormatOptions::new().arg("count", 1);
    let many = FormatOptions::new().arg("count", 5);
    assert_eq!(service.t("inbox.count", &one).unwrap(), "You have one message");
    assert_eq!(service.t("inbox.count", &many).unwrap(), "You have 5 messages");
}

#[test]
fn test_missing_argument_is_escalated() {
    let service = service_with("en");

    let err = service.t("welcome", &FormatOptions::new()).unwrap_err();
    assert!(matches!(err, IntlError::Format { .. }));
}

#[test]
fn test_custom_error_handler_can_swallow_everything() {
    init_test_logging();
    let swallow: ErrorHandler = Arc::new(|_: &EngineIssue| -> IntlResult<()> { Ok(()) });
    let service = IntlService::builder()
        .locales("en")
        .scheduler(Arc::new(ManualScheduler::new()))
        .error_handler(swallow)
        .build()
        .unwrap();
    service
        .add_translations("en", &json!({"welcome": "Hi { $name }"}))
        .unwrap();

    let out = service.t("welcome", &FormatOptions::new()).unwrap();
    assert!(out.starts_with("Hi "));
}

#[test]
fn test_missing_translation_is_swallowed() {
    let service = service_with(vec!["fr-fr", "de"]);

    let out = service
        .format_message(MessageDescriptor::new("nowhere"), &FormatOptions::new())
        .unwrap();
    assert_eq!(out, "Missing translation \"nowhere\" for locale \"fr-fr, de\"");
}

#[test]
fn test_custom_missing_message() {
    init_test_logging();
    let service = IntlService::builder()
        .locales("en")
        .scheduler(Arc::new(ManualScheduler::new()))
        .missing_message(Arc::new(|key: &str, _: &[String]| format!("[{key}]")))
        .build()
        .unwrap();

    assert_eq!(service.t("a.b", &FormatOptions::new()).unwrap(), "[a.b]");
}

#[test]
fn test_empty_translation_asymmetry() {
    let service = service_with("en");

    // Present but empty: lookup finds it, exists does not count it
    assert_eq!(service.lookup("inbox.empty", None).as_deref(), Some(""));
    assert!(!service.exists("inbox.empty", None).unwrap());
    assert_eq!(service.t("inbox.empty", &FormatOptions::new()).unwrap(), "");

    let chain = LocaleArg::from(vec!["en", "de"]);
    assert!(service.exists("inbox.empty", Some(&chain)).unwrap());
    assert_eq!(service.lookup("inbox.empty", Some(&chain)).as_deref(), Some(""));
}

#[test]
fn test_lookup_with_empty_candidates() {
    let service = service_with("en");
    let none = LocaleArg::Many(Vec::new());

    assert_eq!(service.lookup("greeting", Some(&none)), None);
    assert!(matches!(
        service.exists("greeting", Some(&none)),
        Err(IntlError::NoLocaleConfigured { operation: "exists" })
    ));
}

#[test]
fn test_formatting_without_locale_fails_fast() {
    let service = service_with(LocaleArg::Many(Vec::new()));

    assert!(matches!(
        service.t("greeting", &FormatOptions::new()),
        Err(IntlError::NoLocaleConfigured { .. })
    ));
    assert!(matches!(
        service.format_number(1.0, &FormatOptions::new()),
        Err(IntlError::NoLocaleConfigured { operation: "format_number" })
    ));
}

#[test]
fn test_add_translations_replaces_wholesale() {
    let service = service_with("en");

    service
        .add_translations("en", &json!({"greeting": "Hi"}))
        .unwrap();

    assert_eq!(service.lookup("greeting", None).as_deref(), Some("Hi"));
    assert_eq!(service.lookup("farewell", None), None);
    assert_eq!(service.translations_for("EN").unwrap().len(), 1);
}

#[test]
fn test_add_translations_rejects_non_objects() {
    let service = service_with("en");

    let err = service.add_translations("en", &json!(["a"])).unwrap_err();
    assert!(matches!(err, IntlError::InvalidArgument { .. }));
    assert_eq!(service.lookup("greeting", None).as_deref(), Some("Hello"));
}

#[test]
fn test_locales_lists_stored_translations() {
    let service = service_with("en");
    assert_eq!(service.locales(), vec!["de", "en", "fr-fr"]);
    assert_eq!(service.primary_locale().as_deref(), Some("en"));
}

#[test]
fn test_validate_keys_names_offender() {
    let service = service_with("en");

    let keys = [json!("greeting"), json!({"nested": true})];
    let err = service.validate_keys(&keys).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("object"));
    assert!(message.contains("nested"));
}

#[test]
fn test_locale_arg_from_json() {
    let arg = LocaleArg::try_from(&json!(["fr-FR", "en"])).unwrap();
    assert_eq!(arg.normalized(), vec!["fr-fr", "en"]);

    let err = LocaleArg::try_from(&json!(42)).unwrap_err();
    assert!(matches!(err, IntlError::InvalidArgument { .. }));
}

struct CountingFactory {
    created: AtomicUsize,
}

impl EngineFactory for CountingFactory {
    fn create(&self, config: EngineConfig) -> IntlResult<EngineHandle> {
        self.created.fetch_add(1, Ordering::SeqCst);
        FluentEngineFactory.create(config)
    }
}

#[test]
fn test_engine_cache_identity() {
    init_test_logging();
    let factory = Arc::new(CountingFactory {
        created: AtomicUsize::new(0),
    });
    let service = IntlService::builder()
        .locales(vec!["fr-FR", "en"])
        .scheduler(Arc::new(ManualScheduler::new()))
        .engine_factory(factory.clone())
        .build()
        .unwrap();

    let first = service.engine(None).unwrap();
    let second = service.engine(None).unwrap();
    service.format_number(1.5, &FormatOptions::new()).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.locale(), "fr-fr");
    assert_eq!(factory.created.load(Ordering::SeqCst), 1);

    let german = service.engine(Some(&LocaleArg::from("de"))).unwrap();
    assert!(!Arc::ptr_eq(&first, &german));
    assert_eq!(factory.created.load(Ordering::SeqCst), 2);
    assert_eq!(service.cached_engines(), 2);
}

#[test]
fn test_format_message_pattern() {
    let service = service_with("en");

    let options = FormatOptions::new().arg("n", 3);
    assert_eq!(
        service.format_message_pattern("{ $n } items", &options).unwrap(),
        "3 items"
    );
}
