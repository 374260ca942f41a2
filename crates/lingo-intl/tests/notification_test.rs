//! Deferred and coalesced locale change notification

use lingo_common::test_utils::init_test_logging;
use lingo_intl::{FormatOptions, IntlService, LanguageSink, LocaleChanged, ManualScheduler};
use parking_lot::Mutex;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::TryRecvError;

#[derive(Default)]
struct RecordingSink {
    languages: Mutex<Vec<String>>,
}

impl LanguageSink for RecordingSink {
    fn set_language(&self, locale: &str) {
        self.languages.lock().push(locale.to_string());
    }
}

#[tokio::test]
async fn test_rapid_changes_fire_one_notification() {
    init_test_logging();
    let sink = Arc::new(RecordingSink::default());
    let service = IntlService::builder()
        .locales("en-US")
        .language_sink(sink.clone())
        .build()
        .unwrap();
    let mut events = service.subscribe();

    assert!(service.set_locale(vec!["en", "fr"]));
    assert!(!service.set_locale(vec!["en", "fr"]));
    assert!(service.set_locale(vec!["en", "fr-FR"]));
    assert_eq!(*service.locale(), vec!["en", "fr-fr"]);

    let event = tokio::time::timeout(Duration::from_secs(1), events.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        event,
        LocaleChanged {
            locales: vec!["en".to_string(), "fr-fr".to_string()],
            primary: Some("en".to_string()),
        }
    );

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
    assert_eq!(sink.languages.lock().as_slice(), ["en"]);
}

#[tokio::test]
async fn test_formatting_sees_new_locale_before_notification() {
    init_test_logging();
    let service = IntlService::builder()
        .locales("en")
        .notification_delay(Duration::from_millis(50))
        .build()
        .unwrap();
    service
        .add_translations("de", &json!({"greeting": "Hallo"}))
        .unwrap();
    service
        .add_translations("en", &json!({"greeting": "Hello"}))
        .unwrap();

    service.set_locale("de");
    assert!(service.is_notification_pending());
    assert_eq!(service.t("greeting", &FormatOptions::new()).unwrap(), "Hallo");

    tokio::time::sleep(Duration::from_millis(120)).await;
    assert!(!service.is_notification_pending());
}

#[tokio::test]
async fn test_equal_sequences_never_notify() {
    init_test_logging();
    let service = IntlService::builder()
        .locales(vec!["en-US", "fr"])
        .build()
        .unwrap();
    let mut events = service.subscribe();

    assert!(!service.set_locale("en_us fr"));
    assert!(!service.set_locale(vec!["EN-us", "FR"]));

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
    assert!(!service.is_notification_pending());
}

#[tokio::test]
async fn test_dispose_cancels_pending_notification() {
    init_test_logging();
    let sink = Arc::new(RecordingSink::default());
    let service = IntlService::builder()
        .locales("en")
        .language_sink(sink.clone())
        .notification_delay(Duration::from_millis(10))
        .build()
        .unwrap();
    let mut events = service.subscribe();

    service.set_locale("fr");
    service.dispose();

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
    assert!(sink.languages.lock().is_empty());
    assert_eq!(service.primary_locale().as_deref(), Some("fr"));
}

#[test]
fn test_manual_scheduler_drives_notification() {
    init_test_logging();
    let scheduler = Arc::new(ManualScheduler::new());
    let sink = Arc::new(RecordingSink::default());
    let service = IntlService::builder()
        .locales("en")
        .scheduler(scheduler.clone())
        .language_sink(sink.clone())
        .build()
        .unwrap();
    let mut events = service.subscribe();

    service.set_locale("de");
    service.set_locale("fr");
    service.set_locale("es");
    assert!(events.try_recv().is_err());

    assert_eq!(scheduler.run_pending(), 1);
    assert_eq!(events.try_recv().unwrap().primary.as_deref(), Some("es"));
    assert!(events.try_recv().is_err());
    assert_eq!(sink.languages.lock().as_slice(), ["es"]);
}

#[test]
fn test_service_without_runtime_delivers_on_demand() {
    init_test_logging();
    let sink = Arc::new(RecordingSink::default());
    let service = IntlService::builder()
        .locales("en")
        .language_sink(sink.clone())
        .build()
        .unwrap();
    let mut events = service.subscribe();

    assert!(service.set_locale("fr"));
    assert!(service.is_notification_pending());
    assert!(events.try_recv().is_err());

    assert_eq!(service.run_pending_notifications(), 1);
    assert!(!service.is_notification_pending());
    assert_eq!(events.try_recv().unwrap().primary.as_deref(), Some("fr"));
    assert_eq!(sink.languages.lock().as_slice(), ["fr"]);
    assert_eq!(service.run_pending_notifications(), 0);
}
