//! Active locale state and deferred change notification.
//!
//! The controller has two states: idle, and notification-pending. Setting a
//! different locale list swaps it in immediately and (re)arms a single
//! deferred notification; several changes before it fires produce one
//! [`LocaleChanged`] event carrying the final list.

use crate::locale::LocaleArg;
use crate::scheduler::{Scheduler, TimerHandle};
use arc_swap::ArcSwap;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, info};

/// Capacity of the change event channel
const EVENT_CAPACITY: usize = 16;

/// Broadcast after the active locales changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleChanged {
    /// The new active locale list
    pub locales: Vec<String>,
    /// First entry of `locales`, if any
    pub primary: Option<String>,
}

/// Receives the new primary locale, e.g. to update a UI language attribute.
///
/// Writes are best effort; implementations should not block.
pub trait LanguageSink: Send + Sync {
    fn set_language(&self, locale: &str);
}

/// Sink for environments without a UI language
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLanguageSink;

impl LanguageSink for NoopLanguageSink {
    fn set_language(&self, _locale: &str) {}
}

/// Owns the active locale list
pub struct ActiveLocaleController {
    locales: Arc<ArcSwap<Vec<String>>>,
    pending: Mutex<Option<TimerHandle>>,
    events: broadcast::Sender<LocaleChanged>,
    sink: Arc<dyn LanguageSink>,
    scheduler: Arc<dyn Scheduler>,
    delay: Duration,
}

impl ActiveLocaleController {
    /// Create a controller; the initial locales do not trigger a notification
    pub fn new(
        initial: &LocaleArg,
        scheduler: Arc<dyn Scheduler>,
        sink: Arc<dyn LanguageSink>,
        delay: Duration,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            locales: Arc::new(ArcSwap::from_pointee(initial.normalized())),
            pending: Mutex::new(None),
            events,
            sink,
            scheduler,
            delay,
        }
    }

    /// Current active locales
    pub fn locales(&self) -> Arc<Vec<String>> {
        self.locales.load_full()
    }

    /// First active locale
    pub fn primary_locale(&self) -> Option<String> {
        self.locales.load().first().cloned()
    }

    /// Replace the active locales.
    ///
    /// Returns `false` without side effects when the normalized list equals
    /// the current one. Otherwise the new list is visible to the next call
    /// on any thread and one notification is scheduled, replacing any
    /// notification still pending.
    pub fn set_locales(&self, raw: &LocaleArg) -> bool {
        let next = raw.normalized();
        let mut pending = self.pending.lock();
        if **self.locales.load() == next {
            debug!(locales = ?next, "Active locales unchanged");
            return false;
        }

        info!(locales = ?next, "Active locales changed");
        self.locales.store(Arc::new(next));

        if let Some(previous) = pending.take() {
            if previous.cancel() {
                debug!("Coalesced pending locale notification");
            }
        }

        let locales = Arc::clone(&self.locales);
        let events = self.events.clone();
        let sink = Arc::clone(&self.sink);
        let timer = self.scheduler.schedule(
            self.delay,
            Box::new(move || notify(&locales, &events, sink.as_ref())),
        );
        *pending = Some(timer);
        true
    }

    /// Subscribe to change events
    pub fn subscribe(&self) -> broadcast::Receiver<LocaleChanged> {
        self.events.subscribe()
    }

    /// Whether a change notification has been scheduled but not delivered
    pub fn is_notification_pending(&self) -> bool {
        self.pending
            .lock()
            .as_ref()
            .is_some_and(TimerHandle::is_pending)
    }

    /// Deliver due notifications on a host-driven scheduler; returns how many ran
    pub fn run_pending_notifications(&self) -> usize {
        self.scheduler.run_pending()
    }

    /// Cancel any pending notification. Idempotent.
    pub fn dispose(&self) {
        if let Some(timer) = self.pending.lock().take() {
            if timer.cancel() {
                debug!("Cancelled pending locale notification");
            }
        }
    }
}

/// Broadcast the current locales, then update the language sink
fn notify(
    locales: &ArcSwap<Vec<String>>,
    events: &broadcast::Sender<LocaleChanged>,
    sink: &dyn LanguageSink,
) {
    let locales = locales.load_full();
    let primary = locales.first().cloned();
    let delivered = events
        .send(LocaleChanged {
            locales: locales.as_ref().clone(),
            primary: primary.clone(),
        })
        .unwrap_or(0);
    debug!(subscribers = delivered, ?primary, "Locale change notified");

    if let Some(primary) = primary {
        sink.set_language(&primary);
    }
}

impl Drop for ActiveLocaleController {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for ActiveLocaleController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveLocaleController")
            .field("locales", &**self.locales.load())
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}
