//! Memoized engine construction keyed by (locale, formats registry)

use crate::engine::{EngineConfig, EngineFactory, EngineHandle};
use crate::error::IntlResult;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use lingo_config::Formats;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Cache key: normalized locale plus the identity of the formats registry.
///
/// The registry is compared by address. Every cached engine holds an `Arc`
/// to its registry, so an address cannot be reused while its entry exists.
type CacheKey = (String, usize);

/// Engine cache guaranteeing at most one construction per key
pub struct EngineCache {
    factory: Arc<dyn EngineFactory>,
    engines: DashMap<CacheKey, EngineHandle>,
}

impl EngineCache {
    pub fn new(factory: Arc<dyn EngineFactory>) -> Self {
        Self {
            factory,
            engines: DashMap::new(),
        }
    }

    /// Return the engine for `locale` and `formats`, building it on first use.
    ///
    /// `make_config` only runs when the entry is missing. Construction holds
    /// the shard lock for the key, so concurrent callers for the same key wait
    /// for the first one and receive its handle. A failed construction leaves
    /// no entry behind.
    pub fn get(
        &self,
        locale: &str,
        formats: &Arc<Formats>,
        make_config: impl FnOnce() -> EngineConfig,
    ) -> IntlResult<EngineHandle> {
        let key = (locale.to_string(), Arc::as_ptr(formats) as usize);

        if let Some(engine) = self.engines.get(&key) {
            trace!(locale, "Engine cache hit");
            return Ok(Arc::clone(engine.value()));
        }

        match self.engines.entry(key) {
            Entry::Occupied(entry) => Ok(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                let engine = self.factory.create(make_config())?;
                debug!(locale, "Engine cached");
                Ok(Arc::clone(entry.insert(engine).value()))
            }
        }
    }

    /// Number of cached engines
    pub fn len(&self) -> usize {
        self.engines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }

    /// Drop the engines built for `locale`; returns how many were dropped
    pub fn evict_locale(&self, locale: &str) -> usize {
        let before = self.engines.len();
        self.engines.retain(|(cached, _), _| cached != locale);
        let evicted = before.saturating_sub(self.engines.len());
        if evicted > 0 {
            debug!(locale, evicted, "Evicted cached engines");
        }
        evicted
    }

    /// Drop every cached engine
    pub fn clear(&self) {
        self.engines.clear();
    }
}

impl fmt::Debug for EngineCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineCache")
            .field("engines", &self.engines.len())
            .finish_non_exhaustive()
    }
}
