//! Translation storage with flattened message keys.
//!
//! Ingesting translations for a locale **replaces** that locale's map
//! wholesale; it never deep-merges into what was there before.

use crate::error::{IntlError, IntlResult};
use crate::locale::{json_type_name, normalize_locale};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, info};

/// Flat mapping of dot-joined key to message pattern
pub type Messages = BTreeMap<String, String>;

/// Flatten a nested translation tree into dot-joined keys.
///
/// Strings are leaves, numbers and booleans are stored as their text,
/// array elements are addressed by index and nulls are skipped. Object
/// entries are visited in key order, so a literal `"a.b"` key and a nested
/// `a: { b }` collide the same way whatever order the input map iterates in.
pub fn flatten(value: &Value) -> Messages {
    let mut messages = Messages::new();
    flatten_into("", value, &mut messages);
    messages
}

fn flatten_into(prefix: &str, value: &Value, out: &mut Messages) {
    let join = |segment: &str| {
        if prefix.is_empty() {
            segment.to_string()
        } else {
            format!("{prefix}.{segment}")
        }
    };

    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            for (key, child) in entries {
                flatten_into(&join(key), child, out);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                flatten_into(&join(&index.to_string()), child, out);
            }
        }
        Value::String(text) => {
            out.insert(prefix.to_string(), text.clone());
        }
        Value::Number(number) => {
            out.insert(prefix.to_string(), number.to_string());
        }
        Value::Bool(flag) => {
            out.insert(prefix.to_string(), flag.to_string());
        }
        Value::Null => {}
    }
}

/// Translations for every ingested locale
#[derive(Debug, Default)]
pub struct TranslationStore {
    translations: HashMap<String, Arc<Messages>>,
}

impl TranslationStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Flatten `payload` and replace everything stored for `locale`.
    ///
    /// Returns the number of flattened keys. The payload must be an object.
    pub fn add_translations(&mut self, locale: &str, payload: &Value) -> IntlResult<usize> {
        if !payload.is_object() {
            return Err(IntlError::invalid_argument(format!(
                "translations for '{locale}' must be an object, got {}",
                json_type_name(payload)
            )));
        }

        let locale = normalize_locale(locale);
        let messages = flatten(payload);
        let count = messages.len();

        if self
            .translations
            .insert(locale.clone(), Arc::new(messages))
            .is_some()
        {
            debug!("Replaced existing translations for locale: {}", locale);
        }

        info!("Added {} translations for locale: {}", count, locale);
        Ok(count)
    }

    /// Flat mapping for `locale`, if it was ever ingested
    pub fn translations_for(&self, locale: &str) -> Option<Arc<Messages>> {
        self.translations.get(&normalize_locale(locale)).cloned()
    }

    /// First defined value for `key` walking `candidates` in order.
    ///
    /// Candidates are normalized before use. A present empty string counts
    /// as found and stops the walk.
    pub fn lookup(&self, key: &str, candidates: &[String]) -> Option<&str> {
        candidates.iter().find_map(|locale| {
            self.messages(locale)
                .and_then(|messages| messages.get(key))
                .map(String::as_str)
        })
    }

    /// Whether any candidate has a non-empty value for `key`.
    ///
    /// Unlike [`lookup`](Self::lookup) an empty string does not count. An
    /// empty candidate list is a configuration error, not a miss.
    pub fn exists(&self, key: &str, candidates: &[String]) -> IntlResult<bool> {
        if candidates.is_empty() {
            return Err(IntlError::NoLocaleConfigured {
                operation: "exists",
            });
        }

        Ok(candidates.iter().any(|locale| {
            self.messages(locale)
                .and_then(|messages| messages.get(key))
                .is_some_and(|value| !value.is_empty())
        }))
    }

    fn messages(&self, locale: &str) -> Option<&Messages> {
        match self.translations.get(locale) {
            Some(messages) => Some(messages.as_ref()),
            None => self
                .translations
                .get(&normalize_locale(locale))
                .map(|messages| messages.as_ref()),
        }
    }

    /// Every ingested locale, sorted
    pub fn locales(&self) -> Vec<String> {
        let mut locales: Vec<String> = self.translations.keys().cloned().collect();
        locales.sort();
        locales
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::{json, Map};

    fn candidates(locales: &[&str]) -> Vec<String> {
        locales.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_flatten_nested() {
        let messages = flatten(&json!({"a": {"b": "x", "c": "y"}}));
        assert_eq!(messages.len(), 2);
        assert_eq!(messages["a.b"], "x");
        assert_eq!(messages["a.c"], "y");
    }

    #[test]
    fn test_flatten_leaf_kinds() {
        let messages = flatten(&json!({
            "count": 3,
            "enabled": true,
            "missing": null,
            "steps": ["one", {"label": "two"}]
        }));
        assert_eq!(messages["count"], "3");
        assert_eq!(messages["enabled"], "true");
        assert!(!messages.contains_key("missing"));
        assert_eq!(messages["steps.0"], "one");
        assert_eq!(messages["steps.1.label"], "two");
    }

    #[test]
    fn test_add_replaces_instead_of_merging() {
        let mut store = TranslationStore::new();
        store.add_translations("en", &json!({"a": "1", "b": "2"})).unwrap();
        store.add_translations("EN", &json!({"c": "3"})).unwrap();

        let messages = store.translations_for("en").unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages["c"], "3");
    }

    #[test]
    fn test_add_is_idempotent() {
        let payload = json!({"nav": {"home": "Home", "back": "Back"}});
        let mut store = TranslationStore::new();
        store.add_translations("en", &payload).unwrap();
        let first = store.translations_for("en").unwrap();
        store.add_translations("en", &payload).unwrap();
        assert_eq!(*first, *store.translations_for("en").unwrap());
    }

    #[test]
    fn test_add_rejects_non_object() {
        let mut store = TranslationStore::new();
        let err = store.add_translations("en", &json!("hello")).unwrap_err();
        assert!(matches!(err, IntlError::InvalidArgument { .. }));
        assert!(store.translations_for("en").is_none());
    }

    #[test]
    fn test_translations_for_normalizes() {
        let mut store = TranslationStore::new();
        store.add_translations("fr_FR", &json!({"greeting": "Bonjour"})).unwrap();
        assert!(store.translations_for("fr-fr").is_some());
        assert!(store.translations_for("FR-FR").is_some());
        assert!(store.translations_for("de").is_none());
    }

    #[test]
    fn test_lookup_falls_through_missing_keys() {
        let mut store = TranslationStore::new();
        store.add_translations("de", &json!({"greeting": "Hallo"})).unwrap();
        store.add_translations("en", &json!({"farewell": "Bye"})).unwrap();

        assert_eq!(store.lookup("farewell", &candidates(&["de", "en"])), Some("Bye"));
        assert_eq!(store.lookup("greeting", &candidates(&["de", "en"])), Some("Hallo"));
        assert_eq!(store.lookup("farewell", &[]), None);
        assert_eq!(store.lookup("unknown", &candidates(&["de", "en"])), None);
        // locales never ingested are skipped
        assert_eq!(store.lookup("farewell", &candidates(&["xx", "en"])), Some("Bye"));
    }

    #[test]
    fn test_lookup_empty_string_wins_but_does_not_exist() {
        let mut store = TranslationStore::new();
        store.add_translations("de", &json!({"note": ""})).unwrap();
        store.add_translations("en", &json!({"note": "Note"})).unwrap();
        let chain = candidates(&["de", "en"]);

        assert_eq!(store.lookup("note", &chain), Some(""));
        assert!(store.exists("note", &chain).unwrap());
        assert!(!store.exists("note", &candidates(&["de"])).unwrap());
    }

    #[test]
    fn test_lookup_normalizes_raw_candidates() {
        let mut store = TranslationStore::new();
        store.add_translations("en-US", &json!({"greeting": "Hello"})).unwrap();

        assert_eq!(store.lookup("greeting", &candidates(&["EN_us"])), Some("Hello"));
        assert!(store.exists("greeting", &candidates(&["En-Us"])).unwrap());
    }

    #[test]
    fn test_exists_requires_candidates() {
        let store = TranslationStore::new();
        let err = store.exists("anything", &[]).unwrap_err();
        assert!(matches!(err, IntlError::NoLocaleConfigured { .. }));
    }

    #[test]
    fn test_locales_sorted() {
        let mut store = TranslationStore::new();
        store.add_translations("fr", &json!({})).unwrap();
        store.add_translations("de", &json!({})).unwrap();
        assert_eq!(store.locales(), vec!["de".to_string(), "fr".to_string()]);
    }

    proptest! {
        #[test]
        fn prop_flatten_ignores_insertion_order(
            entries in proptest::collection::btree_map("[a-c]{1,2}", "[a-z]{0,4}", 0..8)
        ) {
            let forward: Map<String, Value> = entries
                .iter()
                .map(|(k, v)| (k.clone(), json!({ "leaf": v })))
                .collect();
            let backward: Map<String, Value> = entries
                .iter()
                .rev()
                .map(|(k, v)| (k.clone(), json!({ "leaf": v })))
                .collect();

            prop_assert_eq!(
                flatten(&Value::Object(forward)),
                flatten(&Value::Object(backward))
            );
        }
    }
}
