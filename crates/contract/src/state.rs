//! Keyed state shared across plugin invocations.

use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::Value;

/// Concurrent string-keyed map with per-key atomicity and no cross-key
/// ordering guarantee. Used both as the request-scoped keyed state of a
/// pipeline execution and, separately instantiated, as the process-lifetime
/// shared cache a caching stage is constructed with. Gets clone the stored
/// value; no lock is held while a caller works with it.
#[derive(Debug, Default)]
pub struct StateStore {
    entries: RwLock<HashMap<String, Value>>,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a clone of the stored value, or `None` for an unset key.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.entries
            .read()
            .expect("state store lock poisoned")
            .get(key)
            .cloned()
    }

    pub fn put(&self, key: impl Into<String>, value: Value) {
        self.entries
            .write()
            .expect("state store lock poisoned")
            .insert(key.into(), value);
    }

    pub fn len(&self) -> usize {
        self.entries.read().expect("state store lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn get_of_unset_key_is_none_not_error() {
        let store = StateStore::new();
        assert_eq!(store.get("cache:missing"), None);
    }

    #[test]
    fn put_then_get_round_trips() {
        let store = StateStore::new();
        store.put("cache:k", json!({"v": 1}));
        assert_eq!(store.get("cache:k"), Some(json!({"v": 1})));
        store.put("cache:k", json!("overwritten"));
        assert_eq!(store.get("cache:k"), Some(json!("overwritten")));
    }

    #[test]
    fn concurrent_puts_do_not_corrupt_the_map() {
        let store = Arc::new(StateStore::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for i in 0..50 {
                        store.put(format!("cache:{t}:{i}"), json!(i));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(store.len(), 8 * 50);
        assert_eq!(store.get("cache:3:49"), Some(json!(49)));
    }
}
