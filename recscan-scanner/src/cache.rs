use crate::transport::{Endpoint, QueryParam};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Exact request tuple a cached response is stored under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestKey {
    endpoint: Endpoint,
    params: Vec<QueryParam>,
}

impl RequestKey {
    pub fn new(endpoint: Endpoint, params: &[QueryParam]) -> Self {
        Self {
            endpoint,
            params: params.to_vec(),
        }
    }
}

/// Opt-in memoization of API responses, keyed by [`RequestKey`].
///
/// Every request the client issues is a pure read of an immutable API
/// resource, so entries are never invalidated. The cache lives exactly as
/// long as the value the caller owns; share it with an `Arc` to reuse it
/// across clients.
#[derive(Debug, Default)]
pub struct ResponseCache {
    entries: Mutex<HashMap<RequestKey, Value>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &RequestKey) -> Option<Value> {
        let found = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .cloned();

        match found {
            Some(_) => self.hits.fetch_add(1, Ordering::Relaxed),
            None => self.misses.fetch_add(1, Ordering::Relaxed),
        };
        found
    }

    pub fn insert(&self, key: RequestKey, value: Value) {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key, value);
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> usize {
        self.misses.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn key(id: &str) -> RequestKey {
        RequestKey::new(
            Endpoint::Videos,
            &[("part", "snippet".to_string()), ("id", id.to_string())],
        )
    }

    #[test]
    fn test_miss_then_hit() {
        let cache = ResponseCache::new();
        assert!(cache.get(&key("a")).is_none());

        cache.insert(key("a"), json!({"items": []}));
        assert_eq!(cache.get(&key("a")), Some(json!({"items": []})));

        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_keys_differ_by_params_and_endpoint() {
        let cache = ResponseCache::new();
        cache.insert(key("a"), json!(1));

        assert!(cache.get(&key("b")).is_none());

        let other_endpoint = RequestKey::new(
            Endpoint::Channels,
            &[("part", "snippet".to_string()), ("id", "a".to_string())],
        );
        assert!(cache.get(&other_endpoint).is_none());
    }

    #[test]
    fn test_reinsert_is_idempotent() {
        let cache = ResponseCache::new();
        cache.insert(key("a"), json!(1));
        cache.insert(key("a"), json!(1));
        assert_eq!(cache.len(), 1);
        assert!(!cache.is_empty());
    }
}
