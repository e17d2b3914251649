use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

#[derive(Debug, Clone)]
struct CachedResponse {
    payload: Value,
    cached_at: DateTime<Utc>,
}

/// Memoizes successful remote responses for a fixed TTL.
///
/// Keys are `(endpoint, serialized params)`. Expiry is checked lazily on
/// read; stale entries are dropped at that point.
pub struct ResponseCache {
    ttl: Duration,
    clock: Clock,
    entries: HashMap<(String, String), CachedResponse>,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(Utc::now))
    }

    pub fn with_clock(ttl: Duration, clock: Clock) -> Self {
        ResponseCache {
            ttl,
            clock,
            entries: HashMap::new(),
        }
    }

    pub fn cache_key(endpoint: &str, params: &Value) -> (String, String) {
        // serde_json maps are ordered, so equal params serialize identically
        (endpoint.to_string(), params.to_string())
    }

    pub fn get(&mut self, endpoint: &str, params: &Value) -> Option<Value> {
        let key = Self::cache_key(endpoint, params);
        let now = (self.clock)();

        let fresh = match self.entries.get(&key) {
            Some(entry) => !self.is_stale(entry, now),
            None => return None,
        };

        if fresh {
            self.entries.get(&key).map(|e| e.payload.clone())
        } else {
            self.entries.remove(&key);
            None
        }
    }

    /// Stores `payload`, dropping every entry that has already expired.
    pub fn insert(&mut self, endpoint: &str, params: &Value, payload: Value) {
        let cached_at = (self.clock)();
        let ttl = self.ttl;
        self.entries
            .retain(|_, entry| cached_at.signed_duration_since(entry.cached_at) < ttl);
        self.entries.insert(
            Self::cache_key(endpoint, params),
            CachedResponse { payload, cached_at },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn is_stale(&self, entry: &CachedResponse, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(entry.cached_at) >= self.ttl
    }
}
