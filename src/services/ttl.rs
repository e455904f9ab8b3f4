use dashmap::DashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct Entry<T> {
    value: T,
    expires_at: Instant,
}

impl<T: Clone> Entry<T> {
    fn live_value(&self) -> Option<T> {
        (Instant::now() < self.expires_at).then(|| self.value.clone())
    }
}

/// A single-slot cache with TTL expiry and no eviction policy.
#[derive(Debug)]
pub struct TtlCell<T> {
    slot: RwLock<Option<Entry<T>>>,
    ttl: Duration,
}

impl<T: Clone> TtlCell<T> {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self { slot: RwLock::new(None), ttl }
    }

    pub fn get(&self) -> Option<T> {
        self.slot.read().expect("cache lock poisoned").as_ref().and_then(Entry::live_value)
    }

    pub fn put(&self, value: T) {
        let entry = Entry { value, expires_at: Instant::now() + self.ttl };
        *self.slot.write().expect("cache lock poisoned") = Some(entry);
    }
}

/// A keyed cache with TTL expiry; stale entries are overwritten in place.
#[derive(Debug)]
pub struct TtlMap<V> {
    entries: DashMap<String, Entry<V>>,
    ttl: Duration,
}

impl<V: Clone> TtlMap<V> {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self { entries: DashMap::new(), ttl }
    }

    pub fn get(&self, key: &str) -> Option<V> {
        self.entries.get(key).and_then(|entry| entry.live_value())
    }

    pub fn put(&self, key: String, value: V) {
        let entry = Entry { value, expires_at: Instant::now() + self.ttl };
        self.entries.insert(key, entry);
    }
}
