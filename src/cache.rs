//! Process-wide TTL cache.
//!
//! Explicit `{value, expiry}` cache behind get/set with an explicit TTL,
//! constructed once at startup and passed to whoever needs it. Used by the
//! lifecycle controller to avoid re-negotiating a prover session on every
//! open of the same request.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::RwLock;
use std::time::{Duration, Instant};

struct Entry<V> {
    value: V,
    expires_at: Instant,
}

/// Thread-safe map cache where every entry expires after a fixed TTL.
pub struct TtlCache<K, V> {
    entries: RwLock<HashMap<K, Entry<V>>>,
    ttl: Duration,
}

impl<K: Eq + Hash + Clone, V: Clone> TtlCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Fetch a live entry. Expired entries are dropped on access.
    pub fn get(&self, key: &K) -> Option<V> {
        {
            let entries = self.entries.read().unwrap();
            match entries.get(key) {
                Some(entry) if entry.expires_at > Instant::now() => {
                    return Some(entry.value.clone());
                }
                Some(_) => {}
                None => return None,
            }
        }
        // Entry exists but expired; purge it.
        self.entries.write().unwrap().remove(key);
        None
    }

    /// Insert or replace an entry, restarting its TTL.
    pub fn set(&self, key: K, value: V) {
        let entry = Entry {
            value,
            expires_at: Instant::now() + self.ttl,
        };
        self.entries.write().unwrap().insert(key, entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_live_entries() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.set("k", 1u32);
        assert_eq!(cache.get(&"k"), Some(1));
    }

    #[test]
    fn expired_entries_are_gone() {
        let cache = TtlCache::new(Duration::from_millis(0));
        cache.set("k", 1u32);
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(cache.get(&"k"), None);
    }

    #[test]
    fn set_replaces_and_restarts_ttl() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.set("k", 1u32);
        cache.set("k", 2u32);
        assert_eq!(cache.get(&"k"), Some(2));
    }

    #[test]
    fn missing_key_is_none() {
        let cache: TtlCache<&str, u32> = TtlCache::new(Duration::from_secs(60));
        assert_eq!(cache.get(&"absent"), None);
    }
}
