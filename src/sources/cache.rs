//! TTL cache for provider responses
//!
//! Keyed by `(provider, query)`. Expired entries are evicted lazily on the
//! next lookup, never by a background sweep; writes hold the single lock.

use super::aggregator::SourceRecord;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Cache key combining provider name and query
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
struct CacheKey {
    provider: String,
    query: String,
}

/// Cache entry with insertion time
#[derive(Debug, Clone)]
struct CacheEntry {
    record: SourceRecord,
    inserted_at: Instant,
}

/// Response cache with TTL and a capacity bound
pub struct ResponseCache {
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
    ttl: Duration,
    max_entries: usize,
}

impl ResponseCache {
    /// Create a new cache with TTL and max size
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            max_entries,
        }
    }

    /// Get a cached record if present and not expired; an expired entry is
    /// removed on the spot.
    pub fn get(&self, provider: &str, query: &str) -> Option<SourceRecord> {
        let key = CacheKey {
            provider: provider.to_string(),
            query: query.to_string(),
        };

        let mut entries = self.entries.lock().unwrap();

        if let Some(entry) = entries.get(&key) {
            if entry.inserted_at.elapsed() < self.ttl {
                return Some(entry.record.clone());
            }
            entries.remove(&key);
        }

        None
    }

    /// Store a record under `(provider, query)`
    pub fn store(&self, provider: &str, query: &str, record: SourceRecord) {
        let key = CacheKey {
            provider: provider.to_string(),
            query: query.to_string(),
        };

        let entry = CacheEntry {
            record,
            inserted_at: Instant::now(),
        };

        let mut entries = self.entries.lock().unwrap();

        if entries.len() >= self.max_entries && !entries.contains_key(&key) {
            evict_oldest(&mut entries);
        }

        entries.insert(key, entry);
    }

    /// Drop every expired entry
    pub fn clear_expired(&self) {
        let mut entries = self.entries.lock().unwrap();
        entries.retain(|_, entry| entry.inserted_at.elapsed() < self.ttl);
    }

    /// Drop everything
    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }

    /// Cache statistics
    pub fn stats(&self) -> CacheStats {
        let entries = self.entries.lock().unwrap();
        let valid = entries
            .values()
            .filter(|entry| entry.inserted_at.elapsed() < self.ttl)
            .count();

        CacheStats {
            total_entries: entries.len(),
            valid_entries: valid,
            expired_entries: entries.len() - valid,
        }
    }
}

fn evict_oldest(entries: &mut HashMap<CacheKey, CacheEntry>) {
    if let Some(oldest_key) = entries
        .iter()
        .min_by_key(|(_, entry)| entry.inserted_at)
        .map(|(key, _)| key.clone())
    {
        entries.remove(&oldest_key);
    }
}

/// Cache statistics
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub total_entries: usize,
    pub valid_entries: usize,
    pub expired_entries: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(name: &str, content: &str) -> SourceRecord {
        SourceRecord {
            name: name.to_string(),
            url: String::new(),
            content: content.to_string(),
            confidence: 0.9,
            last_updated: Utc::now(),
            authority_score: 0.5,
            error: None,
            fingerprint: String::new(),
        }
    }

    #[test]
    fn test_store_and_get() {
        let cache = ResponseCache::new(Duration::from_secs(60), 100);
        cache.store("Wikipedia", "gravity", record("Wikipedia", "Gravity is a force."));

        let hit = cache.get("Wikipedia", "gravity").expect("cache hit");
        assert_eq!(hit.content, "Gravity is a force.");
        assert!(cache.get("Wikipedia", "magnetism").is_none());
    }

    #[test]
    fn test_expiry_is_lazy() {
        let cache = ResponseCache::new(Duration::from_millis(50), 100);
        cache.store("Wikipedia", "gravity", record("Wikipedia", "text"));

        assert!(cache.get("Wikipedia", "gravity").is_some());

        std::thread::sleep(Duration::from_millis(80));

        // Entry still counted until a lookup or sweep touches it
        assert_eq!(cache.stats().expired_entries, 1);
        assert!(cache.get("Wikipedia", "gravity").is_none());
        assert_eq!(cache.stats().total_entries, 0);
    }

    #[test]
    fn test_capacity_eviction() {
        let cache = ResponseCache::new(Duration::from_secs(60), 2);
        cache.store("A", "q", record("A", "a"));
        cache.store("B", "q", record("B", "b"));
        cache.store("C", "q", record("C", "c"));

        assert_eq!(cache.stats().total_entries, 2);
    }

    #[test]
    fn test_clear_expired() {
        let cache = ResponseCache::new(Duration::from_millis(10), 100);
        cache.store("A", "q", record("A", "a"));
        std::thread::sleep(Duration::from_millis(30));
        cache.clear_expired();
        assert_eq!(cache.stats().total_entries, 0);
    }
}
