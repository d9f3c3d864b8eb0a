//! Schema-text cache with TTL-based expiration.
//!
//! An explicitly owned, single-entry cache for the rendered schema
//! description that goes into the generation prompt. The handler holds it by
//! `Arc` and refreshes it on miss; there is no ambient global state.

use parking_lot::RwLock;
use std::time::{Duration, Instant};
use tracing::debug;

/// Cache entry with creation timestamp.
struct CacheEntry {
    schema: String,
    created_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() > ttl
    }
}

/// Cache for the rendered schema description text.
pub struct SchemaCache {
    entry: RwLock<Option<CacheEntry>>,
    ttl: Duration,
}

impl SchemaCache {
    /// Create a new schema cache with the specified TTL.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entry: RwLock::new(None),
            ttl,
        }
    }

    /// Get the cached schema text if present and fresh.
    ///
    /// An expired entry is dropped on access.
    pub fn get(&self) -> Option<String> {
        {
            let guard = self.entry.read();
            if let Some(entry) = guard.as_ref() {
                if !entry.is_expired(self.ttl) {
                    debug!("schema cache hit");
                    return Some(entry.schema.clone());
                }
            } else {
                return None;
            }
        }
        debug!("schema cache entry expired");
        *self.entry.write() = None;
        None
    }

    /// Store freshly rendered schema text.
    pub fn store(&self, schema: String) {
        debug!(len = schema.len(), "caching schema text");
        *self.entry.write() = Some(CacheEntry {
            schema,
            created_at: Instant::now(),
        });
    }

    /// Drop the cached entry, forcing a refresh on the next request.
    pub fn invalidate(&self) {
        debug!("invalidating schema cache");
        *self.entry.write() = None;
    }

    /// Whether a fresh entry is currently cached.
    pub fn is_fresh(&self) -> bool {
        self.entry
            .read()
            .as_ref()
            .is_some_and(|e| !e.is_expired(self.ttl))
    }
}

impl Default for SchemaCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(300)) // 5 minutes default TTL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_basic() {
        let cache = SchemaCache::new(Duration::from_secs(60));
        assert!(cache.get().is_none());
        assert!(!cache.is_fresh());

        cache.store("TABLE users:\n  id (integer)".into());
        assert!(cache.is_fresh());
        assert_eq!(cache.get().unwrap(), "TABLE users:\n  id (integer)");
    }

    #[test]
    fn test_cache_expiry() {
        let cache = SchemaCache::new(Duration::from_millis(1));
        cache.store("TABLE users".into());

        std::thread::sleep(Duration::from_millis(10));

        assert!(!cache.is_fresh());
        assert!(cache.get().is_none());
    }

    #[test]
    fn test_cache_invalidation() {
        let cache = SchemaCache::new(Duration::from_secs(60));
        cache.store("TABLE users".into());
        assert!(cache.get().is_some());

        cache.invalidate();
        assert!(cache.get().is_none());
    }

    #[test]
    fn test_store_replaces_entry() {
        let cache = SchemaCache::new(Duration::from_secs(60));
        cache.store("old".into());
        cache.store("new".into());
        assert_eq!(cache.get().unwrap(), "new");
    }
}
