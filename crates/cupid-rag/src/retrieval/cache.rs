//! Bounded LRU cache of search results keyed by (normalized query, k)

use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::types::SearchHit;

type CacheKey = (String, usize);

struct CacheEntry {
    hits: Arc<Vec<SearchHit>>,
    last_used: AtomicU64,
}

/// Cache counters reported by `/stats`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
}

/// Search result cache with least-recently-used eviction
///
/// Lookups share the read lock and bump an access tick; only inserts take the
/// write lock. Entries are never invalidated since the index is immutable.
pub struct QueryCache {
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
    capacity: usize,
    tick: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl QueryCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::with_capacity(capacity.min(1024))),
            capacity,
            tick: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Case-folded, trimmed form used for keys and embedding
    pub fn normalize(query: &str) -> String {
        query.trim().to_lowercase()
    }

    pub fn get(&self, normalized_query: &str, k: usize) -> Option<Arc<Vec<SearchHit>>> {
        let entries = self.entries.read();

        match entries.get(&(normalized_query.to_string(), k)) {
            Some(entry) => {
                entry.last_used.store(self.next_tick(), Ordering::Relaxed);
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(Arc::clone(&entry.hits))
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Insert a result; racing inserts of the same key are harmless
    pub fn insert(&self, normalized_query: String, k: usize, hits: Arc<Vec<SearchHit>>) {
        if self.capacity == 0 {
            return;
        }

        let mut entries = self.entries.write();
        let key = (normalized_query, k);

        if !entries.contains_key(&key) && entries.len() >= self.capacity {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_used.load(Ordering::Relaxed))
                .map(|(key, _)| key.clone());
            if let Some(oldest) = oldest {
                tracing::trace!("Evicting cached query {:?}", oldest);
                entries.remove(&oldest);
            }
        }

        entries.insert(
            key,
            CacheEntry {
                hits,
                last_used: AtomicU64::new(self.next_tick()),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            capacity: self.capacity,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    fn next_tick(&self) -> u64 {
        self.tick.fetch_add(1, Ordering::Relaxed) + 1
    }
}
