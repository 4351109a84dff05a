use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use parking_lot::RwLock;
use serde::Serialize;
use crate::core::types::RowId;
use crate::query::criteria::CriteriaKey;

/// Cache of filtered row lists keyed by criteria. The dataset never
/// changes, so entries never go stale.
pub struct QueryCache {
    pub cache: Option<RwLock<LruCache<CriteriaKey, Arc<[RowId]>>>>,
    pub size_limit: usize,
    pub hit_count: AtomicUsize,
    pub miss_count: AtomicUsize,
}

impl QueryCache {
    /// A zero size limit disables caching
    pub fn new(size_limit: usize) -> Self {
        QueryCache {
            cache: NonZeroUsize::new(size_limit).map(|cap| RwLock::new(LruCache::new(cap))),
            size_limit,
            hit_count: AtomicUsize::new(0),
            miss_count: AtomicUsize::new(0),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.cache.is_some()
    }

    pub fn get(&self, key: &CriteriaKey) -> Option<Arc<[RowId]>> {
        let cache = self.cache.as_ref()?;
        // LRU bookkeeping needs the write lock even for reads
        let mut cache = cache.write();
        if let Some(rows) = cache.get(key) {
            self.hit_count.fetch_add(1, Ordering::Relaxed);
            Some(rows.clone())
        } else {
            self.miss_count.fetch_add(1, Ordering::Relaxed);
            None
        }
    }

    pub fn put(&self, key: CriteriaKey, rows: Arc<[RowId]>) {
        if let Some(cache) = &self.cache {
            cache.write().put(key, rows);
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hit_count: self.hit_count.load(Ordering::Relaxed),
            miss_count: self.miss_count.load(Ordering::Relaxed),
            size: self.cache.as_ref().map_or(0, |c| c.read().len()),
            capacity: self.size_limit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hit_count: usize,
    pub miss_count: usize,
    pub size: usize,
    pub capacity: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hit_count + self.miss_count;
        if total == 0 {
            0.0
        } else {
            self.hit_count as f64 / total as f64
        }
    }
}
