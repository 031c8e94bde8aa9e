//! Cache Statistics Module
//!
//! Tracks cache activity: lookups, writes, rejections, and evictions.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Cache Metrics ==
/// Live counters, updated without taking the store lock.
#[derive(Debug, Default)]
pub struct CacheMetrics {
    hits: AtomicU64,
    misses: AtomicU64,
    created: AtomicU64,
    appended: AtomicU64,
    ignored_appends: AtomicU64,
    rejected: AtomicU64,
    removals: AtomicU64,
    sweep_evictions: AtomicU64,
}

impl CacheMetrics {
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_created(&self) {
        self.created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_appended(&self) {
        self.appended.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_ignored_append(&self) {
        self.ignored_appends.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_removal(&self) {
        self.removals.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_sweep_evictions(&self, count: usize) {
        self.sweep_evictions
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    // == Snapshot ==
    /// Copies the counters into a serializable snapshot.
    pub fn snapshot(&self, total_entries: usize, total_bytes: usize) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            created: self.created.load(Ordering::Relaxed),
            appended: self.appended.load(Ordering::Relaxed),
            ignored_appends: self.ignored_appends.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            removals: self.removals.load(Ordering::Relaxed),
            sweep_evictions: self.sweep_evictions.load(Ordering::Relaxed),
            total_entries,
            total_bytes,
        }
    }
}

// == Cache Stats ==
/// Point-in-time view of the cache counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// `get` calls that found the key
    pub hits: u64,
    /// `get` calls that did not
    pub misses: u64,
    /// Saves that created a new chunk
    pub created: u64,
    /// Saves that appended to an existing chunk
    pub appended: u64,
    /// Saves that hit an existing key with an oversized payload
    pub ignored_appends: u64,
    /// Saves turned away by the budget or the payload gate
    pub rejected: u64,
    /// Explicit removals of a present key
    pub removals: u64,
    /// Entries dropped by the staleness sweep
    pub sweep_evictions: u64,
    /// Current number of stored chunks
    pub total_entries: usize,
    /// Current number of stored bytes across all chunks
    pub total_bytes: usize,
}

impl CacheStats {
    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
