//! Cache Store Module
//!
//! Main cache engine: a keyed map of shared chunks behind a reader-writer
//! lock, gated by a global byte budget and cleaned by a staleness sweep.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::cache::{
    CacheMetrics, CacheStats, Chunk, ChunkHandle, Clock, SystemClock, MIN_CHUNK_SIZE,
};
use crate::config::{Config, SweepPolicy};
use crate::error::{CacheError, Result};

// == Save Outcome ==
/// What a successful save did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// A new chunk was stored under the key
    Created,
    /// The payload was appended to the existing chunk
    Appended,
    /// The key existed but the payload was too large, so nothing changed.
    /// `save` still reports this as success.
    AppendIgnored,
}

// == Chunk Cache ==
/// Keyed chunk store with a global byte budget.
///
/// All operations take `&self`; the map sits behind a reader-writer lock so
/// lookups run alongside each other while inserts, removals, and sweeps get
/// exclusive access.
pub struct ChunkCache {
    /// Key to shared chunk
    chunks: RwLock<HashMap<String, ChunkHandle>>,
    /// Global byte budget, adjustable at runtime
    max_limit: AtomicUsize,
    /// Which entries the sweep evicts
    sweep_policy: SweepPolicy,
    /// Time source for chunk stamps and sweeps
    clock: Arc<dyn Clock>,
    /// Activity counters
    metrics: CacheMetrics,
}

impl ChunkCache {
    // == Constructors ==
    /// Creates a cache with the default budget, the historical sweep
    /// predicate, and the system clock.
    pub fn new() -> Self {
        Self::from_config(&Config::default())
    }

    /// Creates a cache from configuration using the system clock.
    pub fn from_config(config: &Config) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates a cache from configuration with an injected clock.
    pub fn with_clock(config: &Config, clock: Arc<dyn Clock>) -> Self {
        Self {
            chunks: RwLock::new(HashMap::new()),
            max_limit: AtomicUsize::new(config.max_limit),
            sweep_policy: config.sweep_policy(),
            clock,
            metrics: CacheMetrics::default(),
        }
    }

    fn read_chunks(&self) -> RwLockReadGuard<'_, HashMap<String, ChunkHandle>> {
        self.chunks.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_chunks(&self) -> RwLockWriteGuard<'_, HashMap<String, ChunkHandle>> {
        self.chunks.write().unwrap_or_else(PoisonError::into_inner)
    }

    // == Budget ==
    pub fn max_limit(&self) -> usize {
        self.max_limit.load(Ordering::Relaxed)
    }

    pub fn set_max_limit(&self, max_limit: usize) {
        self.max_limit.store(max_limit, Ordering::Relaxed);
    }

    /// Returns true while stored bytes are below `max_limit - MIN_CHUNK_SIZE`.
    ///
    /// Recomputed from the chunks on every call. A `max_limit` below
    /// `MIN_CHUNK_SIZE` leaves no budget at all.
    pub fn can_add_new_chunk(&self) -> bool {
        within_budget(self.total_bytes(), self.max_limit())
    }

    // == Save ==
    /// Stores or appends `value` under `key`.
    ///
    /// Returns false when the budget is exhausted (even for an existing key)
    /// or when a new chunk's payload is too large. Returns true whenever the
    /// key already existed, including when the append itself was dropped for
    /// size; use [`ChunkCache::try_save`] to tell those apart.
    pub fn save(&self, value: &[u8], key: &str) -> bool {
        self.try_save(value, key).is_ok()
    }

    /// Like [`ChunkCache::save`], but reports exactly what happened.
    pub fn try_save(&self, value: &[u8], key: &str) -> Result<SaveOutcome> {
        // The budget check and the write below are separate steps, so two
        // concurrent saves may both pass the check.
        let used = self.total_bytes();
        let max_limit = self.max_limit();
        if !within_budget(used, max_limit) {
            self.metrics.record_rejected();
            debug!(key, used, max_limit, "save rejected: budget exhausted");
            return Err(CacheError::BudgetExhausted { used, max_limit });
        }

        let now = self.clock.now();
        let mut chunks = self.write_chunks();

        if let Some(handle) = chunks.get(key) {
            return if handle.append(value, now) {
                self.metrics.record_appended();
                debug!(key, len = value.len(), "appended to chunk");
                Ok(SaveOutcome::Appended)
            } else {
                self.metrics.record_ignored_append();
                debug!(key, len = value.len(), "append ignored: payload too large");
                Ok(SaveOutcome::AppendIgnored)
            };
        }

        match Chunk::new(value, now) {
            Some(chunk) => {
                chunks.insert(key.to_owned(), ChunkHandle::new(chunk));
                self.metrics.record_created();
                debug!(key, len = value.len(), "created chunk");
                Ok(SaveOutcome::Created)
            }
            None => {
                self.metrics.record_rejected();
                debug!(key, len = value.len(), "save rejected: payload too large");
                Err(CacheError::PayloadTooLarge { len: value.len() })
            }
        }
    }

    // == Remove ==
    /// Drops the entry for `key`. Absent keys are ignored.
    ///
    /// Outstanding handles keep their chunk alive but it is no longer cached.
    pub fn remove(&self, key: &str) {
        if self.write_chunks().remove(key).is_some() {
            self.metrics.record_removal();
            debug!(key, "removed chunk");
        }
    }

    // == Get ==
    /// Returns a shared handle to the chunk stored under `key`.
    pub fn get(&self, key: &str) -> Option<ChunkHandle> {
        let found = self.read_chunks().get(key).cloned();
        match found {
            Some(_) => self.metrics.record_hit(),
            None => self.metrics.record_miss(),
        }
        found
    }

    // == Sweep ==
    /// Evicts stale entries under the configured policy, returning how many.
    ///
    /// With `SweepPolicy::LastUpdatedBeforeNow` every chunk written before
    /// this call is stale, so a sweep normally empties the cache. That is
    /// the historical behavior and is kept as-is; configure
    /// `SweepPolicy::IdleFor` for idle-based eviction.
    pub(crate) fn sweep(&self) -> usize {
        let now = self.clock.now();
        let policy = self.sweep_policy;
        let mut chunks = self.write_chunks();

        let before = chunks.len();
        chunks.retain(|_, handle| !policy.is_stale(handle.last_updated(), now));
        let removed = before - chunks.len();

        self.metrics.record_sweep_evictions(removed);
        removed
    }

    // == Inspection ==
    /// Current time according to the cache's clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn sweep_policy(&self) -> SweepPolicy {
        self.sweep_policy
    }

    /// Sum of chunk lengths across the store.
    pub fn total_bytes(&self) -> usize {
        self.read_chunks().values().map(ChunkHandle::len).sum()
    }

    /// Returns the current number of chunks in the cache.
    pub fn len(&self) -> usize {
        self.read_chunks().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_chunks().is_empty()
    }

    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let chunks = self.read_chunks();
        let total_bytes = chunks.values().map(ChunkHandle::len).sum();
        self.metrics.snapshot(chunks.len(), total_bytes)
    }
}

impl Default for ChunkCache {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ChunkCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkCache")
            .field("entries", &self.len())
            .field("max_limit", &self.max_limit())
            .field("sweep_policy", &self.sweep_policy)
            .finish_non_exhaustive()
    }
}

fn within_budget(used: usize, max_limit: usize) -> bool {
    max_limit
        .checked_sub(MIN_CHUNK_SIZE)
        .is_some_and(|budget| used < budget)
}
