//! Chunk Module
//!
//! Defines a growable byte chunk and the shared handle the cache hands out.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use bytes::{Bytes, BytesMut};
use chrono::{DateTime, Utc};

use crate::cache::MIN_CHUNK_SIZE;

// == Chunk ==
/// A byte buffer that only grows by appending, stamped with its last write.
#[derive(Debug, Clone)]
pub struct Chunk {
    data: BytesMut,
    last_updated: DateTime<Utc>,
}

impl Chunk {
    // == Constructor ==
    /// Creates a chunk from an initial payload.
    ///
    /// Returns `None` when the payload is `MIN_CHUNK_SIZE` bytes or longer.
    pub fn new(initial: &[u8], now: DateTime<Utc>) -> Option<Self> {
        if !Self::admits(initial.len()) {
            return None;
        }
        Some(Self {
            data: BytesMut::from(initial),
            last_updated: now,
        })
    }

    /// Per-write gate shared by construction and append.
    pub fn admits(len: usize) -> bool {
        len < MIN_CHUNK_SIZE
    }

    // == Append ==
    /// Appends a payload and refreshes `last_updated`.
    ///
    /// Oversized payloads are dropped without touching the chunk. The gate
    /// looks at the single payload, so the buffer itself may grow past
    /// `MIN_CHUNK_SIZE`. Returns whether the payload was applied.
    pub fn append(&mut self, payload: &[u8], now: DateTime<Utc>) -> bool {
        if !Self::admits(payload.len()) {
            return false;
        }
        self.data.extend_from_slice(payload);
        self.last_updated = now;
        true
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn last_updated(&self) -> DateTime<Utc> {
        self.last_updated
    }
}

// == Chunk Handle ==
/// Shared, reference-counted access to a stored chunk.
///
/// Clones point at the same chunk the cache holds, so appends through a
/// handle are visible to the cache and vice versa. Every access goes through
/// the chunk's own lock, which is the lock the cache uses for its appends.
/// A handle stays valid after the key is removed; it just no longer refers
/// to anything the cache can see.
#[derive(Debug, Clone)]
pub struct ChunkHandle {
    inner: Arc<RwLock<Chunk>>,
}

impl ChunkHandle {
    pub(crate) fn new(chunk: Chunk) -> Self {
        Self {
            inner: Arc::new(RwLock::new(chunk)),
        }
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, Chunk> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, Chunk> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the chunk's current bytes.
    pub fn data(&self) -> Bytes {
        Bytes::copy_from_slice(self.read().data())
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn last_updated(&self) -> DateTime<Utc> {
        self.read().last_updated()
    }

    /// Appends directly to the shared chunk. See [`Chunk::append`].
    pub fn append(&self, payload: &[u8], now: DateTime<Utc>) -> bool {
        self.write().append(payload, now)
    }

    /// Returns true if both handles refer to the same stored chunk.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}
