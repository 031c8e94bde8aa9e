//! Cache Module
//!
//! Provides the chunk store with a global byte budget and staleness sweep.

mod chunk;
mod clock;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use chunk::{Chunk, ChunkHandle};
pub use clock::{Clock, ManualClock, SystemClock};
pub use stats::{CacheMetrics, CacheStats};
pub use store::{ChunkCache, SaveOutcome};

// == Public Constants ==
/// Per-write payload gate in bytes.
///
/// Despite the name, a single payload is admitted only when it is strictly
/// shorter than this. A chunk may still grow past it through appends.
pub const MIN_CHUNK_SIZE: usize = 10;
