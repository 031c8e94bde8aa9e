//! Chunk Cache - An in-memory keyed chunk accumulator
//!
//! Collects small byte payloads under string keys, gated by a per-write
//! payload size and a global byte budget, with a periodic staleness sweep.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{ChunkCache, ChunkHandle, SaveOutcome, MIN_CHUNK_SIZE};
pub use config::{Config, SweepPolicy};
pub use error::CacheError;
pub use tasks::spawn_sweep_task;
