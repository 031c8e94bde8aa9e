//! Error types for the chunk cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Reasons a save can be turned away.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Stored bytes already meet or exceed `max_limit - MIN_CHUNK_SIZE`
    #[error("Cache budget exhausted: {used} bytes stored, max limit {max_limit}")]
    BudgetExhausted { used: usize, max_limit: usize },

    /// Payload for a new chunk is at or above the per-write gate
    #[error("Payload too large for a new chunk: {len} bytes")]
    PayloadTooLarge { len: usize },
}

// == Result Type Alias ==
/// Convenience Result type for the chunk cache.
pub type Result<T> = std::result::Result<T, CacheError>;
