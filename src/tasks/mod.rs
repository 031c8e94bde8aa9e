//! Background Tasks Module
//!
//! Contains background tasks that run periodically alongside the cache.
//!
//! # Tasks
//! - Staleness sweep: evicts stale chunks at the configured interval

mod sweep;

pub use sweep::spawn_sweep_task;
