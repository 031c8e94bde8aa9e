//! Configuration Module
//!
//! Handles loading and managing cache configuration from environment variables.

use std::env;

use chrono::{DateTime, Duration, Utc};

/// Default global byte budget.
pub const DEFAULT_MAX_LIMIT: usize = 12;

// == Sweep Policy ==
/// Decides which entries the staleness sweep evicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SweepPolicy {
    /// Evict every entry whose `last_updated` is earlier than now.
    ///
    /// This is the historical predicate. Any entry touched before the sweep
    /// started qualifies, so in practice a sweep empties the cache.
    #[default]
    LastUpdatedBeforeNow,
    /// Evict only entries idle for strictly longer than the given duration.
    IdleFor(Duration),
}

impl SweepPolicy {
    /// Returns true if an entry last written at `last_updated` should be
    /// evicted by a sweep running at `now`.
    pub fn is_stale(&self, last_updated: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self {
            Self::LastUpdatedBeforeNow => last_updated < now,
            Self::IdleFor(idle) => now - last_updated > *idle,
        }
    }
}

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Global byte budget gating new writes
    pub max_limit: usize,
    /// Background sweep interval in seconds
    pub sweep_interval: u64,
    /// Idle threshold in seconds; `None` keeps the historical sweep predicate
    pub sweep_idle_secs: Option<u64>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_LIMIT` - Global byte budget (default: 12)
    /// - `SWEEP_INTERVAL` - Sweep frequency in seconds (default: 1)
    /// - `SWEEP_IDLE_SECS` - Switches the sweep to idle-based eviction (default: unset)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a Config from an arbitrary variable lookup.
    ///
    /// Missing or unparseable values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            max_limit: lookup("MAX_LIMIT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_limit),
            sweep_interval: lookup("SWEEP_INTERVAL")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.sweep_interval),
            sweep_idle_secs: lookup("SWEEP_IDLE_SECS").and_then(|v| v.parse().ok()),
        }
    }

    /// Returns the sweep policy selected by `sweep_idle_secs`.
    pub fn sweep_policy(&self) -> SweepPolicy {
        match self.sweep_idle_secs {
            Some(secs) => SweepPolicy::IdleFor(
                i64::try_from(secs)
                    .ok()
                    .and_then(Duration::try_seconds)
                    .unwrap_or(Duration::MAX),
            ),
            None => SweepPolicy::LastUpdatedBeforeNow,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_limit: DEFAULT_MAX_LIMIT,
            sweep_interval: 1,
            sweep_idle_secs: None,
        }
    }
}
