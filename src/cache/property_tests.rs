//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the payload gate, the byte budget, and
//! save/get/remove consistency over arbitrary inputs.

use proptest::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::cache::{Chunk, ChunkCache, ManualClock, SaveOutcome, MIN_CHUNK_SIZE};
use crate::config::Config;

// == Test Configuration ==
const TEST_MAX_LIMIT: usize = 4096;

// == Strategies ==
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-z]{1,4}"
}

fn small_payload() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..MIN_CHUNK_SIZE)
}

fn large_payload() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), MIN_CHUNK_SIZE..64)
}

fn any_payload() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..24)
}

#[derive(Debug, Clone)]
enum CacheOp {
    Save { key: String, value: Vec<u8> },
    Remove { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        3 => (key_strategy(), any_payload()).prop_map(|(key, value)| CacheOp::Save { key, value }),
        1 => key_strategy().prop_map(|key| CacheOp::Remove { key }),
    ]
}

fn test_cache(max_limit: usize) -> (ChunkCache, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::default());
    let config = Config {
        max_limit,
        ..Config::default()
    };
    (ChunkCache::with_clock(&config, clock.clone()), clock)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Any payload below the gate builds a chunk holding exactly that payload.
    #[test]
    fn prop_small_payload_builds_chunk(payload in small_payload()) {
        let now = Utc::now();
        let chunk = Chunk::new(&payload, now);
        prop_assert!(chunk.is_some());
        let chunk = chunk.unwrap();
        prop_assert_eq!(chunk.data(), &payload[..]);
        prop_assert_eq!(chunk.last_updated(), now);
    }

    // Any payload at or above the gate is refused.
    #[test]
    fn prop_large_payload_refused(payload in large_payload()) {
        prop_assert!(Chunk::new(&payload, Utc::now()).is_none());
    }

    // Appends below the gate concatenate and refresh the stamp; larger ones
    // leave the chunk untouched.
    #[test]
    fn prop_append_gate(
        initial in small_payload(),
        payload in any_payload(),
        secs in 1i64..1000
    ) {
        let start = Utc::now();
        let later = start + Duration::seconds(secs);
        let mut chunk = Chunk::new(&initial, start).unwrap();

        let applied = chunk.append(&payload, later);

        if payload.len() < MIN_CHUNK_SIZE {
            prop_assert!(applied);
            let expected: Vec<u8> = initial.iter().chain(payload.iter()).copied().collect();
            prop_assert_eq!(chunk.data(), &expected[..]);
            prop_assert_eq!(chunk.last_updated(), later);
        } else {
            prop_assert!(!applied);
            prop_assert_eq!(chunk.data(), &initial[..]);
            prop_assert_eq!(chunk.last_updated(), start);
        }
    }

    // can_add_new_chunk agrees with the budget formula after any history.
    #[test]
    fn prop_budget_predicate(
        max_limit in 0usize..64,
        ops in prop::collection::vec(cache_op_strategy(), 1..40)
    ) {
        let (cache, _) = test_cache(max_limit);

        for op in ops {
            match op {
                CacheOp::Save { key, value } => { cache.save(&value, &key); }
                CacheOp::Remove { key } => cache.remove(&key),
            }
            let used = cache.total_bytes();
            let expected = max_limit >= MIN_CHUNK_SIZE && used < max_limit - MIN_CHUNK_SIZE;
            prop_assert_eq!(cache.can_add_new_chunk(), expected);
        }
    }

    // Saves and removals match a simple model of the store, and save's bool
    // matches try_save's Ok/Err split.
    #[test]
    fn prop_matches_model(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        let (cache, _) = test_cache(TEST_MAX_LIMIT);
        let mut model: HashMap<String, Vec<u8>> = HashMap::new();

        for op in ops {
            match op {
                CacheOp::Save { key, value } => {
                    let outcome = cache.try_save(&value, &key);
                    let small = value.len() < MIN_CHUNK_SIZE;
                    match model.get_mut(&key) {
                        Some(existing) if small => {
                            prop_assert_eq!(outcome, Ok(SaveOutcome::Appended));
                            existing.extend_from_slice(&value);
                        }
                        Some(_) => prop_assert_eq!(outcome, Ok(SaveOutcome::AppendIgnored)),
                        None if small => {
                            prop_assert_eq!(outcome, Ok(SaveOutcome::Created));
                            model.insert(key, value);
                        }
                        None => prop_assert!(outcome.is_err()),
                    }
                }
                CacheOp::Remove { key } => {
                    cache.remove(&key);
                    model.remove(&key);
                    prop_assert!(cache.get(&key).is_none());
                }
            }
        }

        prop_assert_eq!(cache.len(), model.len());
        for (key, expected) in &model {
            let handle = cache.get(key);
            prop_assert!(handle.is_some(), "Key '{}' should be present", key);
            prop_assert_eq!(&handle.unwrap().data()[..], &expected[..]);
        }
        let expected_bytes: usize = model.values().map(Vec::len).sum();
        prop_assert_eq!(cache.total_bytes(), expected_bytes);
    }

    // Under the historical policy, any elapsed time clears the whole cache.
    #[test]
    fn prop_literal_sweep_clears_everything(
        entries in prop::collection::vec((key_strategy(), small_payload()), 1..20),
        elapsed_ms in 1i64..10_000
    ) {
        let (cache, clock) = test_cache(TEST_MAX_LIMIT);
        for (key, value) in &entries {
            cache.save(value, key);
        }
        let before = cache.len();

        clock.advance(Duration::milliseconds(elapsed_ms));
        prop_assert_eq!(cache.sweep(), before);
        prop_assert!(cache.is_empty());
    }
}
