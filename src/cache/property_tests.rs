//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the store against a simple model.

use proptest::prelude::*;
use std::collections::HashMap;
use std::thread::sleep;
use std::time::Duration;

use crate::cache::{Cache, CacheStore};

// == Test Configuration ==
const LONG_TTL: f64 = 300.0;

// == Strategies ==
/// Generates cache keys from a small alphabet so operations collide often
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-e]{1,2}".prop_map(|s| s)
}

fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{0,32}".prop_map(|s| s)
}

/// A sequence of cache operations with long-lived TTLs
#[derive(Debug, Clone)]
enum CacheOp {
    Write { key: String, value: String },
    Read { key: String },
    Touch { key: String },
    Forget { key: String },
    Trim,
    Clear,
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        4 => (key_strategy(), value_strategy())
            .prop_map(|(key, value)| CacheOp::Write { key, value }),
        4 => key_strategy().prop_map(|key| CacheOp::Read { key }),
        1 => key_strategy().prop_map(|key| CacheOp::Touch { key }),
        2 => key_strategy().prop_map(|key| CacheOp::Forget { key }),
        1 => Just(CacheOp::Trim),
        1 => Just(CacheOp::Clear),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // With no entry expiring, the store behaves exactly like a map and the
    // hit/miss counters match the reads that did or did not find a value.
    #[test]
    fn prop_store_matches_model(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        let mut store = CacheStore::new();
        let mut model: HashMap<String, String> = HashMap::new();
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Write { key, value } => {
                    store.write(key.clone(), value.clone(), LONG_TTL);
                    model.insert(key, value);
                }
                CacheOp::Read { key } => {
                    let got: Option<String> = store.read(&key);
                    prop_assert_eq!(got.as_ref(), model.get(&key));
                    if got.is_some() { expected_hits += 1 } else { expected_misses += 1 }
                }
                CacheOp::Touch { key } => store.touch(&key),
                CacheOp::Forget { key } => {
                    store.forget(&key);
                    model.remove(&key);
                }
                CacheOp::Trim => {
                    prop_assert_eq!(store.trim(), 0);
                }
                CacheOp::Clear => {
                    store.clear();
                    model.clear();
                }
            }

            prop_assert_eq!(store.len(), model.len());
        }

        let mut keys = store.keys();
        keys.sort();
        let mut expected_keys: Vec<String> = model.keys().cloned().collect();
        expected_keys.sort();
        prop_assert_eq!(keys, expected_keys);

        let stats = store.stats();
        prop_assert_eq!(stats.hits, expected_hits, "Hits mismatch");
        prop_assert_eq!(stats.misses, expected_misses, "Misses mismatch");
        prop_assert_eq!(stats.expirations, 0);
    }

    // Entries written with a non-positive TTL are never returned, and reading
    // them leaves the store without them.
    #[test]
    fn prop_non_positive_ttl_never_readable(
        key in key_strategy(),
        value in value_strategy(),
        ttl in -1_000.0f64..-0.001
    ) {
        let mut store = CacheStore::new();

        store.write(key.clone(), value, ttl);

        prop_assert_eq!(store.read::<String>(&key), None);
        prop_assert!(store.is_empty());
    }

    // Clearing always empties the store, whatever mix of live and stale
    // entries it held.
    #[test]
    fn prop_clear_empties_store(
        entries in prop::collection::vec((key_strategy(), -10.0f64..10.0), 0..30)
    ) {
        let mut store = CacheStore::new();
        for (key, ttl) in entries {
            store.write(key, (), ttl);
        }

        store.clear();

        prop_assert_eq!(store.len(), 0);
        prop_assert!(store.keys().is_empty());
    }

    // Trim removes exactly the already-expired entries.
    #[test]
    fn prop_trim_keeps_live_entries(
        entries in prop::collection::vec((key_strategy(), any::<bool>()), 0..30)
    ) {
        let mut store = CacheStore::new();
        let mut live: HashMap<String, bool> = HashMap::new();
        for (key, is_live) in entries {
            store.write(key.clone(), is_live, if is_live { LONG_TTL } else { -1.0 });
            live.insert(key, is_live);
        }

        let stale = live.values().filter(|is_live| !**is_live).count();
        prop_assert_eq!(store.trim(), stale);
        prop_assert_eq!(store.len(), live.len() - stale);

        for (key, is_live) in live {
            prop_assert_eq!(store.read::<bool>(&key).is_some(), is_live);
        }
    }

    // Read-through only calls the generator for keys that are not cached.
    #[test]
    fn prop_through_sync_generates_once_per_key(
        keys in prop::collection::vec(key_strategy(), 1..40)
    ) {
        let cache = Cache::new();
        let mut generated: Vec<String> = Vec::new();

        for key in &keys {
            let value = cache.through_sync(key, || {
                generated.push(key.clone());
                key.len()
            }, LONG_TTL);
            prop_assert_eq!(value, key.len());
        }

        let mut unique = keys.clone();
        unique.sort();
        unique.dedup();
        generated.sort();
        prop_assert_eq!(generated, unique);
    }
}

// Separate proptest block with fewer cases for time-sensitive TTL tests
proptest! {
    #![proptest_config(ProptestConfig::with_cases(5))]

    // After the TTL elapses a read returns the fallback and evicts the entry.
    #[test]
    fn prop_ttl_expiration_behavior(
        key in key_strategy(),
        value in value_strategy(),
        fallback in value_strategy()
    ) {
        let mut store = CacheStore::new();

        store.write(key.clone(), value.clone(), 0.1);
        prop_assert_eq!(store.read::<String>(&key), Some(value));

        sleep(Duration::from_millis(150));

        prop_assert_eq!(store.read_or(&key, fallback.clone()), fallback);
        prop_assert_eq!(store.len(), 0);
    }
}
