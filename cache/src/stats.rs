//! Counters describing how the cache served its callers.

use std::collections::BTreeMap;
use tipcache_utils::StatsCounter;

pub const WINDOW_HITS: &str = "window_hits";
pub const NULL_ROUNDS: &str = "null_rounds";
pub const PROVIDER_HEAD: &str = "provider_head";
pub const PROVIDER_HEIGHT: &str = "provider_height";
pub const ADDS: &str = "adds";
pub const REVERTS: &str = "reverts";
pub const EVICTIONS: &str = "evictions";

const NAMES: &[&str] = &[
    WINDOW_HITS,
    NULL_ROUNDS,
    PROVIDER_HEAD,
    PROVIDER_HEIGHT,
    ADDS,
    REVERTS,
    EVICTIONS,
];

#[derive(Debug)]
pub struct CacheStats {
    counters: StatsCounter,
}

impl CacheStats {
    pub fn new() -> Self {
        Self {
            counters: StatsCounter::new(NAMES),
        }
    }

    pub(crate) fn record(&self, name: &'static str) {
        self.counters.increment(name);
    }

    pub(crate) fn record_n(&self, name: &'static str, n: u64) {
        self.counters.add(name, n);
    }

    /// Lookups answered from the window with a tip-set.
    pub fn window_hits(&self) -> u64 {
        self.counters.get(WINDOW_HITS)
    }

    /// Lookups answered from the window with a null round.
    pub fn null_rounds(&self) -> u64 {
        self.counters.get(NULL_ROUNDS)
    }

    pub fn provider_head_calls(&self) -> u64 {
        self.counters.get(PROVIDER_HEAD)
    }

    pub fn provider_height_calls(&self) -> u64 {
        self.counters.get(PROVIDER_HEIGHT)
    }

    pub fn adds(&self) -> u64 {
        self.counters.get(ADDS)
    }

    pub fn reverts(&self) -> u64 {
        self.counters.get(REVERTS)
    }

    /// Tip-sets pushed off the tail of the window.
    pub fn evictions(&self) -> u64 {
        self.counters.get(EVICTIONS)
    }

    pub fn snapshot(&self) -> BTreeMap<&'static str, u64> {
        self.counters.snapshot()
    }
}

impl Default for CacheStats {
    fn default() -> Self {
        Self::new()
    }
}
