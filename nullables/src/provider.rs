//! Nullable chain providers.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use tipcache_provider::{ChainProvider, ProviderError};
use tipcache_types::{ChainEpoch, TipSet, TipSetKey};

/// A provider that must never be called.
///
/// Panics on any call, failing the test that proved the cache stayed
/// inside its window.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProvider;

impl ChainProvider for NullProvider {
    fn tipset_by_height(
        &self,
        height: ChainEpoch,
        _key: &TipSetKey,
    ) -> Result<Option<TipSet>, ProviderError> {
        panic!("unexpected provider call: tipset_by_height({height})")
    }

    fn head(&self) -> Result<TipSet, ProviderError> {
        panic!("unexpected provider call: head()")
    }
}

/// An in-memory canonical chain that counts the calls made to it.
/// Thread-safe for use behind a shared cache.
#[derive(Debug, Default)]
pub struct MemoryProvider {
    chain: Mutex<BTreeMap<ChainEpoch, TipSet>>,
    head_calls: AtomicUsize,
    height_calls: AtomicUsize,
    last_anchor: Mutex<Option<TipSetKey>>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chain(tipsets: impl IntoIterator<Item = TipSet>) -> Self {
        let provider = Self::new();
        for ts in tipsets {
            provider.insert(ts);
        }
        provider
    }

    /// Record `ts` as the canonical tip-set at its height.
    pub fn insert(&self, ts: TipSet) {
        self.chain.lock().unwrap().insert(ts.height(), ts);
    }

    pub fn remove(&self, height: ChainEpoch) -> Option<TipSet> {
        self.chain.lock().unwrap().remove(&height)
    }

    pub fn len(&self) -> usize {
        self.chain.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.lock().unwrap().is_empty()
    }

    pub fn head_calls(&self) -> usize {
        self.head_calls.load(Ordering::SeqCst)
    }

    pub fn height_calls(&self) -> usize {
        self.height_calls.load(Ordering::SeqCst)
    }

    /// Key passed with the most recent `tipset_by_height` call.
    pub fn last_anchor(&self) -> Option<TipSetKey> {
        self.last_anchor.lock().unwrap().clone()
    }
}

impl ChainProvider for MemoryProvider {
    fn tipset_by_height(
        &self,
        height: ChainEpoch,
        key: &TipSetKey,
    ) -> Result<Option<TipSet>, ProviderError> {
        self.height_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_anchor.lock().unwrap() = Some(key.clone());

        let chain = self.chain.lock().unwrap();
        let head = chain
            .keys()
            .next_back()
            .copied()
            .ok_or_else(|| ProviderError::Unavailable("empty chain".to_string()))?;
        if height > head {
            return Err(ProviderError::NotFound(height));
        }
        Ok(chain.get(&height).cloned())
    }

    fn head(&self) -> Result<TipSet, ProviderError> {
        self.head_calls.fetch_add(1, Ordering::SeqCst);
        self.chain
            .lock()
            .unwrap()
            .values()
            .next_back()
            .cloned()
            .ok_or_else(|| ProviderError::Unavailable("empty chain".to_string()))
    }
}

/// A provider whose every call fails with the same error.
#[derive(Debug, Clone)]
pub struct FailingProvider {
    error: ProviderError,
}

impl FailingProvider {
    pub fn new(error: ProviderError) -> Self {
        Self { error }
    }
}

impl ChainProvider for FailingProvider {
    fn tipset_by_height(
        &self,
        _height: ChainEpoch,
        _key: &TipSetKey,
    ) -> Result<Option<TipSet>, ProviderError> {
        Err(self.error.clone())
    }

    fn head(&self) -> Result<TipSet, ProviderError> {
        Err(self.error.clone())
    }
}
