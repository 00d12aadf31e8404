//! A cache handle shared between one writer and many readers.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tipcache_provider::ChainProvider;
use tipcache_types::{ChainEpoch, TipSet, TipSetKey};

use crate::{CacheError, TipSetCache};

/// Cloneable, thread-safe handle to a [`TipSetCache`].
///
/// Writes take the lock exclusively and reads share it, so readers observe
/// each `add` or `revert` either fully or not at all. Provider fallbacks run
/// under the read lock and never block other readers.
///
/// A poisoned lock is recovered: every mutation checks its inputs before
/// touching the window, so a panicking holder cannot leave it half-updated.
pub struct SharedTipSetCache<P> {
    inner: Arc<RwLock<TipSetCache<P>>>,
}

impl<P> Clone for SharedTipSetCache<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P: ChainProvider> SharedTipSetCache<P> {
    pub fn new(cache: TipSetCache<P>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(cache)),
        }
    }

    /// Shared access for compound reads that must see a single state.
    pub fn read(&self) -> RwLockReadGuard<'_, TipSetCache<P>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Exclusive access for the writer.
    pub fn write(&self) -> RwLockWriteGuard<'_, TipSetCache<P>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add(&self, ts: impl Into<Arc<TipSet>>) -> Result<(), CacheError> {
        self.write().add(ts)
    }

    pub fn revert(&self, ts: &TipSet) -> Result<Arc<TipSet>, CacheError> {
        self.write().revert(ts)
    }

    pub fn best(&self) -> Result<Arc<TipSet>, CacheError> {
        self.read().best()
    }

    pub fn get(&self, height: ChainEpoch) -> Result<Option<Arc<TipSet>>, CacheError> {
        self.read().get(height)
    }

    pub fn get_non_null(&self, height: ChainEpoch) -> Result<Option<Arc<TipSet>>, CacheError> {
        self.read().get_non_null(height)
    }

    pub fn get_by_key(&self, key: &TipSetKey) -> Option<Arc<TipSet>> {
        self.read().get_by_key(key)
    }

    pub fn head_height(&self) -> Option<ChainEpoch> {
        self.read().head_height()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}

impl<P: ChainProvider> From<TipSetCache<P>> for SharedTipSetCache<P> {
    fn from(cache: TipSetCache<P>) -> Self {
        Self::new(cache)
    }
}
