//! The tip-set cache: window, linkage checks and provider fallback.

use std::fmt;
use std::sync::Arc;

use tipcache_provider::ChainProvider;
use tipcache_types::{ChainEpoch, TipSet, TipSetKey};
use tracing::trace;

use crate::config::CacheConfig;
use crate::fallback::{self, FallbackRouter, Route};
use crate::linkage::validate_linkage;
use crate::stats::{self, CacheStats};
use crate::window::Window;
use crate::CacheError;

/// Bounded cache of the most recent tip-sets, indexed by height.
///
/// Driven by a single writer through [`add`](Self::add) and
/// [`revert`](Self::revert). Reads inside the window never touch the
/// provider. Failed operations leave the cache untouched.
pub struct TipSetCache<P> {
    window: Window,
    router: FallbackRouter<P>,
    stats: CacheStats,
}

impl<P: ChainProvider> TipSetCache<P> {
    /// Create an empty cache spanning `capacity` heights.
    pub fn new(capacity: usize, provider: P) -> Result<Self, CacheError> {
        if capacity == 0 {
            return Err(CacheError::InvalidCapacity);
        }
        Ok(Self {
            window: Window::new(capacity),
            router: FallbackRouter::new(provider),
            stats: CacheStats::new(),
        })
    }

    pub fn from_config(config: &CacheConfig, provider: P) -> Result<Self, CacheError> {
        config.validate()?;
        Self::new(config.capacity, provider)
    }

    /// Append `ts` above the current head.
    ///
    /// Heights skipped between the head and `ts` are recorded as null rounds.
    /// Tip-sets falling off the tail are dropped.
    pub fn add(&mut self, ts: impl Into<Arc<TipSet>>) -> Result<(), CacheError> {
        let ts = ts.into();
        validate_linkage(self.window.head().map(Arc::as_ref), &ts)?;

        let height = ts.height();
        let evicted = self.window.push(ts);
        self.stats.record(stats::ADDS);
        if !evicted.is_empty() {
            self.stats.record_n(stats::EVICTIONS, evicted.len() as u64);
            trace!(count = evicted.len(), tail = ?self.window.tail_height(), "evicted tip-sets");
        }
        trace!(height, len = self.window.len(), "added tip-set");
        Ok(())
    }

    /// Remove the head, which must be `ts`. Returns the removed tip-set.
    ///
    /// Null rounds exposed at the top are dropped, so the new head is the
    /// highest remaining tip-set.
    pub fn revert(&mut self, ts: &TipSet) -> Result<Arc<TipSet>, CacheError> {
        let head = self.window.head().ok_or(CacheError::Empty)?;
        if head.key() != ts.key() {
            return Err(CacheError::NotHead {
                head: head.key().clone(),
                got: ts.key().clone(),
            });
        }

        let removed = self.window.pop().ok_or(CacheError::Empty)?;
        self.stats.record(stats::REVERTS);
        trace!(
            height = removed.height(),
            head = ?self.window.head_height(),
            "reverted tip-set"
        );
        Ok(removed)
    }

    /// The highest known tip-set.
    ///
    /// Asks the provider for its head when the cache is empty; the answer is
    /// not inserted.
    pub fn best(&self) -> Result<Arc<TipSet>, CacheError> {
        match self.window.head() {
            Some(head) => Ok(head.clone()),
            None => self.router.head(&self.stats),
        }
    }

    /// The tip-set at `height`, or `None` for a null round.
    ///
    /// Heights outside the window are looked up through the provider,
    /// anchored at the current head (or the empty key when the cache is empty).
    pub fn get(&self, height: ChainEpoch) -> Result<Option<Arc<TipSet>>, CacheError> {
        match fallback::route(&self.window, height) {
            Route::Window(Some(ts)) => {
                self.stats.record(stats::WINDOW_HITS);
                Ok(Some(ts.clone()))
            }
            Route::Window(None) => {
                self.stats.record(stats::NULL_ROUNDS);
                Ok(None)
            }
            Route::Provider { anchor } => self.router.tipset_by_height(height, &anchor, &self.stats),
        }
    }

    /// The first tip-set at or above `height`, skipping null rounds.
    ///
    /// Stops at the head of the window, or at the provider's head when the
    /// cache is empty. Returns `None` if no tip-set exists up to that point.
    ///
    /// Unlike [`get`](Self::get), this may consult the provider once per
    /// height walked below the window. The walk ends at the first tip-set.
    pub fn get_non_null(&self, height: ChainEpoch) -> Result<Option<Arc<TipSet>>, CacheError> {
        let limit = match self.window.head_height() {
            Some(head) => head,
            None => self.best()?.height(),
        };
        for h in height..=limit {
            if let Some(ts) = self.get(h)? {
                return Ok(Some(ts));
            }
        }
        Ok(None)
    }

    /// Window-only lookup by tip-set key.
    pub fn get_by_key(&self, key: &TipSetKey) -> Option<Arc<TipSet>> {
        self.window.get_by_key(key).cloned()
    }

    pub fn contains(&self, key: &TipSetKey) -> bool {
        self.window.contains_key(key)
    }

    pub fn head_height(&self) -> Option<ChainEpoch> {
        self.window.head_height()
    }

    /// Lowest height answered from the window.
    pub fn tail_height(&self) -> Option<ChainEpoch> {
        self.window.tail_height()
    }

    /// Height span covered by the window, null rounds included.
    pub fn len(&self) -> usize {
        self.window.len()
    }

    /// Number of tip-sets held.
    pub fn occupied(&self) -> usize {
        self.window.occupied()
    }

    pub fn capacity(&self) -> usize {
        self.window.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    /// Cached tip-sets from the head downward.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<TipSet>> + '_ {
        self.window.iter()
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    pub fn provider(&self) -> &P {
        self.router.provider()
    }

    /// Verify the window invariants. Intended for tests and fuzzing.
    pub fn check_integrity(&self) -> Result<(), String> {
        self.window.check_integrity()
    }
}

impl<P> fmt::Debug for TipSetCache<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TipSetCache")
            .field("capacity", &self.window.capacity())
            .field("len", &self.window.len())
            .field("head_height", &self.window.head_height())
            .field("occupied", &self.window.occupied())
            .finish()
    }
}
