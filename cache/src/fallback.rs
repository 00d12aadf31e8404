//! Routing of reads that the window cannot answer.
//!
//! | call     | window            | action                              |
//! |----------|-------------------|-------------------------------------|
//! | `best`   | empty             | provider `head`                     |
//! | `best`   | populated         | head slot                           |
//! | `get(h)` | `h` in window     | slot, tip-set or null round         |
//! | `get(h)` | `h` outside       | provider `tipset_by_height(h, key)` |
//!
//! `add` and `revert` never reach the provider. Provider answers are never
//! inserted: the window only accepts tip-sets with checked linkage.

use std::sync::Arc;

use tipcache_provider::ChainProvider;
use tipcache_types::{ChainEpoch, TipSet, TipSetKey};
use tracing::debug;

use crate::stats::{self, CacheStats};
use crate::window::Window;
use crate::CacheError;

/// Where a height lookup is answered.
#[derive(Debug)]
pub(crate) enum Route<'a> {
    /// Inside the window; `None` is a null round.
    Window(Option<&'a Arc<TipSet>>),
    /// Outside the window; ask the provider from `anchor`.
    Provider { anchor: TipSetKey },
}

pub(crate) fn route(window: &Window, height: ChainEpoch) -> Route<'_> {
    match window.get(height) {
        Some(slot) => Route::Window(slot),
        None => Route::Provider {
            anchor: window
                .head()
                .map(|head| head.key().clone())
                .unwrap_or_else(TipSetKey::empty),
        },
    }
}

/// Owns the provider handle and performs at most one call per request.
pub(crate) struct FallbackRouter<P> {
    provider: P,
}

impl<P: ChainProvider> FallbackRouter<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn head(&self, stats: &CacheStats) -> Result<Arc<TipSet>, CacheError> {
        debug!("tip-set cache is empty, requesting head from provider");
        stats.record(stats::PROVIDER_HEAD);
        Ok(Arc::new(self.provider.head()?))
    }

    pub fn tipset_by_height(
        &self,
        height: ChainEpoch,
        anchor: &TipSetKey,
        stats: &CacheStats,
    ) -> Result<Option<Arc<TipSet>>, CacheError> {
        debug!(height, anchor = %anchor, "height outside tip-set cache window, requesting from provider");
        stats.record(stats::PROVIDER_HEIGHT);
        Ok(self.provider.tipset_by_height(height, anchor)?.map(Arc::new))
    }
}
