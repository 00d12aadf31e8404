//! Chain-data provider interface.
//!
//! The tip-set cache only reaches the chain through this trait, and only
//! when a request escapes its window. Node RPC clients, chain stores and
//! test doubles all implement it; the cache depends only on the trait.

pub mod error;

pub use error::ProviderError;

use std::sync::Arc;
use tipcache_types::{ChainEpoch, TipSet, TipSetKey};

/// Source of canonical chain data.
///
/// Calls may block on I/O. An implementation that supports cancellation
/// reports it as [`ProviderError::Cancelled`].
pub trait ChainProvider: Send + Sync {
    /// Canonical tip-set at `height` on the chain ending at `key`.
    ///
    /// An empty `key` means the provider's own head. `Ok(None)` is a null
    /// round, not an error.
    fn tipset_by_height(
        &self,
        height: ChainEpoch,
        key: &TipSetKey,
    ) -> Result<Option<TipSet>, ProviderError>;

    /// Current chain head.
    fn head(&self) -> Result<TipSet, ProviderError>;
}

impl<T: ChainProvider + ?Sized> ChainProvider for &T {
    fn tipset_by_height(
        &self,
        height: ChainEpoch,
        key: &TipSetKey,
    ) -> Result<Option<TipSet>, ProviderError> {
        (**self).tipset_by_height(height, key)
    }

    fn head(&self) -> Result<TipSet, ProviderError> {
        (**self).head()
    }
}

impl<T: ChainProvider + ?Sized> ChainProvider for Arc<T> {
    fn tipset_by_height(
        &self,
        height: ChainEpoch,
        key: &TipSetKey,
    ) -> Result<Option<TipSet>, ProviderError> {
        (**self).tipset_by_height(height, key)
    }

    fn head(&self) -> Result<TipSet, ProviderError> {
        (**self).head()
    }
}

impl<T: ChainProvider + ?Sized> ChainProvider for Box<T> {
    fn tipset_by_height(
        &self,
        height: ChainEpoch,
        key: &TipSetKey,
    ) -> Result<Option<TipSet>, ProviderError> {
        (**self).tipset_by_height(height, key)
    }

    fn head(&self) -> Result<TipSet, ProviderError> {
        (**self).head()
    }
}
