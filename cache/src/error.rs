use thiserror::Error;

use tipcache_provider::ProviderError;
use tipcache_types::{ChainEpoch, TipSetKey};

#[derive(Debug, Error)]
pub enum CacheError {
    /// The appended tip-set does not build on the current head.
    #[error("parent mismatch: expected parents {expected}, got {got}")]
    ParentMismatch { expected: TipSetKey, got: TipSetKey },

    #[error("non-monotonic height: head is at {head}, got {height}")]
    NonMonotonic { head: ChainEpoch, height: ChainEpoch },

    #[error("cannot revert an empty cache")]
    Empty,

    /// The reverted tip-set is not the current head.
    #[error("revert of {got} does not match head {head}")]
    NotHead { head: TipSetKey, got: TipSetKey },

    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("cache capacity must be at least 1")]
    InvalidCapacity,

    #[error("config error: {0}")]
    Config(String),
}
