use thiserror::Error;

use tipcache_types::ChainEpoch;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("no tip-set known at height {0}")]
    NotFound(ChainEpoch),

    #[error("chain provider unavailable: {0}")]
    Unavailable(String),

    #[error("chain backend error: {0}")]
    Backend(String),

    #[error("request cancelled")]
    Cancelled,
}
