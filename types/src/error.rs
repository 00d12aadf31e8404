use thiserror::Error;

use crate::{ChainEpoch, Cid};

/// Reasons a set of headers cannot form a tip-set.
#[derive(Debug, Error)]
pub enum TipSetError {
    #[error("tip-set must contain at least one block")]
    Empty,

    #[error("block height mismatch: expected {expected}, got {got}")]
    MismatchedHeight { expected: ChainEpoch, got: ChainEpoch },

    #[error("blocks in a tip-set must share the same parents")]
    MismatchedParents,

    #[error("duplicate block {0}")]
    DuplicateBlock(Cid),
}
