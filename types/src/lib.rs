//! Chain types shared by the tip-set cache and its providers.
//!
//! A tip-set is the set of blocks mined at one height on top of the same
//! parent tip-set. It is identified by the ordered cids of its blocks.

pub mod cid;
pub mod error;
pub mod header;
pub mod key;
pub mod tipset;

pub use cid::Cid;
pub use error::TipSetError;
pub use header::BlockHeader;
pub use key::TipSetKey;
pub use tipset::TipSet;

/// Block height. Heights with no tip-set are null rounds.
pub type ChainEpoch = u64;
