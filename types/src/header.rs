//! Block headers, reduced to the fields a tip-set needs.

use serde::{Deserialize, Serialize};

use crate::{ChainEpoch, Cid, TipSetKey};

/// A block header. Its [`Cid`] is derived from its bincode encoding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    /// Actor id of the miner that produced the block.
    pub miner: u64,
    pub height: ChainEpoch,
    /// Key of the parent tip-set.
    pub parents: TipSetKey,
    /// Election ticket. The lowest ticket orders first within a tip-set.
    pub ticket: [u8; 32],
    /// Unix seconds.
    pub timestamp: u64,
}

impl BlockHeader {
    pub fn new(miner: u64, height: ChainEpoch, parents: TipSetKey) -> Self {
        Self {
            miner,
            height,
            parents,
            ticket: [0u8; 32],
            timestamp: 0,
        }
    }

    pub fn with_ticket(mut self, ticket: [u8; 32]) -> Self {
        self.ticket = ticket;
        self
    }

    pub fn with_timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Canonical encoding used for content addressing.
    pub fn to_bytes(&self) -> Vec<u8> {
        bincode::serialize(self).expect("BlockHeader is always serializable")
    }

    pub fn cid(&self) -> Cid {
        Cid::digest(&self.to_bytes())
    }
}
