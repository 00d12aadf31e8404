//! Tip-sets: the blocks produced at one height on top of the same parents.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{BlockHeader, ChainEpoch, Cid, TipSetError, TipSetKey};

/// An immutable tip-set.
///
/// Blocks are kept sorted by `(ticket, cid)` so that the [`TipSetKey`] is
/// canonical regardless of the order the headers were supplied in.
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "Vec<BlockHeader>", into = "Vec<BlockHeader>")]
pub struct TipSet {
    blocks: Vec<BlockHeader>,
    key: TipSetKey,
}

impl TipSet {
    /// Build a tip-set from its block headers.
    ///
    /// All headers must share the same height and parents, and no block may
    /// appear twice.
    pub fn new(headers: Vec<BlockHeader>) -> Result<Self, TipSetError> {
        let first = headers.first().ok_or(TipSetError::Empty)?;
        let height = first.height;
        let parents = first.parents.clone();

        let mut blocks: Vec<(Cid, BlockHeader)> = Vec::with_capacity(headers.len());
        for header in headers {
            if header.height != height {
                return Err(TipSetError::MismatchedHeight {
                    expected: height,
                    got: header.height,
                });
            }
            if header.parents != parents {
                return Err(TipSetError::MismatchedParents);
            }
            let cid = header.cid();
            if blocks.iter().any(|(c, _)| *c == cid) {
                return Err(TipSetError::DuplicateBlock(cid));
            }
            blocks.push((cid, header));
        }

        blocks.sort_by(|(ca, a), (cb, b)| a.ticket.cmp(&b.ticket).then_with(|| ca.cmp(cb)));
        let key = blocks.iter().map(|(cid, _)| *cid).collect();
        let blocks = blocks.into_iter().map(|(_, header)| header).collect();

        Ok(Self { blocks, key })
    }

    pub fn height(&self) -> ChainEpoch {
        self.blocks[0].height
    }

    /// The key identifying this tip-set (its block cids).
    pub fn key(&self) -> &TipSetKey {
        &self.key
    }

    pub fn cids(&self) -> &[Cid] {
        self.key.cids()
    }

    /// Key of the parent tip-set.
    pub fn parents(&self) -> &TipSetKey {
        &self.blocks[0].parents
    }

    pub fn blocks(&self) -> &[BlockHeader] {
        &self.blocks
    }

    /// The block with the lowest ticket.
    pub fn min_ticket_block(&self) -> &BlockHeader {
        &self.blocks[0]
    }

    /// Whether `child` names this tip-set as its parent.
    pub fn is_parent_of(&self, child: &TipSet) -> bool {
        child.parents() == self.key()
    }
}

impl TryFrom<Vec<BlockHeader>> for TipSet {
    type Error = TipSetError;

    fn try_from(headers: Vec<BlockHeader>) -> Result<Self, Self::Error> {
        Self::new(headers)
    }
}

impl From<TipSet> for Vec<BlockHeader> {
    fn from(ts: TipSet) -> Self {
        ts.blocks
    }
}

impl PartialEq for TipSet {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for TipSet {}

impl fmt::Debug for TipSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TipSet")
            .field("height", &self.height())
            .field("key", &self.key)
            .finish()
    }
}
