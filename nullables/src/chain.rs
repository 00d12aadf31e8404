//! Deterministic chain generation.

use tipcache_types::{BlockHeader, ChainEpoch, TipSet, TipSetKey};

/// Builds a linear chain of single-block tip-sets.
///
/// Each [`next`](Self::next) tip-set names the previous one as its parent.
/// Heights only advance when you tell them to, and [`skip`](Self::skip)
/// leaves null rounds behind.
#[derive(Debug, Clone)]
pub struct ChainBuilder {
    miner: u64,
    height: ChainEpoch,
    history: Vec<TipSet>,
}

impl ChainBuilder {
    /// Start a chain whose first tip-set is at `height` with no parents.
    pub fn new(height: ChainEpoch) -> Self {
        Self {
            miner: 1000,
            height,
            history: Vec::new(),
        }
    }

    /// Height the next tip-set will be produced at.
    pub fn height(&self) -> ChainEpoch {
        self.height
    }

    /// Most recent tip-set, if any.
    pub fn tip(&self) -> Option<&TipSet> {
        self.history.last()
    }

    pub fn history(&self) -> &[TipSet] {
        &self.history
    }

    /// Produce the next tip-set on top of the current tip.
    pub fn next(&mut self) -> TipSet {
        let parents = self
            .tip()
            .map(|tip| tip.key().clone())
            .unwrap_or_else(TipSetKey::empty);
        let ts = self.build(self.height, parents);
        self.history.push(ts.clone());
        self.height += 1;
        ts
    }

    /// Leave `n` null rounds before the next tip-set.
    pub fn skip(&mut self, n: u64) {
        self.height += n;
    }

    /// Drop the tip, continuing from the tip-set beneath it.
    pub fn pop(&mut self) -> Option<TipSet> {
        let popped = self.history.pop()?;
        self.height = match self.tip() {
            Some(tip) => tip.height() + 1,
            None => popped.height(),
        };
        Some(popped)
    }

    /// Switch to a different miner so later tip-sets form a competing branch.
    pub fn fork(&mut self, miner: u64) {
        self.miner = miner;
    }

    /// A tip-set at `height` that builds on nothing. Not recorded in history.
    pub fn detached(&self, height: ChainEpoch) -> TipSet {
        self.build(height, TipSetKey::empty())
    }

    fn build(&self, height: ChainEpoch, parents: TipSetKey) -> TipSet {
        let header = BlockHeader::new(self.miner, height, parents).with_timestamp(height * 30);
        TipSet::new(vec![header]).expect("single-header tip-set is always valid")
    }
}
