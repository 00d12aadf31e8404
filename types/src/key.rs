//! Tip-set keys: the ordered cids of the blocks in a tip-set.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Cid;

/// Ordered set of block cids identifying a tip-set.
///
/// Two keys are equal only if they hold the same cids in the same order.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TipSetKey(Vec<Cid>);

impl TipSetKey {
    /// The key that identifies no tip-set. Used as the "from genesis" lookup anchor.
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn new(cids: Vec<Cid>) -> Self {
        Self(cids)
    }

    pub fn cids(&self) -> &[Cid] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, cid: &Cid) -> bool {
        self.0.contains(cid)
    }
}

impl From<Vec<Cid>> for TipSetKey {
    fn from(cids: Vec<Cid>) -> Self {
        Self(cids)
    }
}

impl FromIterator<Cid> for TipSetKey {
    fn from_iter<I: IntoIterator<Item = Cid>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Debug for TipSetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

impl fmt::Display for TipSetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, cid) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", cid)?;
        }
        write!(f, "}}")
    }
}
