//! Ring storage translating heights to slots.
//!
//! The window covers `[head_height - len + 1, head_height]`. Slot
//! `(head_index - k) mod capacity` holds the tip-set at `head_height - k`,
//! or nothing for a null round. Slots outside the window are always empty
//! and the head slot is always occupied.

use std::collections::HashMap;
use std::sync::Arc;

use tipcache_types::{ChainEpoch, TipSet, TipSetKey};

#[derive(Debug)]
pub(crate) struct Window {
    slots: Vec<Option<Arc<TipSet>>>,
    head_index: usize,
    len: usize,
    /// Meaningless while `len == 0`.
    head_height: ChainEpoch,
    by_key: HashMap<TipSetKey, ChainEpoch>,
}

impl Window {
    pub fn new(capacity: usize) -> Self {
        debug_assert!(capacity > 0);
        Self {
            slots: vec![None; capacity],
            head_index: 0,
            len: 0,
            head_height: 0,
            by_key: HashMap::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Height span currently covered, null rounds included.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of occupied slots.
    pub fn occupied(&self) -> usize {
        self.by_key.len()
    }

    pub fn head(&self) -> Option<&Arc<TipSet>> {
        if self.len == 0 {
            return None;
        }
        self.slots[self.head_index].as_ref()
    }

    pub fn head_height(&self) -> Option<ChainEpoch> {
        (self.len > 0).then_some(self.head_height)
    }

    /// Lowest height the window can answer for.
    pub fn tail_height(&self) -> Option<ChainEpoch> {
        (self.len > 0).then(|| self.head_height - (self.len as u64 - 1))
    }

    fn index_of(&self, height: ChainEpoch) -> Option<usize> {
        let tail = self.tail_height()?;
        if height < tail || height > self.head_height {
            return None;
        }
        let back = (self.head_height - height) as usize;
        let cap = self.capacity();
        Some((self.head_index + cap - back) % cap)
    }

    /// `None` when `height` is outside the window, `Some(None)` for a null round.
    pub fn get(&self, height: ChainEpoch) -> Option<Option<&Arc<TipSet>>> {
        self.index_of(height).map(|i| self.slots[i].as_ref())
    }

    pub fn get_by_key(&self, key: &TipSetKey) -> Option<&Arc<TipSet>> {
        let height = *self.by_key.get(key)?;
        self.get(height).flatten()
    }

    pub fn contains_key(&self, key: &TipSetKey) -> bool {
        self.by_key.contains_key(key)
    }

    /// Place `ts` on top of the window and return whatever fell off the tail.
    ///
    /// Heights skipped between the old head and `ts` become null rounds.
    /// The caller must have validated linkage, so `ts` is above the head.
    pub fn push(&mut self, ts: Arc<TipSet>) -> Vec<Arc<TipSet>> {
        let cap = self.capacity();
        let mut evicted = Vec::new();

        if self.len == 0 {
            self.head_index = 0;
            self.len = 1;
        } else {
            debug_assert!(ts.height() > self.head_height);
            let steps = ts.height() - self.head_height;
            if steps >= cap as u64 {
                evicted.extend(self.slots.iter_mut().filter_map(Option::take));
                self.head_index = (self.head_index + (steps % cap as u64) as usize) % cap;
                self.len = cap;
            } else {
                for _ in 0..steps {
                    self.head_index = (self.head_index + 1) % cap;
                    evicted.extend(self.slots[self.head_index].take());
                    self.len = (self.len + 1).min(cap);
                }
            }
        }

        for old in &evicted {
            self.by_key.remove(old.key());
        }
        self.head_height = ts.height();
        self.by_key.insert(ts.key().clone(), ts.height());
        self.slots[self.head_index] = Some(ts);
        evicted
    }

    /// Remove the head, then drop any null rounds it exposes so the new
    /// head is occupied again. Returns `None` on an empty window.
    pub fn pop(&mut self) -> Option<Arc<TipSet>> {
        if self.len == 0 {
            return None;
        }
        let removed = self.slots[self.head_index].take();
        if let Some(ts) = &removed {
            self.by_key.remove(ts.key());
        }
        self.retreat();
        while self.len > 0 && self.slots[self.head_index].is_none() {
            self.retreat();
        }
        removed
    }

    fn retreat(&mut self) {
        let cap = self.capacity();
        self.head_index = (self.head_index + cap - 1) % cap;
        self.len -= 1;
        if self.len > 0 {
            self.head_height -= 1;
        }
    }

    /// Occupied tip-sets from the head downward.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<TipSet>> + '_ {
        let cap = self.capacity();
        (0..self.len).filter_map(move |back| self.slots[(self.head_index + cap - back) % cap].as_ref())
    }

    /// Verify the structural invariants, describing the first violation found.
    pub fn check_integrity(&self) -> Result<(), String> {
        let cap = self.capacity();
        if self.len > cap {
            return Err(format!("length {} exceeds capacity {}", self.len, cap));
        }
        if self.len == 0 {
            if self.slots.iter().any(Option::is_some) || !self.by_key.is_empty() {
                return Err("empty window still holds tip-sets".to_string());
            }
            return Ok(());
        }

        match &self.slots[self.head_index] {
            Some(head) if head.height() == self.head_height => {}
            Some(head) => {
                return Err(format!(
                    "head slot holds height {}, expected {}",
                    head.height(),
                    self.head_height
                ))
            }
            None => return Err("head slot is empty".to_string()),
        }

        let mut occupied = 0;
        let mut above: Option<&Arc<TipSet>> = None;
        for back in 0..cap {
            let slot = &self.slots[(self.head_index + cap - back) % cap];
            if back >= self.len {
                if slot.is_some() {
                    return Err(format!("slot {} behind the head lies outside the window but is occupied", back));
                }
                continue;
            }
            let Some(ts) = slot else { continue };
            let expected = self.head_height - back as u64;
            if ts.height() != expected {
                return Err(format!("slot for height {} holds height {}", expected, ts.height()));
            }
            if self.by_key.get(ts.key()) != Some(&expected) {
                return Err(format!("tip-set at height {} missing from key index", expected));
            }
            if let Some(child) = above {
                if !ts.is_parent_of(child) {
                    return Err(format!(
                        "tip-set at height {} does not link to height {}",
                        child.height(),
                        expected
                    ));
                }
            }
            above = Some(ts);
            occupied += 1;
        }
        if occupied != self.by_key.len() {
            return Err(format!(
                "key index holds {} entries for {} occupied slots",
                self.by_key.len(),
                occupied
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tipcache_types::BlockHeader;

    /// Linked tip-sets for the given heights, in order.
    fn chain(heights: &[ChainEpoch]) -> Vec<Arc<TipSet>> {
        let mut parents = TipSetKey::empty();
        heights
            .iter()
            .map(|&h| {
                let ts = TipSet::new(vec![BlockHeader::new(1, h, parents.clone())]).unwrap();
                parents = ts.key().clone();
                Arc::new(ts)
            })
            .collect()
    }

    fn filled(capacity: usize, heights: &[ChainEpoch]) -> (Window, Vec<Arc<TipSet>>) {
        let mut window = Window::new(capacity);
        let tipsets = chain(heights);
        for ts in &tipsets {
            window.push(ts.clone());
        }
        (window, tipsets)
    }

    #[test]
    fn first_push_lands_in_slot_zero() {
        let (window, tipsets) = filled(4, &[10]);
        assert_eq!(window.len(), 1);
        assert_eq!(window.head_height(), Some(10));
        assert_eq!(window.tail_height(), Some(10));
        assert!(Arc::ptr_eq(window.slots[0].as_ref().unwrap(), &tipsets[0]));
        window.check_integrity().unwrap();
    }

    #[test]
    fn gap_leaves_null_slots() {
        let (window, _) = filled(10, &[10, 11, 15]);
        assert_eq!(window.len(), 6);
        assert_eq!(window.occupied(), 3);
        for h in 12..15 {
            assert_eq!(window.get(h), Some(None));
        }
        assert_eq!(window.get(15).unwrap().unwrap().height(), 15);
        assert_eq!(window.get(9), None);
        assert_eq!(window.get(16), None);
        window.check_integrity().unwrap();
    }

    #[test]
    fn wraps_and_evicts_tail() {
        let (window, tipsets) = filled(4, &[10, 11, 12, 13, 14]);
        assert_eq!(window.len(), 4);
        assert_eq!(window.tail_height(), Some(11));
        assert_eq!(window.get(10), None);
        assert!(!window.contains_key(tipsets[0].key()));
        assert!(window.contains_key(tipsets[1].key()));
        window.check_integrity().unwrap();
    }

    #[test]
    fn push_reports_evictions() {
        let mut window = Window::new(3);
        let tipsets = chain(&[1, 2, 3, 4]);
        for ts in &tipsets[..3] {
            assert!(window.push(ts.clone()).is_empty());
        }
        let evicted = window.push(tipsets[3].clone());
        assert_eq!(evicted.len(), 1);
        assert_eq!(evicted[0].height(), 1);
    }

    #[test]
    fn gap_wider_than_capacity_clears_everything() {
        let (window, tipsets) = filled(4, &[10, 11, 100]);
        assert_eq!(window.len(), 4);
        assert_eq!(window.occupied(), 1);
        assert_eq!(window.tail_height(), Some(97));
        assert_eq!(window.head().unwrap().key(), tipsets[2].key());
        window.check_integrity().unwrap();
    }

    #[test]
    fn pop_collapses_null_rounds() {
        let (mut window, _) = filled(10, &[10, 11, 15]);
        let popped = window.pop().unwrap();
        assert_eq!(popped.height(), 15);
        assert_eq!(window.head_height(), Some(11));
        assert_eq!(window.len(), 2);
        window.check_integrity().unwrap();
    }

    #[test]
    fn pop_to_empty() {
        let (mut window, _) = filled(4, &[10]);
        assert!(window.pop().is_some());
        assert!(window.is_empty());
        assert_eq!(window.head_height(), None);
        assert!(window.pop().is_none());
        window.check_integrity().unwrap();
    }

    #[test]
    fn pop_drains_when_only_nulls_remain() {
        // After eviction the tail is a run of null rounds below the head.
        let (mut window, _) = filled(4, &[10, 12, 13, 14, 15]);
        assert_eq!(window.tail_height(), Some(12));
        for expected in [15, 14, 13, 12] {
            assert_eq!(window.pop().unwrap().height(), expected);
        }
        assert!(window.is_empty());

        let (mut window, _) = filled(3, &[10, 12, 13]);
        assert_eq!(window.tail_height(), Some(11));
        window.pop();
        window.pop();
        assert!(window.is_empty());
    }

    #[test]
    fn iter_walks_down_from_head() {
        let (window, _) = filled(8, &[1, 2, 5, 6]);
        let heights: Vec<_> = window.iter().map(|ts| ts.height()).collect();
        assert_eq!(heights, vec![6, 5, 2, 1]);
    }

    #[test]
    fn lookup_by_key() {
        let (window, tipsets) = filled(8, &[1, 2, 5]);
        assert_eq!(window.get_by_key(tipsets[1].key()).unwrap().height(), 2);
        assert!(window.get_by_key(&TipSetKey::empty()).is_none());
    }
}
