use std::collections::HashMap;
use std::sync::Arc;

use proptest::prelude::*;

use tipcache::{CacheError, TipSetCache};
use tipcache_nullables::{ChainBuilder, MemoryProvider, NullProvider};
use tipcache_provider::ChainProvider;
use tipcache_types::TipSetKey;

#[derive(Debug, Clone)]
enum Op {
    /// Append after `gap` null rounds.
    Add { gap: u64 },
    Revert,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0u64..4).prop_map(|gap| Op::Add { gap }),
        1 => Just(Op::Revert),
    ]
}

fn apply<P: ChainProvider>(cache: &mut TipSetCache<P>, chain: &mut ChainBuilder, op: &Op) {
    match op {
        Op::Add { gap } => {
            chain.skip(*gap);
            cache.add(chain.next()).unwrap();
        }
        Op::Revert => {
            if cache.is_empty() {
                return;
            }
            let best = cache.best().unwrap();
            cache.revert(&best).unwrap();
            chain.pop();
        }
    }
}

fn snapshot<P: ChainProvider>(cache: &TipSetCache<P>) -> (Option<u64>, usize, Vec<TipSetKey>) {
    (
        cache.head_height(),
        cache.len(),
        cache.iter().map(|ts| ts.key().clone()).collect(),
    )
}

/// Head height and occupied keys. Leading null rounds at the tail may be
/// evicted by an add without any tip-set leaving, so length is not compared.
fn contents<P: ChainProvider>(cache: &TipSetCache<P>) -> (Option<u64>, Vec<TipSetKey>) {
    (
        cache.head_height(),
        cache.iter().map(|ts| ts.key().clone()).collect(),
    )
}

proptest! {
    /// Window invariants hold after every successful add and revert, every
    /// tip-set still inside the window reads back, and every other height in
    /// the window reads back as a null round.
    #[test]
    fn window_tracks_chain(
        capacity in 1usize..24,
        ops in prop::collection::vec(op(), 1..200),
    ) {
        let mut cache = TipSetCache::new(capacity, NullProvider).unwrap();
        let mut chain = ChainBuilder::new(1_000);

        for op in &ops {
            apply(&mut cache, &mut chain, op);

            prop_assert!(cache.len() <= capacity);
            prop_assert!(cache.check_integrity().is_ok(), "{:?}", cache.check_integrity());

            let (Some(head), Some(tail)) = (cache.head_height(), cache.tail_height()) else {
                prop_assert!(cache.is_empty());
                continue;
            };
            prop_assert_eq!(cache.best().unwrap().height(), head);
            prop_assert_eq!(head - tail + 1, cache.len() as u64);

            let history: HashMap<u64, TipSetKey> = chain
                .history()
                .iter()
                .map(|ts| (ts.height(), ts.key().clone()))
                .collect();
            for height in tail..=head {
                let cached = cache.get(height).unwrap();
                match history.get(&height) {
                    Some(key) => prop_assert_eq!(cached.map(|ts| ts.key().clone()), Some(key.clone())),
                    None => prop_assert!(cached.is_none()),
                }
            }
        }
    }

    /// Adding a tip-set and reverting it restores the head and every cached
    /// tip-set, unless the add pushed one off the tail. The tail never moves
    /// down.
    #[test]
    fn add_then_revert_restores_window(
        capacity in 1usize..24,
        ops in prop::collection::vec(op(), 1..80),
        gap in 0u64..30,
    ) {
        let mut cache = TipSetCache::new(capacity, NullProvider).unwrap();
        let mut chain = ChainBuilder::new(50);
        for op in &ops {
            apply(&mut cache, &mut chain, op);
        }
        prop_assume!(!cache.is_empty());

        let before = contents(&cache);
        let tail = cache.tail_height();
        let evictions = cache.stats().evictions();

        chain.skip(gap);
        let ts = chain.next();
        cache.add(ts.clone()).unwrap();
        cache.revert(&ts).unwrap();

        if cache.stats().evictions() == evictions {
            prop_assert_eq!(contents(&cache), before);
        }
        if let (Some(old), Some(new)) = (tail, cache.tail_height()) {
            prop_assert!(new >= old, "tail moved down from {} to {}", old, new);
        }
        prop_assert!(cache.check_integrity().is_ok());
    }

    /// A tip-set that does not build on the head is rejected without mutation.
    #[test]
    fn parent_mismatch_never_mutates(
        capacity in 1usize..24,
        ops in prop::collection::vec(op(), 1..80),
        gap in 0u64..30,
    ) {
        let mut cache = TipSetCache::new(capacity, NullProvider).unwrap();
        let mut chain = ChainBuilder::new(50);
        for op in &ops {
            apply(&mut cache, &mut chain, op);
        }
        prop_assume!(!cache.is_empty());

        let before = snapshot(&cache);
        let adds = cache.stats().adds();
        let head = cache.head_height().unwrap();

        let orphan = chain.detached(head + 1 + gap);
        let result = cache.add(orphan);
        let mismatch = matches!(result, Err(CacheError::ParentMismatch { .. }));
        prop_assert!(mismatch, "expected ParentMismatch, got {:?}", result);
        prop_assert_eq!(snapshot(&cache), before);
        prop_assert_eq!(cache.stats().adds(), adds);
    }

    /// `best` on an empty cache asks the provider once per call and never
    /// populates the window.
    #[test]
    fn empty_best_never_populates(calls in 1usize..20) {
        let provider = Arc::new(MemoryProvider::with_chain([ChainBuilder::new(3).next()]));
        let cache = TipSetCache::new(8, provider.clone()).unwrap();

        for i in 1..=calls {
            prop_assert_eq!(cache.best().unwrap().height(), 3);
            prop_assert_eq!(provider.head_calls(), i);
            prop_assert!(cache.is_empty());
        }
    }
}
