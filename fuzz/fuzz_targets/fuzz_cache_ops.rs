#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use tipcache::TipSetCache;
use tipcache_nullables::{ChainBuilder, NullProvider};

#[derive(Debug, Arbitrary)]
enum Op {
    Add { gap: u8 },
    Revert,
    /// A tip-set that does not build on the head; must be rejected.
    Orphan { gap: u8 },
    /// Lookup relative to the window head; must never reach the provider.
    Get { back: u8 },
}

#[derive(Debug, Arbitrary)]
struct Input {
    capacity: u8,
    ops: Vec<Op>,
}

// Drive the cache with arbitrary apply/revert sequences. The provider panics
// if called, so every lookup must be answered from the window, and the
// window invariants must hold after every step.
fuzz_target!(|input: Input| {
    let capacity = usize::from(input.capacity).max(1);
    let mut cache = TipSetCache::new(capacity, NullProvider).unwrap();
    let mut chain = ChainBuilder::new(1_000);

    for op in input.ops {
        match op {
            Op::Add { gap } => {
                chain.skip(u64::from(gap));
                cache.add(chain.next()).unwrap();
            }
            Op::Revert => {
                if let Some(head) = cache.iter().next().cloned() {
                    cache.revert(&head).unwrap();
                    chain.pop();
                }
            }
            Op::Orphan { gap } => {
                if let Some(head) = cache.head_height() {
                    let orphan = chain.detached(head + 1 + u64::from(gap));
                    assert!(cache.add(orphan).is_err());
                }
            }
            Op::Get { back } => {
                if let (Some(head), Some(tail)) = (cache.head_height(), cache.tail_height()) {
                    let height = head.saturating_sub(u64::from(back)).max(tail);
                    let _ = cache.get(height).unwrap();
                }
            }
        }
        cache.check_integrity().unwrap();
        assert!(cache.len() <= capacity);
    }
});
