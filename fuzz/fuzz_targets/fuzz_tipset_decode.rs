#![no_main]

use libfuzzer_sys::fuzz_target;

use tipcache_types::{BlockHeader, TipSet, TipSetKey};

fuzz_target!(|data: &[u8]| {
    // Decoding revalidates the tip-set, so arbitrary bytes must either fail
    // or produce a consistent tip-set.
    if let Ok(ts) = bincode::deserialize::<TipSet>(data) {
        assert!(!ts.blocks().is_empty());
        assert_eq!(ts.cids().len(), ts.blocks().len());
        assert!(ts.blocks().iter().all(|b| b.height == ts.height()));
    }

    let _ = bincode::deserialize::<BlockHeader>(data);
    let _ = bincode::deserialize::<TipSetKey>(data);
});
