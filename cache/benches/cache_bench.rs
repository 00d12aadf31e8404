use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use tipcache::TipSetCache;
use tipcache_nullables::{ChainBuilder, NullProvider};
use tipcache_types::TipSet;

fn linked_chain(start: u64, len: usize) -> Vec<TipSet> {
    let mut chain = ChainBuilder::new(start);
    (0..len).map(|_| chain.next()).collect()
}

fn bench_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("tipset_cache_add");
    let tipsets = linked_chain(1, 2_000);

    for capacity in [50usize, 900] {
        group.bench_with_input(BenchmarkId::new("add", capacity), &capacity, |b, &cap| {
            b.iter(|| {
                let mut cache = TipSetCache::new(cap, NullProvider).unwrap();
                for ts in &tipsets {
                    cache.add(black_box(ts.clone())).unwrap();
                }
                black_box(cache.len())
            });
        });
    }

    group.finish();
}

fn bench_get_hit(c: &mut Criterion) {
    let mut cache = TipSetCache::new(50, NullProvider).unwrap();
    for ts in linked_chain(1, 50) {
        cache.add(ts).unwrap();
    }

    c.bench_function("tipset_cache_get_hit", |b| {
        let mut height = 1u64;
        b.iter(|| {
            height = height % 50 + 1;
            black_box(cache.get(black_box(height)).unwrap())
        });
    });
}

fn bench_revert_add(c: &mut Criterion) {
    let mut cache = TipSetCache::new(50, NullProvider).unwrap();
    let tipsets = linked_chain(1, 51);
    for ts in &tipsets[..50] {
        cache.add(ts.clone()).unwrap();
    }
    let tip = tipsets[50].clone();

    c.bench_function("tipset_cache_add_revert", |b| {
        b.iter(|| {
            cache.add(black_box(tip.clone())).unwrap();
            black_box(cache.revert(&tip).unwrap())
        });
    });
}

criterion_group!(benches, bench_add, bench_get_hit, bench_revert_add);
criterion_main!(benches);
