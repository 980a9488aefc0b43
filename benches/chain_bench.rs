// benches/chain_bench.rs

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use l1probe::core::arena::{Arena, SLOT_BYTES};
use l1probe::core::chain_random::ChainRandom;
use l1probe::core::pointer_chain::{chase, PointerChain};

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain_build");
    let mut arena = Arena::new(1 << 20);
    let mut random = ChainRandom::from_seed(1);

    for len in [8usize, 32, 98] {
        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, &len| {
            b.iter(|| PointerChain::build(&mut arena, 0, 4096 / SLOT_BYTES, black_box(len), &mut random));
        });
    }
    group.finish();
}

fn bench_chase(c: &mut Criterion) {
    let mut group = c.benchmark_group("chase_10k");
    let mut arena = Arena::new(1 << 20);

    for way_size in [64usize, 4096, 16384] {
        let chain = PointerChain::build(&mut arena, 0, way_size / SLOT_BYTES, 16, &mut ChainRandom::from_seed(2));
        group.bench_with_input(BenchmarkId::from_parameter(way_size), &chain, |b, chain| {
            b.iter(|| chase(arena.slots(), chain.start(), 10_000));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_chase);
criterion_main!(benches);
