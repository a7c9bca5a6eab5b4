//! Criterion benchmarks for the overlap resolver.
//!
//! Benchmarks:
//!   - resolve_group over a chain of laterally-linked blocks with one full
//!     overlapper (the common reprocessing shape after a road edit)
//!   - pairwise bisection alone over two coincident blocks
//!
//! Run with: cargo bench -p zoning --bench overlap_bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use bevy::math::Vec2;

use zoning::config::CELL_SIZE;
use zoning::grid::ZoneTypeMeta;
use zoning::overlap::{resolve_group, resolve_pair, GroupEntry, OverlapGroup, PairMode};
use zoning::{BlockId, BlockSize, ParcelRegistry, ZoneBlockStore};

/// A row of `count` adjacent 4x6 blocks, each overlapped by one younger
/// block shifted half a block into it.
fn chain_fixture(count: usize) -> (ZoneBlockStore, OverlapGroup) {
    let mut store = ZoneBlockStore::default();
    let size = BlockSize::new(4, 6);
    let span = size.width as f32 * CELL_SIZE;

    let base: Vec<BlockId> = (0..count)
        .map(|i| store.insert(Vec2::new(i as f32 * span, 0.0), Vec2::Y, size, i as u32))
        .collect();
    let over: Vec<BlockId> = (0..count)
        .map(|i| {
            store.insert(
                Vec2::new(i as f32 * span + span * 0.5, 0.0),
                Vec2::Y,
                size,
                (count + i) as u32,
            )
        })
        .collect();

    let mut group = OverlapGroup::default();
    for i in 0..count {
        let mut entry = GroupEntry::new(base[i]).with_overlap(over[i]);
        if i > 0 {
            entry = entry.with_left(base[i - 1]);
        }
        if i + 1 < count {
            entry = entry.with_right(base[i + 1]);
        }
        group.entries.push(entry);
        group.entries.push(GroupEntry::new(over[i]).with_overlap(base[i]));
    }
    (store, group)
}

fn bench_resolve_group(c: &mut Criterion) {
    let mut bench_group = c.benchmark_group("overlap_resolve_group");
    bench_group.sample_size(50);

    let registry = ParcelRegistry::default();
    let meta = ZoneTypeMeta::default();

    for count in [4, 16] {
        let (store, group) = chain_fixture(count);
        bench_group.bench_function(format!("chain_{count}"), |b| {
            b.iter(|| {
                let mut store = store.clone();
                resolve_group(&mut store, black_box(&group), &registry, &meta);
                black_box(store.len())
            });
        });
    }

    bench_group.finish();
}

fn bench_pairwise_bisection(c: &mut Criterion) {
    let mut bench_group = c.benchmark_group("overlap_pairwise");
    bench_group.sample_size(100);

    let registry = ParcelRegistry::default();
    let mut store = ZoneBlockStore::default();
    let a = store.insert(Vec2::ZERO, Vec2::Y, BlockSize::new(6, 6), 0);
    let b = store.insert(Vec2::ZERO, Vec2::Y, BlockSize::new(6, 6), 1);

    bench_group.bench_function("coincident_6x6", |bench| {
        bench.iter(|| {
            resolve_pair(
                &mut store,
                black_box(a),
                black_box(b),
                PairMode::Redundancy,
                &registry,
            );
        });
    });

    bench_group.finish();
}

criterion_group!(benches, bench_resolve_group, bench_pairwise_bisection);
criterion_main!(benches);
