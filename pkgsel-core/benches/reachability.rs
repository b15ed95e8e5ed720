//! Reachability and evaluation benchmarks.
//!
//! `Reaches(A, B)` over every package of a layered import graph should stay
//! linear in packages plus edges, however many seeds share the same
//! dependencies.

#![allow(clippy::uninlined_format_args)]
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use pkgsel_core::query::{self, Catalog, EvalOptions};
use pkgsel_core::universe::{PackageRecord, Snapshot};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Layered graph: every package imports up to four packages from the layer
/// below, so long shared chains dominate the work.
fn layered_universe(count: usize) -> Snapshot {
    let mut rng = StdRng::seed_from_u64(42);
    let width = 64;
    let path = |index: usize| format!("bench.dev/l{}/p{}", index / width, index);

    let records = (0..count)
        .map(|index| {
            let mut record = PackageRecord::new(path(index), path(index));
            let layer_start = (index / width) * width;
            if layer_start >= width {
                for _ in 0..4 {
                    let target = rng.gen_range(layer_start - width..layer_start);
                    let target = path(target);
                    if !record.imports.contains(&target) {
                        record.imports.push(target);
                    }
                }
            }
            record
        })
        .collect();

    Snapshot::from_records(records).unwrap()
}

fn bench_reaches(c: &mut Criterion) {
    let catalog = Catalog::standard();
    let mut group = c.benchmark_group("reaches_everything");

    for count in [1_000usize, 10_000, 50_000] {
        let universe = layered_universe(count);
        let source = "Reaches(bench.dev/..., bench.dev/l0/p0 bench.dev/l0/p1)";
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &universe, |b, universe| {
            b.iter(|| {
                query::evaluate(black_box(source), &catalog, universe, EvalOptions::strict())
                    .unwrap()
            });
        });
    }

    group.finish();
}

fn bench_closure(c: &mut Criterion) {
    let catalog = Catalog::standard();
    let universe = layered_universe(10_000);
    let top = format!("bench.dev/l{}/...", 10_000 / 64 - 1);
    let source = format!("{}:all", top);

    c.bench_function("closure_from_top_layer", |b| {
        b.iter(|| query::evaluate(black_box(&source), &catalog, &universe, EvalOptions::strict()).unwrap());
    });
}

fn bench_parse(c: &mut Criterion) {
    let source = "acme.org/...:all - Reaches(acme.org/... lab.net/...:+test, acme.org/legacy):-test";

    c.bench_function("parse_mixed_expression", |b| {
        b.iter(|| query::parse(black_box(source)).unwrap());
    });
}

criterion_group!(benches, bench_reaches, bench_closure, bench_parse);
criterion_main!(benches);
