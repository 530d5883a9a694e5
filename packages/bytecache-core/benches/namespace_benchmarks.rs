//! Namespace Performance Benchmarks
//!
//! Measures:
//! 1. Hit path (store lookup, no copy)
//! 2. Miss path (loader + insert)
//! 3. Registry lookup

use bytecache_core::{ByteView, LoaderFn, NamespaceRegistry};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn bench_hit(c: &mut Criterion) {
    let registry = NamespaceRegistry::new();
    let ns = registry
        .create_namespace("bench-hit", 0, LoaderFn::new(|_: &str| Ok(vec![0u8; 256])))
        .unwrap();
    ns.populate("hot", ByteView::from(vec![1u8; 256]));

    c.bench_function("namespace_get_hit", |b| {
        b.iter(|| black_box(ns.get(black_box("hot")).unwrap()))
    });
}

fn bench_miss(c: &mut Criterion) {
    let mut group = c.benchmark_group("namespace_get_miss");

    for size in [64usize, 4096] {
        let registry = NamespaceRegistry::new();
        let ns = registry
            .create_namespace(
                "bench-miss",
                0,
                LoaderFn::new(move |_: &str| Ok(vec![0u8; size])),
            )
            .unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                ns.invalidate("cold");
                black_box(ns.get("cold").unwrap())
            })
        });
    }

    group.finish();
}

fn bench_registry_lookup(c: &mut Criterion) {
    let registry = NamespaceRegistry::new();
    for i in 0..100 {
        registry
            .create_namespace(&format!("ns-{}", i), 0, LoaderFn::new(|_: &str| Ok(Vec::new())))
            .unwrap();
    }

    c.bench_function("registry_lookup", |b| {
        b.iter(|| black_box(registry.lookup_namespace(black_box("ns-42"))))
    });
}

criterion_group!(benches, bench_hit, bench_miss, bench_registry_lookup);
criterion_main!(benches);
