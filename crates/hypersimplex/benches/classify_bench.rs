//! Criterion microbenches for the symmetry hot paths.
//!
//! - Edge construction for Δ(d,k).
//! - Word compilation and application on vertex-index arrays.
//! - Edge classification under the full automorphism group.
//! - Eigen embedding of the invariant matrix.
//!
//! Results live under `target/criterion`.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use hypersimplex::embedding::{embed, EmbedCfg};
use hypersimplex::gimatrix::GiMatrix;
use hypersimplex::group::{AutGroup, NativeService};
use hypersimplex::symmetry::{classify, subgroup_images};
use hypersimplex::Hypersimplex;

fn bench_graph(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph");
    for (d, k) in [(6, 3), (8, 4), (10, 5)] {
        group.bench_function(BenchmarkId::new("edges", format!("{d}-{k}")), |b| {
            b.iter(|| Hypersimplex::new(d, k).unwrap())
        });
    }
    group.finish();
}

fn bench_permute(c: &mut Criterion) {
    let mut group = c.benchmark_group("permute");
    let hs = Hypersimplex::new(10, 5).unwrap();
    let p = hs.permuter();
    let word = p.compile("x1^3*x2*x3*(x1*x2)^-2").unwrap();
    group.bench_function(BenchmarkId::new("compile", "10-5"), |b| {
        b.iter(|| p.compile("x1^3*x2*x3*(x1*x2)^-2").unwrap())
    });
    group.bench_function(BenchmarkId::new("apply", "10-5"), |b| {
        b.iter_batched(
            || (0..hs.vertex_count()).collect::<Vec<usize>>(),
            |mut a| p.permute(&word, &mut a),
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");
    group.sample_size(20);
    for (d, k) in [(4, 2), (5, 2)] {
        let hs = Hypersimplex::new(d, k).unwrap();
        let mut aut = AutGroup::new(Box::new(NativeService::default()), d, k).unwrap();
        let whole = aut.subgroups().len() - 1;
        let images = subgroup_images(&mut aut, hs.permuter(), whole).unwrap();
        group.bench_function(BenchmarkId::new("full_group", format!("{d}-{k}")), |b| {
            b.iter(|| classify(&hs, &images))
        });
        let gi = GiMatrix::new(&hs, classify(&hs, &images));
        group.bench_function(BenchmarkId::new("embed", format!("{d}-{k}")), |b| {
            b.iter(|| embed(gi.matrix(), d, &EmbedCfg::default()).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_graph, bench_permute, bench_classify);
criterion_main!(benches);
