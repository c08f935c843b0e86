//! Benchmarks for similarity ranking
//!
//! Run with: cargo bench --package sources
//!
//! Uses a synthetic 5000x5000 matrix, roughly the size of a TMDB 5000 catalog.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use data_loader::{Catalog, MovieRecord, SimilarityMatrix};
use sources::{rank_row, SimilaritySource};
use std::sync::Arc;

const SIZE: usize = 5000;

fn build_catalog() -> Arc<Catalog> {
    let movies = (0..SIZE)
        .map(|i| MovieRecord::new(format!("Movie {}", i), i as u32))
        .collect();
    let scores = (0..SIZE * SIZE)
        .map(|k| (k.wrapping_mul(2_654_435_761) % 1000) as f32 / 1000.0)
        .collect();
    let matrix = SimilarityMatrix::from_flat(SIZE, scores).expect("Failed to build matrix");
    Arc::new(Catalog::new(movies, matrix).expect("Failed to build catalog"))
}

fn bench_get_candidates(c: &mut Criterion) {
    let catalog = build_catalog();
    let source = SimilaritySource::new(catalog);

    c.bench_function("similarity_get_candidates", |b| {
        b.iter(|| {
            let candidates = source.get_candidates(black_box(42)).unwrap();
            black_box(candidates)
        })
    });
}

fn bench_rank_row(c: &mut Criterion) {
    let catalog = build_catalog();
    let row = catalog.similarity_row(42).expect("row 42 exists").to_vec();

    c.bench_function("rank_row", |b| {
        b.iter(|| black_box(rank_row(black_box(&row), 42, 5)))
    });
}

criterion_group!(benches, bench_get_candidates, bench_rank_row);
criterion_main!(benches);
