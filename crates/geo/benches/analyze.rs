//! Benchmarks for dataset annotation and query analysis.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sitelocator_geo::{
    analyze, analyze_batch, haversine_distance, AnnotatedDataset, Coordinate, EngineConfig, Feature, Geometry, Query,
};

/// Three 60 degree sectors per site, sites on a grid around Berlin.
fn create_sites(count: usize) -> Vec<Feature> {
    let mut features = Vec::with_capacity(count * 3);
    for i in 0..count {
        let tip = Coordinate::new(52.0 + (i / 50) as f64 * 0.01, 13.0 + (i % 50) as f64 * 0.01);
        for azimuth in [0.0f64, 120.0, 240.0] {
            let mut ring = vec![tip];
            for step in 0..=6 {
                let a = (azimuth - 30.0 + step as f64 * 10.0).to_radians();
                ring.push(Coordinate::new(tip.latitude + 0.004 * a.cos(), tip.longitude + 0.006 * a.sin()));
            }
            ring.push(tip);
            features.push(Feature::new(Geometry::Polygon(vec![ring])));
        }
    }
    features
}

fn bench_single_distance(c: &mut Criterion) {
    let berlin = Coordinate::new(52.5200, 13.4050);
    let paris = Coordinate::new(48.8566, 2.3522);

    c.bench_function("haversine_single", |b| {
        b.iter(|| haversine_distance(black_box(&berlin), black_box(&paris)))
    });
}

fn bench_annotation(c: &mut Criterion) {
    let mut group = c.benchmark_group("annotate");
    let config = EngineConfig::default();

    for size in [10, 100, 1000].iter() {
        let features = create_sites(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| AnnotatedDataset::build(black_box(features.clone()), &config))
        });
    }

    group.finish();
}

fn bench_analyze(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze");

    for size in [10, 100, 1000].iter() {
        let dataset = AnnotatedDataset::build(create_sites(*size), &EngineConfig::default());
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| analyze(black_box(52.05), black_box(13.05), &dataset, 1))
        });
    }

    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let dataset = AnnotatedDataset::build(create_sites(500), &EngineConfig::default());
    let queries: Vec<_> = (0..256)
        .map(|i| Query::new(52.0 + (i % 16) as f64 * 0.005, 13.0 + (i / 16) as f64 * 0.02))
        .collect();

    c.bench_function("analyze_batch_256", |b| b.iter(|| analyze_batch(black_box(&queries), &dataset)));
}

criterion_group!(benches, bench_single_distance, bench_annotation, bench_analyze, bench_batch);
criterion_main!(benches);
