use std::num::NonZeroUsize;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use knn::{FeaturePoint, KNNClassifier, KNNConfig, Metric, Selection};
use rand::Rng;

const DIM: usize = 16;

fn random_points(n: usize) -> Vec<FeaturePoint<u8, f64, DIM>> {
    let mut rng = rand::thread_rng();
    (0..n)
        .map(|_| {
            let mut features = [0.0; DIM];
            for x in features.iter_mut() {
                *x = rng.gen_range(-1.0..1.0);
            }
            FeaturePoint::new(features, rng.gen_range(0..10))
        })
        .collect()
}

fn bench_compute_distances(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_distances");
    let sample = [0.0; DIM];
    for &size in &[100, 1_000, 10_000] {
        let points = random_points(size);
        for metric in [Metric::Euclidean, Metric::Chebyshev, Metric::Manhattan] {
            group.bench_with_input(
                BenchmarkId::new(format!("{metric:?}"), size),
                &points,
                |b, points| {
                    b.iter(|| {
                        let mut knn =
                            KNNClassifier::with_config(KNNConfig::new().with_metric(metric));
                        knn.compute_distances(black_box(points), black_box(&sample));
                        knn.len()
                    })
                },
            );
        }
    }
    group.finish();
}

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");
    let sample = [0.25; DIM];
    let k = NonZeroUsize::new(10).unwrap();
    for &size in &[100, 1_000, 10_000] {
        let points = random_points(size);
        for selection in [Selection::Nearest, Selection::Majority] {
            group.bench_with_input(
                BenchmarkId::new(format!("{selection:?}"), size),
                &points,
                |b, points| {
                    let mut knn = KNNClassifier::with_config(
                        KNNConfig::new()
                            .with_neighbours(k)
                            .with_selection(selection),
                    );
                    b.iter(|| knn.classify(black_box(points), black_box(&sample)))
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_compute_distances, bench_classify);
criterion_main!(benches);
