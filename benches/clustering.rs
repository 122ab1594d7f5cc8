use criterion::{black_box, criterion_group, criterion_main, Criterion};
use exemplar::AffinityPropagation;
use rand::prelude::*;

fn bench_affinity_propagation(c: &mut Criterion) {
    let mut group = c.benchmark_group("affinity_propagation");

    // Generate synthetic data
    let mut rng = StdRng::seed_from_u64(42);
    let n = 200;
    let d = 8;

    let data: Vec<Vec<f32>> = (0..n)
        .map(|_| (0..d).map(|_| rng.random::<f32>()).collect())
        .collect();

    group.bench_function("fit_n200_d8", |b| {
        b.iter(|| {
            let model = AffinityPropagation::new().with_max_iterations(50);
            model.fit(black_box(&data)).unwrap();
        })
    });

    let karate = exemplar::dataset::karate_layout();
    group.bench_function("fit_karate", |b| {
        b.iter(|| {
            AffinityPropagation::new()
                .with_preference(-50.0)
                .fit(black_box(&karate))
                .unwrap();
        })
    });

    group.finish();
}

criterion_group!(benches, bench_affinity_propagation);
criterion_main!(benches);
