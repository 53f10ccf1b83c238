use canopy::benchmarks::config;
use canopy::prelude::*;
use canopy_ensemble::RandomForestParams;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{rngs::SmallRng, SeedableRng};

fn random_forest_bench(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(42);
    let dataset = canopy_datasets::generate::survey(5000, 12, 0.5, &mut rng);

    // Controls how many trees are grown
    let forest_sizes = &[1, 10, 50, 100];

    let mut group = c.benchmark_group("random_forest");
    config::set_default_benchmark_configs(&mut group);

    for n_estimators in forest_sizes.iter() {
        let hyperparams = RandomForestParams::new_fixed_rng(SmallRng::seed_from_u64(42))
            .n_estimators(*n_estimators)
            .max_depth(8);

        group.bench_with_input(
            BenchmarkId::from_parameter(n_estimators),
            &dataset,
            |b, d| b.iter(|| hyperparams.fit(d)),
        );
    }

    group.finish();
}

#[cfg(not(target_os = "windows"))]
criterion_group! {
    name = benches;
    config = config::get_default_profiling_configs();
    targets = random_forest_bench
}
#[cfg(target_os = "windows")]
criterion_group!(benches, random_forest_bench);

criterion_main!(benches);
