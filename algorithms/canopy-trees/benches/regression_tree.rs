use canopy::benchmarks::config;
use canopy::prelude::*;
use canopy_trees::RegressionTreeParams;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{rngs::SmallRng, SeedableRng};

fn regression_tree_bench(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(42);

    // Controls how many samples are generated
    let training_set_sizes = &[100, 1000, 10000, 100000];

    let n_questions = 12;

    let hyperparams =
        RegressionTreeParams::new_fixed_rng(SmallRng::seed_from_u64(42)).max_depth(8);

    // Benchmark training time 10 times for each training sample size
    let mut group = c.benchmark_group("regression_tree");
    config::set_default_benchmark_configs(&mut group);

    for n in training_set_sizes.iter() {
        let dataset = canopy_datasets::generate::survey(*n, n_questions, 0.5, &mut rng);

        group.bench_with_input(BenchmarkId::from_parameter(n), &dataset, |b, d| {
            b.iter(|| hyperparams.fit(d))
        });
    }

    group.finish();
}

#[cfg(not(target_os = "windows"))]
criterion_group! {
    name = benches;
    config = config::get_default_profiling_configs();
    targets = regression_tree_bench
}
#[cfg(target_os = "windows")]
criterion_group!(benches, regression_tree_bench);

criterion_main!(benches);
