use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use nalgebra::Vector3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use impact_estimator::impact_estimation::ballistic::BallisticParameters;
use impact_estimator::impact_estimation::ransac::fit_cubic_ransac;
use impact_estimator::observations::synthetic::{noisy_ballistic_samples, uniform_times};
use impact_estimator::observations::{Sample, SampleSequence};

fn throw() -> BallisticParameters {
    BallisticParameters::new(
        Vector3::new(2.5, 0.2, 1.1),
        Vector3::new(-4.0, -0.3, 2.8),
        9.8,
    )
}

/// Noisy throw with a fraction of the samples displaced well beyond the inlier threshold.
fn corrupted_throw(rng: &mut StdRng, n: usize, outlier_ratio: f64) -> SampleSequence {
    let times = uniform_times(n, 0.015);
    let clean = noisy_ballistic_samples(&throw(), &times, 0.005, rng).unwrap();
    clean
        .iter()
        .map(|s| {
            if rng.random::<f64>() < outlier_ratio {
                let kick = Vector3::new(0.0, 0.0, rng.random_range(0.3..1.0));
                Sample::new(s.position + kick, s.time)
            } else {
                s
            }
        })
        .collect()
}

fn bench_clean(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0xBA11);
    let samples = corrupted_throw(&mut rng, 30, 0.0);

    c.bench_function("ransac_fit/30_samples_clean", |b| {
        b.iter_batched(
            || StdRng::seed_from_u64(42),
            |mut draw| {
                let fit = fit_cubic_ransac(
                    black_box(samples.times()),
                    black_box(samples.points()),
                    0.1,
                    1000,
                    &mut draw,
                );
                black_box(fit.ok());
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_outliers(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0xBA11);
    let samples = corrupted_throw(&mut rng, 30, 0.3);

    c.bench_function("ransac_fit/30_samples_30pct_outliers", |b| {
        b.iter_batched(
            || StdRng::seed_from_u64(42),
            |mut draw| {
                let fit = fit_cubic_ransac(
                    black_box(samples.times()),
                    black_box(samples.points()),
                    0.1,
                    1000,
                    &mut draw,
                );
                black_box(fit.ok());
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_clean, bench_outliers
);
criterion_main!(benches);
